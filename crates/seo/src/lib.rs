use std::{error::Error, fmt};

pub mod assembler;
pub mod client;
pub mod database;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod page;

#[derive(Debug)]
pub enum RequestError {
    NotFound,
    InvalidArgument(String),
    Other(Box<dyn Error + Send + Sync>),
}

impl RequestError {
    pub fn other<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RequestError::NotFound => write!(f, "not found"),
            RequestError::InvalidArgument(why) => write!(f, "invalid argument: {why}"),
            RequestError::Other(why) => write!(f, "{why}"),
        }
    }
}

impl Error for RequestError {}

impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::NotFound => Self::NotFound,
            other => Self::other(other),
        }
    }
}

pub type RequestResult<O> = Result<O, RequestError>;

pub fn not_found_to_none<O>(result: RequestResult<O>) -> RequestResult<Option<O>> {
    if let Err(RequestError::NotFound) = result {
        Ok(None)
    } else {
        result.map(Some)
    }
}
