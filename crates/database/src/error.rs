use seo::database::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostgrestError {
    #[error("request to the data service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("data service answered {status} for {url}: {body}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
        body: String,
    },
    #[error("expected exactly one row from {url}")]
    NoSingleRow { url: String },
    #[error("could not decode response of {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConnectionInfoError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("invalid value '{value}' for {name}")]
    Invalid { name: &'static str, value: String },
}

impl From<PostgrestError> for DatabaseError {
    fn from(why: PostgrestError) -> Self {
        match why {
            PostgrestError::NoSingleRow { .. } => DatabaseError::NotFound,
            other => DatabaseError::Other(Box::new(other)),
        }
    }
}
