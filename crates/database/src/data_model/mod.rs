//! Rows as returned by PostgREST and their conversion into the model.

use seo::database::DatabaseError;

pub mod airport;
pub mod connection;
pub mod template;

pub type Result<O> = core::result::Result<O, DatabaseError>;

pub trait DatabaseRow {
    type Model;

    fn to_model(self) -> Result<Self::Model>;
}

/// Embedded rows are `null` when the foreign key dangles.
pub(crate) fn required<T>(value: Option<T>, what: &str, id: &str) -> Result<T> {
    value.ok_or_else(|| DatabaseError::Invalid(format!("{what} of {id} is missing")))
}
