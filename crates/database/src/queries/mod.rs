use seo::database::Result;

use crate::data_model::DatabaseRow;

pub mod airport;
pub mod connection;
pub mod flight_price;
pub mod template;

pub(crate) fn to_models<R: DatabaseRow>(rows: Vec<R>) -> Result<Vec<R::Model>> {
    rows.into_iter().map(DatabaseRow::to_model).collect()
}
