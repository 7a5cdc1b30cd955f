use seo::database::Result;

use crate::{data_model::airport::AirportRow, query::Query, PostgrestDatabase};

pub async fn iata_codes_by_city(database: &PostgrestDatabase, city: &str) -> Result<Vec<String>> {
    let query = Query::from("airports").select("iata_code").eq("city", city);
    let rows: Vec<AirportRow> = database.fetch(&query).await?;
    Ok(rows.into_iter().map(|row| row.iata_code).collect())
}
