use model::flight_price::FlightPrice;
use seo::database::Result;

use crate::{
    query::{Order, Query},
    PostgrestDatabase,
};

pub async fn cheapest(
    database: &PostgrestDatabase,
    origin: &str,
    destination: &str,
    limit: usize,
) -> Result<Vec<FlightPrice>> {
    let query = Query::from("processed_flight_prices")
        .select("airline, origin, destination, flight_date, total_price")
        .eq("origin", origin)
        .eq("destination", destination)
        .order("total_price", Order::Ascending)
        .limit(limit);
    Ok(database.fetch(&query).await?)
}
