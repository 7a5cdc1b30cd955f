use chrono::NaiveDate;
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

/// A cached fare, written by the price ingestion and only read here.
/// Table: `processed_flight_prices`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPrice {
    pub airline: String,
    /// IATA code of the departure airport.
    pub origin: String,
    /// IATA code of the arrival airport.
    pub destination: String,
    pub flight_date: NaiveDate,
    #[serde(deserialize_with = "utility::serde::decimal::deserialize")]
    pub total_price: f64,
}

/// Cheapest and most expensive fare of a route and the airlines seen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSummary {
    pub min: f64,
    pub max: f64,
    /// Distinct airlines in the order they first appear.
    pub airlines: Vec<String>,
}

impl PriceSummary {
    /// `None` for an empty price list; there is no meaningful range then.
    pub fn from_prices(prices: &[FlightPrice]) -> Option<Self> {
        let (min, max) = match prices
            .iter()
            .map(|price| price.total_price)
            .filter(|price| price.is_finite())
            .minmax_by(|a, b| a.total_cmp(b))
        {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(price) => (price, price),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        Some(Self {
            min,
            max,
            airlines: distinct_airlines(prices),
        })
    }

    pub fn airline_list(&self) -> String {
        self.airlines.join(", ")
    }
}

pub fn distinct_airlines(prices: &[FlightPrice]) -> Vec<String> {
    prices
        .iter()
        .map(|price| price.airline.clone())
        .unique()
        .collect()
}

/// `100` -> `100€`, `99.5` -> `99.50€`.
pub fn format_euro(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}€", amount)
    } else {
        format!("{:.2}€", amount)
    }
}
