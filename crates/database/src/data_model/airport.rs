use serde::Deserialize;

/// Table: `airports`, only the code is read.
#[derive(Debug, Clone, Deserialize)]
pub struct AirportRow {
    pub iata_code: String,
}
