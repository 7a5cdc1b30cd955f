//! Serde helpers for rows returned by the data service.

pub mod date_time {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de::Error, Deserialize as _, Deserializer};

    /// Parses a timestamp as sent by PostgREST. `timestamptz` columns carry an
    /// offset, plain `timestamp` columns do not and are taken as UTC.
    pub fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(date_time) = DateTime::parse_from_rfc3339(s) {
            return Some(date_time.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize_utc_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => parse_utc(&s)
                .map(Some)
                .ok_or_else(|| Error::custom(format!("invalid timestamp '{s}'"))),
            None => Ok(None),
        }
    }
}

/// Primary keys are uuids in most tables and bigints in a few; both are
/// handled as strings.
pub mod string_or_number {
    use core::fmt;

    use serde::{
        de::{self, Visitor},
        Deserializer,
    };

    struct StringOrNumber;

    impl<'de> Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or an integer")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_owned())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(StringOrNumber)
    }
}

/// `numeric` columns arrive as JSON numbers, or as strings when the column
/// exceeds double precision.
pub mod decimal {
    use serde::{de::Error, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Number(number) => Ok(number),
            Raw::Text(text) => text.trim().parse().map_err(Error::custom),
        }
    }
}
