use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::ExampleData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    City,
    State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    Ready,
    Pending,
    Disabled,
}

/// A named place a route page can start or end at.
/// Table: `seo_location_formats`
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type")]
    pub kind: LocationKind,
    pub city: Option<String>,
    pub state: String,
    /// Pre-written "from" phrase, e.g. "nga Tirana".
    pub nga_format: Option<String>,
    /// Pre-written "to" phrase, e.g. "për Tiranë".
    pub per_format: Option<String>,
    pub status: LocationStatus,
    #[serde(default)]
    pub template_created: bool,
    pub template_url: Option<String>,
}

impl HasId for Location {
    type IdType = String;
}

impl Location {
    pub fn city(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            kind: LocationKind::City,
            city: Some(city.into()),
            state: state.into(),
            nga_format: None,
            per_format: None,
            status: LocationStatus::Ready,
            template_created: false,
            template_url: None,
        }
    }

    pub fn state(state: impl Into<String>) -> Self {
        Self {
            kind: LocationKind::State,
            city: None,
            state: state.into(),
            nga_format: None,
            per_format: None,
            status: LocationStatus::Ready,
            template_created: false,
            template_url: None,
        }
    }

    pub fn with_formats(
        mut self,
        nga_format: Option<&str>,
        per_format: Option<&str>,
    ) -> Self {
        self.nga_format = nga_format.map(str::to_owned);
        self.per_format = per_format.map(str::to_owned);
        self
    }

    /// A city row names its city, a state row does not.
    pub fn is_consistent(&self) -> bool {
        match self.kind {
            LocationKind::City => self.city.is_some(),
            LocationKind::State => self.city.is_none(),
        }
    }

    /// The city when there is one, otherwise the state.
    pub fn display_name(&self) -> &str {
        self.city.as_deref().unwrap_or(&self.state)
    }
}

impl ExampleData for Location {
    fn example_data() -> Self {
        Location::city("Tirana", "Shqipëri")
            .with_formats(Some("nga Tirana"), Some("për Tiranë"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_city_must_agree() {
        assert!(Location::city("Tirana", "Shqipëri").is_consistent());
        assert!(Location::state("Itali").is_consistent());

        let mut broken = Location::state("Itali");
        broken.city = Some("Roma".to_owned());
        assert!(!broken.is_consistent());

        let mut broken = Location::city("Roma", "Itali");
        broken.city = None;
        assert!(!broken.is_consistent());
    }

    #[test]
    fn reads_rows_with_type_column() {
        let location: Location = serde_json::from_str(
            r#"{
                "type": "state",
                "city": null,
                "state": "Gjermani",
                "nga_format": null,
                "per_format": "për Gjermani",
                "status": "pending"
            }"#,
        )
        .unwrap();
        assert_eq!(location.kind, LocationKind::State);
        assert_eq!(location.status, LocationStatus::Pending);
        assert!(!location.template_created);
        assert_eq!(location.display_name(), "Gjermani");
    }
}
