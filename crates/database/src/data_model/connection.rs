use chrono::{DateTime, Utc};
use model::{
    connection::{
        Connection, ConnectionStatus, ResolvedRoute, RouteSummary, SitemapRoute, TemplateType,
    },
    location::Location,
    WithId,
};
use serde::Deserialize;
use seo::database::DatabaseError;
use utility::{id::Id, serde::string_or_number};

use super::{required, DatabaseRow, Result};

pub const LOCATION_COLUMNS: &str =
    "id, type, city, state, nga_format, per_format, status, template_created, template_url";

#[derive(Debug, Clone, Deserialize)]
pub struct LocationRow {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    #[serde(flatten)]
    pub location: Location,
}

impl DatabaseRow for LocationRow {
    type Model = WithId<Location>;

    fn to_model(self) -> Result<Self::Model> {
        if !self.location.is_consistent() {
            return Err(DatabaseError::Invalid(format!(
                "location {} is a {:?} with city {:?}",
                self.id, self.location.kind, self.location.city
            )));
        }
        Ok(WithId::new(Id::new(self.id), self.location))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateTypeRow {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl DatabaseRow for TemplateTypeRow {
    type Model = WithId<TemplateType>;

    fn to_model(self) -> Result<Self::Model> {
        Ok(WithId::new(
            Id::new(self.id),
            TemplateType {
                name: self.name,
                slug: self.slug,
            },
        ))
    }
}

/// A connection with its endpoints and template type embedded.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionRow {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub from_location_id: String,
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub to_location_id: String,
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub template_type_id: String,
    pub template_url: Option<String>,
    pub status: ConnectionStatus,
    #[serde(
        default,
        deserialize_with = "utility::serde::date_time::deserialize_utc_option"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    pub from_location: Option<LocationRow>,
    pub to_location: Option<LocationRow>,
    pub template_type: Option<TemplateTypeRow>,
}

impl ConnectionRow {
    fn connection(&self) -> WithId<Connection> {
        WithId::new(
            Id::new(self.id.clone()),
            Connection {
                from_location: Id::new(self.from_location_id.clone()),
                to_location: Id::new(self.to_location_id.clone()),
                template_url: self.template_url.clone(),
                template_type: Id::new(self.template_type_id.clone()),
                status: self.status,
                updated_at: self.updated_at,
            },
        )
    }
}

impl DatabaseRow for ConnectionRow {
    type Model = ResolvedRoute;

    fn to_model(self) -> Result<Self::Model> {
        let connection = self.connection();
        let from_location = required(self.from_location, "from_location", &self.id)?;
        let to_location = required(self.to_location, "to_location", &self.id)?;
        let template_type = required(self.template_type, "template_type", &self.id)?;
        Ok(ResolvedRoute {
            connection,
            from_location: from_location.to_model()?,
            to_location: to_location.to_model()?,
            template_type: template_type.to_model()?,
        })
    }
}

/// A linked connection with both endpoints embedded.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteSummaryRow {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    pub template_url: Option<String>,
    pub from_location: Option<LocationRow>,
    pub to_location: Option<LocationRow>,
}

impl DatabaseRow for RouteSummaryRow {
    type Model = RouteSummary;

    fn to_model(self) -> Result<Self::Model> {
        Ok(RouteSummary {
            template_url: required(self.template_url, "template_url", &self.id)?,
            from_location: required(self.from_location, "from_location", &self.id)?
                .to_model()?,
            to_location: required(self.to_location, "to_location", &self.id)?.to_model()?,
            id: Id::new(self.id),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SitemapRouteRow {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    pub template_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "utility::serde::date_time::deserialize_utc_option"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DatabaseRow for SitemapRouteRow {
    type Model = SitemapRoute;

    fn to_model(self) -> Result<Self::Model> {
        Ok(SitemapRoute {
            template_url: required(self.template_url, "template_url", &self.id)?,
            updated_at: self.updated_at,
            id: Id::new(self.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use model::location::LocationKind;

    use super::*;

    #[test]
    fn embedded_rows_become_a_resolved_route() {
        let row: ConnectionRow = serde_json::from_str(
            r#"{
                "id": "c1",
                "from_location_id": "l1",
                "to_location_id": "l2",
                "template_type_id": 3,
                "template_url": "/bileta-avioni-tirana-ne-london",
                "status": "active",
                "updated_at": "2025-03-01T08:30:00.123+00:00",
                "created_at": "2025-01-01T00:00:00+00:00",
                "from_location": {
                    "id": "l1", "type": "city", "city": "Tirana", "state": "Shqipëri",
                    "nga_format": "nga Tirana", "per_format": null, "status": "ready",
                    "template_created": true, "template_url": null
                },
                "to_location": {
                    "id": "l2", "type": "state", "city": null, "state": "Angli",
                    "nga_format": null, "per_format": "për Angli", "status": "ready",
                    "template_created": false, "template_url": null
                },
                "template_type": { "id": 3, "name": "City to state", "slug": "city-to-state" }
            }"#,
        )
        .unwrap();

        let route = row.to_model().unwrap();
        assert_eq!(route.connection.id.as_str(), "c1");
        assert_eq!(route.template_type.id.as_str(), "3");
        assert_eq!(route.to_location.content.kind, LocationKind::State);
        assert_eq!(
            route.connection.content.updated_at.map(|at| at.date_naive().to_string()),
            Some("2025-03-01".to_owned())
        );
    }

    #[test]
    fn dangling_location_is_invalid() {
        let row: ConnectionRow = serde_json::from_str(
            r#"{
                "id": "c1", "from_location_id": "l1", "to_location_id": "l2",
                "template_type_id": "t", "template_url": "/x", "status": "active",
                "from_location": null, "to_location": null, "template_type": null
            }"#,
        )
        .unwrap();
        assert!(matches!(row.to_model(), Err(DatabaseError::Invalid(_))));
    }

    #[test]
    fn city_row_without_city_is_invalid() {
        let row: LocationRow = serde_json::from_str(
            r#"{"id": "l1", "type": "city", "city": null, "state": "Itali", "status": "ready"}"#,
        )
        .unwrap();
        assert!(matches!(row.to_model(), Err(DatabaseError::Invalid(_))));
    }
}
