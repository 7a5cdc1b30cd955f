use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{location::Location, WithId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Active,
    Inactive,
}

/// A directed, templated route between two locations.
/// Table: `seo_location_connections`
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(rename = "from_location_id")]
    pub from_location: Id<Location>,
    #[serde(rename = "to_location_id")]
    pub to_location: Id<Location>,
    /// The page path, e.g. `/bileta-avioni-tirana-ne-london`. Unique among
    /// active connections.
    pub template_url: Option<String>,
    #[serde(rename = "template_type_id")]
    pub template_type: Id<TemplateType>,
    pub status: ConnectionStatus,
    pub updated_at: Option<DateTime<Utc>>,
}

impl HasId for Connection {
    type IdType = String;
}

impl Connection {
    pub fn is_active(&self) -> bool {
        self.status == ConnectionStatus::Active
    }
}

/// A category of route page, e.g. city to city.
/// Table: `seo_template_types`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateType {
    pub name: String,
    pub slug: String,
}

impl HasId for TemplateType {
    type IdType = String;
}

/// An active connection with both endpoints and its template type joined in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedRoute {
    #[serde(flatten)]
    pub connection: WithId<Connection>,
    pub from_location: WithId<Location>,
    pub to_location: WithId<Location>,
    pub template_type: WithId<TemplateType>,
}

impl ResolvedRoute {
    pub fn template_url(&self) -> Option<&str> {
        self.connection.content.template_url.as_deref()
    }
}

/// The part of an active connection needed to link to its page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSummary {
    pub id: Id<Connection>,
    pub template_url: String,
    pub from_location: WithId<Location>,
    pub to_location: WithId<Location>,
}

/// One `<url>` of the sitemap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapRoute {
    pub id: Id<Connection>,
    pub template_url: String,
    pub updated_at: Option<DateTime<Utc>>,
}
