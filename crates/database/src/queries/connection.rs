use model::{
    connection::{ResolvedRoute, RouteSummary, SitemapRoute},
    location::Location,
};
use seo::database::Result;
use utility::id::Id;

use crate::{
    data_model::{
        connection::{ConnectionRow, RouteSummaryRow, SitemapRouteRow, LOCATION_COLUMNS},
        DatabaseRow,
    },
    query::{Order, Query},
    PostgrestDatabase,
};

use super::to_models;

const CONNECTIONS: &str = "seo_location_connections";

fn resolved_columns() -> String {
    format!(
        "id, from_location_id, to_location_id, template_type_id, template_url, status, \
         updated_at, \
         from_location:from_location_id({LOCATION_COLUMNS}), \
         to_location:to_location_id({LOCATION_COLUMNS}), \
         template_type:template_type_id(id, name, slug)"
    )
}

fn summary_columns() -> String {
    format!(
        "id, template_url, \
         from_location:from_location_id({LOCATION_COLUMNS}), \
         to_location:to_location_id({LOCATION_COLUMNS})"
    )
}

/// Active connections that have a page, in the order every listing and
/// every sitemap page uses.
fn linked(columns: &str) -> Query {
    Query::from(CONNECTIONS)
        .select(columns)
        .eq("status", "active")
        .not_null("template_url")
        .order("template_url", Order::Ascending)
        .order("id", Order::Ascending)
}

pub async fn active_by_url(
    database: &PostgrestDatabase,
    template_url: &str,
) -> Result<ResolvedRoute> {
    let query = Query::from(CONNECTIONS)
        .select(&resolved_columns())
        .eq("template_url", template_url)
        .eq("status", "active")
        .single();
    let row: ConnectionRow = database.fetch(&query).await?;
    row.to_model()
}

pub async fn active(
    database: &PostgrestDatabase,
    offset: usize,
    limit: usize,
) -> Result<Vec<SitemapRoute>> {
    if limit == 0 {
        return Ok(vec![]);
    }
    let query = linked("id, template_url, updated_at").range(offset, offset + limit - 1);
    let rows: Vec<SitemapRouteRow> = database.fetch(&query).await?;
    to_models(rows)
}

pub async fn active_from(
    database: &PostgrestDatabase,
    location: &Id<Location>,
    limit: usize,
) -> Result<Vec<RouteSummary>> {
    let query = linked(&summary_columns())
        .eq("from_location_id", location)
        .limit(limit);
    let rows: Vec<RouteSummaryRow> = database.fetch(&query).await?;
    to_models(rows)
}

pub async fn featured(database: &PostgrestDatabase, limit: usize) -> Result<Vec<RouteSummary>> {
    let query = linked(&summary_columns()).limit(limit);
    let rows: Vec<RouteSummaryRow> = database.fetch(&query).await?;
    to_models(rows)
}
