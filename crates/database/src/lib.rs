use std::{env, sync::Arc};

use async_trait::async_trait;
use model::{
    connection::{ResolvedRoute, RouteSummary, SitemapRoute, TemplateType},
    flight_price::FlightPrice,
    location::Location,
    template::{PageTemplate, TemplateComponent},
    WithId,
};
use query::Query;
use reqwest::{
    header::{ACCEPT, AUTHORIZATION},
    StatusCode,
};
use serde::de::DeserializeOwned;
use seo::database::{
    AirportRepo, ConnectionRepo, Database, FlightPriceRepo, Result, TemplateRepo,
};
use utility::id::Id;

pub mod data_model;
pub mod error;
pub mod queries;
pub mod query;

pub use error::{ConnectionInfoError, PostgrestError};

/// Rows PostgREST returns per request unless configured otherwise.
pub const DEFAULT_MAX_ROWS: usize = 1000;

const JSON: &str = "application/json";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Debug)]
pub struct DatabaseConnectionInfo {
    pub url: String,
    pub anon_key: String,
    /// The `max-rows` setting of the PostgREST server.
    pub max_rows: usize,
}

impl DatabaseConnectionInfo {
    /// Reads `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `SUPABASE_MAX_ROWS`.
    /// The `VITE_` prefixed names of the client application are accepted as
    /// well.
    pub fn from_env() -> core::result::Result<Self, ConnectionInfoError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> core::result::Result<Self, ConnectionInfoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .or_else(|| lookup(&format!("VITE_{name}")))
                .filter(|value| !value.trim().is_empty())
        };
        let url = var("SUPABASE_URL").ok_or(ConnectionInfoError::Missing("SUPABASE_URL"))?;
        let anon_key =
            var("SUPABASE_ANON_KEY").ok_or(ConnectionInfoError::Missing("SUPABASE_ANON_KEY"))?;
        let max_rows = match var("SUPABASE_MAX_ROWS") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|max_rows| *max_rows > 0)
                .ok_or(ConnectionInfoError::Invalid {
                    name: "SUPABASE_MAX_ROWS",
                    value,
                })?,
            None => DEFAULT_MAX_ROWS,
        };
        Ok(Self {
            url,
            anon_key,
            max_rows,
        })
    }

    pub(self) fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url.trim_end_matches('/'))
    }
}

/// The route catalog behind a Supabase PostgREST endpoint. Clones share one
/// connection pool.
#[derive(Clone)]
pub struct PostgrestDatabase {
    http: reqwest::Client,
    rest_url: Arc<str>,
    anon_key: Arc<str>,
    max_rows: usize,
}

impl PostgrestDatabase {
    pub fn connect(
        connection_info: DatabaseConnectionInfo,
    ) -> core::result::Result<Self, PostgrestError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("seo-pages/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            rest_url: connection_info.rest_url().into(),
            anon_key: connection_info.anon_key.into(),
            max_rows: connection_info.max_rows.max(1),
        })
    }

    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        query: &Query,
    ) -> core::result::Result<T, PostgrestError> {
        let url = format!("{}/{}", self.rest_url, query.table());
        let params = query.params();
        log::debug!("GET {url} {params:?}");

        let response = self
            .http
            .get(&url)
            .query(&params)
            .header("apikey", &*self.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.anon_key))
            .header(ACCEPT, if query.is_single() { SINGLE_OBJECT } else { JSON })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body)
                .map_err(|source| PostgrestError::Decode { url, source });
        }
        if query.is_single() && (status == StatusCode::NOT_ACCEPTABLE || body.contains("PGRST116"))
        {
            return Err(PostgrestError::NoSingleRow { url });
        }
        Err(PostgrestError::Status { status, url, body })
    }
}

#[async_trait]
impl ConnectionRepo for PostgrestDatabase {
    async fn active_connection_by_url(&self, template_url: &str) -> Result<ResolvedRoute> {
        queries::connection::active_by_url(self, template_url).await
    }

    async fn active_routes(&self, offset: usize, limit: usize) -> Result<Vec<SitemapRoute>> {
        queries::connection::active(self, offset, limit.min(self.max_rows)).await
    }

    async fn active_routes_from(
        &self,
        location: &Id<Location>,
        limit: usize,
    ) -> Result<Vec<RouteSummary>> {
        queries::connection::active_from(self, location, limit.min(self.max_rows)).await
    }

    async fn featured_routes(&self, limit: usize) -> Result<Vec<RouteSummary>> {
        queries::connection::featured(self, limit.min(self.max_rows)).await
    }
}

#[async_trait]
impl AirportRepo for PostgrestDatabase {
    async fn iata_codes_by_city(&self, city: &str) -> Result<Vec<String>> {
        queries::airport::iata_codes_by_city(self, city).await
    }
}

#[async_trait]
impl FlightPriceRepo for PostgrestDatabase {
    async fn cheapest_prices(
        &self,
        origin: &str,
        destination: &str,
        limit: usize,
    ) -> Result<Vec<FlightPrice>> {
        queries::flight_price::cheapest(self, origin, destination, limit.min(self.max_rows))
            .await
    }
}

#[async_trait]
impl TemplateRepo for PostgrestDatabase {
    async fn page_template(
        &self,
        template_type: &Id<TemplateType>,
    ) -> Result<WithId<PageTemplate>> {
        queries::template::by_template_type(self, template_type).await
    }

    async fn active_components(
        &self,
        template: &Id<PageTemplate>,
    ) -> Result<Vec<TemplateComponent>> {
        queries::template::active_components(self, template).await
    }
}

impl Database for PostgrestDatabase {
    fn max_rows(&self) -> usize {
        self.max_rows
    }
}
