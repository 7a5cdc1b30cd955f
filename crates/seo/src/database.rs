use std::{error, fmt, result};

use async_trait::async_trait;
use model::{
    connection::{ResolvedRoute, RouteSummary, SitemapRoute, TemplateType},
    flight_price::FlightPrice,
    location::Location,
    template::{PageTemplate, TemplateComponent},
    WithId,
};
use utility::id::Id;

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    /// A row came back that violates the catalog's invariants.
    Invalid(String),
    Other(Box<dyn error::Error + Send + Sync>),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DatabaseError::NotFound => write!(f, "no matching row"),
            DatabaseError::Invalid(why) => write!(f, "invalid row: {why}"),
            DatabaseError::Other(why) => write!(f, "{why}"),
        }
    }
}

impl error::Error for DatabaseError {}

pub type Result<T> = result::Result<T, DatabaseError>;

#[async_trait]
pub trait ConnectionRepo: Send + Sync {
    /// The active connection whose template url is exactly `template_url`,
    /// with both locations and the template type joined in.
    async fn active_connection_by_url(&self, template_url: &str) -> Result<ResolvedRoute>;

    /// Active connections that have a template url, ordered by template url
    /// and then id, skipping `offset` rows and returning at most `limit`.
    async fn active_routes(&self, offset: usize, limit: usize) -> Result<Vec<SitemapRoute>>;

    /// Active connections departing from `location`, ordered like
    /// [`ConnectionRepo::active_routes`].
    async fn active_routes_from(
        &self,
        location: &Id<Location>,
        limit: usize,
    ) -> Result<Vec<RouteSummary>>;

    /// Any active connections with a template url.
    async fn featured_routes(&self, limit: usize) -> Result<Vec<RouteSummary>>;
}

#[async_trait]
pub trait AirportRepo: Send + Sync {
    /// IATA codes of all airports listed for `city`, in table order.
    async fn iata_codes_by_city(&self, city: &str) -> Result<Vec<String>>;
}

#[async_trait]
pub trait FlightPriceRepo: Send + Sync {
    /// Up to `limit` fares from `origin` to `destination`, cheapest first.
    async fn cheapest_prices(
        &self,
        origin: &str,
        destination: &str,
        limit: usize,
    ) -> Result<Vec<FlightPrice>>;
}

#[async_trait]
pub trait TemplateRepo: Send + Sync {
    async fn page_template(
        &self,
        template_type: &Id<TemplateType>,
    ) -> Result<WithId<PageTemplate>>;

    /// Active components of a template ordered by display order.
    async fn active_components(
        &self,
        template: &Id<PageTemplate>,
    ) -> Result<Vec<TemplateComponent>>;
}

/// Read access to the route catalog.
/// Concurrent requests share the database by cloning it.
pub trait Database:
    ConnectionRepo + AirportRepo + FlightPriceRepo + TemplateRepo + Clone + Send + Sync + 'static
{
    /// Upper bound of rows the backend returns for a single request.
    fn max_rows(&self) -> usize;
}
