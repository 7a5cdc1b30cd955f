use model::{
    component::ComponentKind,
    connection::{ResolvedRoute, RouteSummary, SitemapRoute},
    flight_price::FlightPrice,
};
use utility::let_also::LetAlso;

use crate::{
    database::{AirportRepo, ConnectionRepo, Database, FlightPriceRepo, TemplateRepo},
    not_found_to_none,
    page::PageData,
    RequestError, RequestResult,
};

/// Number of fares shown on a route page.
pub const PRICE_LIMIT: usize = 10;

/// Number of links in the related destinations block.
pub const RELATED_LIMIT: usize = 6;

/// Read-side service over the route catalog. Cheap to clone; every request
/// works on its own clone.
#[derive(Debug, Clone)]
pub struct Client<D>
where
    D: Database,
{
    pub database: D,
}

impl<D> Client<D>
where
    D: Database,
{
    pub fn new(database: D) -> Self {
        Self { database }
    }

    /// Finds the active connection for a request path. A path that only
    /// differs from the stored template url by a trailing slash resolves to
    /// the same connection.
    pub async fn resolve_route(&self, path: &str) -> RequestResult<Option<ResolvedRoute>> {
        let route = self.find_route(path).await?;
        if route.is_some() {
            return Ok(route);
        }

        match alternate_path(path) {
            Some(alternate) => {
                log::debug!("no route for '{path}', trying '{alternate}'");
                self.find_route(&alternate).await
            }
            None => Ok(None),
        }
    }

    async fn find_route(&self, template_url: &str) -> RequestResult<Option<ResolvedRoute>> {
        self.database
            .active_connection_by_url(template_url)
            .await
            .map_err(RequestError::from)
            .let_owned(not_found_to_none)
    }

    /// The airport code used to look up fares for `city`. Lookup failures
    /// only degrade the page, so they are logged and treated as unknown.
    pub async fn iata_code(&self, city: Option<&str>) -> Option<String> {
        let city = city?;
        match self.database.iata_codes_by_city(city).await {
            Ok(candidates) => representative_iata(&candidates).map(str::to_owned),
            Err(why) => {
                log::warn!("could not look up airports of '{city}': {why}");
                None
            }
        }
    }

    /// Cheapest fares for the route, or nothing when either end has no
    /// known airport.
    pub async fn route_prices(&self, route: &ResolvedRoute) -> RequestResult<Vec<FlightPrice>> {
        let origin = self
            .iata_code(route.from_location.content.city.as_deref())
            .await;
        let destination = self
            .iata_code(route.to_location.content.city.as_deref())
            .await;

        match (origin, destination) {
            (Some(origin), Some(destination)) => {
                let prices = self
                    .database
                    .cheapest_prices(&origin, &destination, PRICE_LIMIT)
                    .await?;
                log::debug!("{} prices for {origin} -> {destination}", prices.len());
                Ok(prices)
            }
            (origin, destination) => {
                log::info!(
                    "skipping prices for {:?}: airports {:?} -> {:?}",
                    route.template_url(),
                    origin,
                    destination
                );
                Ok(vec![])
            }
        }
    }

    /// Other routes departing where `route` departs.
    pub async fn related_routes(&self, route: &ResolvedRoute) -> RequestResult<Vec<RouteSummary>> {
        Ok(self
            .database
            .active_routes_from(&route.from_location.id, RELATED_LIMIT + 1)
            .await?
            .into_iter()
            .filter(|related| related.id != route.connection.id)
            .take(RELATED_LIMIT)
            .collect())
    }

    pub async fn featured_routes(&self, limit: usize) -> RequestResult<Vec<RouteSummary>> {
        Ok(self.database.featured_routes(limit).await?)
    }

    /// Reads everything needed to render the page at `path`. `Ok(None)` if
    /// no active connection matches.
    pub async fn page_data(&self, path: &str) -> RequestResult<Option<PageData>> {
        let Some(route) = self.resolve_route(path).await? else {
            return Ok(None);
        };

        let prices = self.route_prices(&route).await?;
        let template = self
            .database
            .page_template(&route.template_type.id)
            .await?;
        let components = self.database.active_components(&template.id).await?;

        let related = if components
            .iter()
            .any(|component| component.component == ComponentKind::RelatedDestinations)
        {
            self.related_routes(&route).await?
        } else {
            vec![]
        };

        Ok(Some(PageData {
            path: path.to_owned(),
            route,
            template,
            components,
            prices,
            related,
        }))
    }

    /// All active routes, read in batches of `batch_size` rows one after
    /// another. Stops at the first batch that is not full.
    pub async fn all_active_routes(&self, batch_size: usize) -> RequestResult<Vec<SitemapRoute>> {
        let batch_size = batch_size.clamp(1, self.database.max_rows());
        let mut routes = vec![];
        let mut batch = 0;

        loop {
            let rows = self
                .database
                .active_routes(batch * batch_size, batch_size)
                .await?;
            let fetched = rows.len();
            routes.extend(rows);
            log::info!(
                "fetched {} routes (batch {}), {} so far",
                fetched,
                batch + 1,
                routes.len()
            );

            if fetched < batch_size {
                break;
            }
            batch += 1;
        }

        Ok(routes)
    }

    /// The `page`-th slice (1-based) of `page_size` active routes, in the
    /// same order as [`Client::all_active_routes`]. Slices larger than the
    /// backend's row limit are read in several requests.
    pub async fn active_routes_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> RequestResult<Vec<SitemapRoute>> {
        if page == 0 {
            return Err(RequestError::InvalidArgument(
                "sitemap pages start at 1".to_owned(),
            ));
        }

        let (start, end) = (page - 1)
            .checked_mul(page_size)
            .and_then(|start| Some((start, start.checked_add(page_size)?)))
            .ok_or_else(|| {
                RequestError::InvalidArgument(format!("sitemap page {page} is out of range"))
            })?;
        let mut routes = vec![];
        let mut offset = start;

        while offset < end {
            let limit = (end - offset).min(self.database.max_rows());
            let rows = self.database.active_routes(offset, limit).await?;
            let fetched = rows.len();
            routes.extend(rows);
            if fetched < limit {
                break;
            }
            offset += limit;
        }

        Ok(routes)
    }
}

/// The same path with its trailing slash removed, or added if it had none.
/// The root path has no alternate.
pub fn alternate_path(path: &str) -> Option<String> {
    if path.is_empty() || path == "/" {
        return None;
    }
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => Some(stripped.to_owned()),
        Some(_) => None,
        None => Some(format!("{path}/")),
    }
}

/// Picks the airport code to price a city by: the first regular three-letter
/// code, where codes containing an `X` are taken to be secondary airports,
/// otherwise whatever is listed first.
pub fn representative_iata(candidates: &[String]) -> Option<&str> {
    candidates
        .iter()
        .find(|code| code.chars().count() == 3 && !code.contains('X'))
        .or_else(|| candidates.first())
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use model::{
        component::ComponentKind,
        connection::{Connection, ConnectionStatus},
        location::Location,
        ExampleData,
    };

    use super::*;
    use crate::memory::{fixtures, MemoryDatabase, Outage};

    fn codes(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|code| code.to_string()).collect()
    }

    #[test]
    fn alternate_paths() {
        assert_eq!(alternate_path("/x/").as_deref(), Some("/x"));
        assert_eq!(alternate_path("/x").as_deref(), Some("/x/"));
        assert_eq!(alternate_path("/"), None);
        assert_eq!(alternate_path(""), None);
    }

    #[test]
    fn iata_prefers_regular_codes() {
        assert_eq!(representative_iata(&codes(&["XTA", "TIA"])), Some("TIA"));
        assert_eq!(representative_iata(&codes(&["LGWX", "LHR"])), Some("LHR"));
        assert_eq!(representative_iata(&codes(&["XQP", "ZXY"])), Some("XQP"));
        assert_eq!(representative_iata(&[]), None);
    }

    #[tokio::test]
    async fn resolves_with_and_without_trailing_slash() {
        let client = Client::new(fixtures::catalog());

        let exact = client
            .resolve_route(fixtures::TIRANA_LONDON_URL)
            .await
            .unwrap()
            .unwrap();
        let slashed = client
            .resolve_route(&format!("{}/", fixtures::TIRANA_LONDON_URL))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(exact.connection.id, slashed.connection.id);
        assert_eq!(exact.from_location.content.city.as_deref(), Some("Tirana"));
        assert_eq!(exact.to_location.content.city.as_deref(), Some("London"));
        assert_eq!(exact.template_type.content.slug, "city-to-city");
    }

    #[tokio::test]
    async fn stored_trailing_slash_matches_bare_path() {
        let client = Client::new(fixtures::catalog());
        let route = client
            .resolve_route("/bileta-avioni-tirana-ne-rome")
            .await
            .unwrap();
        assert_eq!(
            route.and_then(|route| route.template_url().map(str::to_owned)),
            Some("/bileta-avioni-tirana-ne-rome/".to_owned())
        );
    }

    #[tokio::test]
    async fn inactive_connections_do_not_resolve() {
        let client = Client::new(fixtures::catalog());
        let route = client.resolve_route(fixtures::INACTIVE_URL).await.unwrap();
        assert!(route.is_none());
    }

    #[tokio::test]
    async fn unknown_paths_resolve_to_none() {
        let client = Client::new(fixtures::catalog());
        assert!(client.resolve_route("/nowhere").await.unwrap().is_none());
        assert!(client.resolve_route("/").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn outage_is_an_error_not_a_miss() {
        let client = Client::new(fixtures::catalog().with_outage(Outage::All));
        assert!(client.resolve_route("/anything").await.is_err());
    }

    #[tokio::test]
    async fn prices_are_fetched_between_representative_airports() {
        let client = Client::new(fixtures::catalog());
        let route = client
            .resolve_route(fixtures::TIRANA_LONDON_URL)
            .await
            .unwrap()
            .unwrap();
        let prices = client.route_prices(&route).await.unwrap();

        assert_eq!(prices.len(), 3);
        assert!(prices
            .iter()
            .all(|price| price.origin == "TIA" && price.destination == "LGW"));
        assert!(prices
            .windows(2)
            .all(|pair| pair[0].total_price <= pair[1].total_price));
    }

    #[tokio::test]
    async fn unknown_airport_skips_prices() {
        let client = Client::new(fixtures::catalog());
        let route = client
            .resolve_route(fixtures::TIRANA_NOWHERE_URL)
            .await
            .unwrap()
            .unwrap();
        assert!(client.route_prices(&route).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn airport_outage_degrades_to_no_prices() {
        let client = Client::new(fixtures::catalog().with_outage(Outage::Airports));
        let data = client
            .page_data(fixtures::TIRANA_LONDON_URL)
            .await
            .unwrap()
            .unwrap();
        assert!(data.prices.is_empty());
    }

    #[tokio::test]
    async fn price_outage_fails_the_page() {
        let client = Client::new(fixtures::catalog().with_outage(Outage::Prices));
        assert!(client.page_data(fixtures::TIRANA_LONDON_URL).await.is_err());
    }

    #[tokio::test]
    async fn page_data_collects_template_components_and_related_routes() {
        let client = Client::new(fixtures::catalog());
        let data = client
            .page_data(fixtures::TIRANA_LONDON_URL)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(data.path, fixtures::TIRANA_LONDON_URL);
        assert_eq!(data.template.content.seo_title, "Bileta avioni {nga_city} {per_city}");
        assert!(data
            .components
            .iter()
            .all(|component| component.is_active()));
        assert!(data
            .components
            .iter()
            .any(|component| component.component == ComponentKind::RelatedDestinations));
        assert!(!data.related.is_empty());
        assert!(data
            .related
            .iter()
            .all(|related| related.id != data.route.connection.id
                && related.from_location.id == data.route.from_location.id));
    }

    #[tokio::test]
    async fn related_routes_are_not_fetched_when_not_rendered() {
        let client = Client::new(fixtures::catalog());
        let data = client
            .page_data(fixtures::KOSOVO_GERMANY_URL)
            .await
            .unwrap()
            .unwrap();
        assert!(data.related.is_empty());
    }

    #[tokio::test]
    async fn pagination_is_complete_and_stable() {
        let mut database = fixtures::catalog().with_max_rows(2);
        for index in 0..7 {
            database = database.with_connection(
                &format!("extra-{index}"),
                Connection {
                    from_location: fixtures::TIRANA.into(),
                    to_location: fixtures::LONDON.into(),
                    template_url: Some(format!("/extra-{}", 7 - index)),
                    template_type: fixtures::CITY_TO_CITY.into(),
                    status: ConnectionStatus::Active,
                    updated_at: None,
                },
            );
        }
        let client = Client::new(database);

        let first = client.all_active_routes(1000).await.unwrap();
        let second = client.all_active_routes(3).await.unwrap();
        assert_eq!(first, second);

        let urls = first
            .iter()
            .map(|route| route.template_url.clone())
            .collect::<Vec<_>>();
        let mut sorted = urls.clone();
        sorted.sort();
        assert_eq!(urls, sorted);
        assert!(!urls.contains(&fixtures::INACTIVE_URL.to_owned()));
    }

    #[tokio::test]
    async fn route_pages_partition_the_catalog() {
        let client = Client::new(fixtures::catalog().with_max_rows(1));
        let all = client.all_active_routes(10).await.unwrap();

        let mut paged = vec![];
        for page in 1..=all.len() / 2 + 2 {
            paged.extend(client.active_routes_page(page, 2).await.unwrap());
        }
        assert_eq!(paged, all);
        assert!(client
            .active_routes_page(all.len() + 1, 2)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn page_zero_is_rejected() {
        let client = Client::new(fixtures::catalog());
        assert!(matches!(
            client.active_routes_page(0, 10).await,
            Err(RequestError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn pages_beyond_the_addressable_range_are_rejected() {
        let client = Client::new(fixtures::catalog());
        for (page, page_size) in [
            (usize::MAX, 10000),
            (usize::MAX / 10000 + 1, 10000),
            (2, usize::MAX),
        ] {
            assert!(
                matches!(
                    client.active_routes_page(page, page_size).await,
                    Err(RequestError::InvalidArgument(_))
                ),
                "page {page} of {page_size}"
            );
        }
    }

    #[tokio::test]
    async fn a_new_catalog_can_be_built_from_example_data() {
        let database = MemoryDatabase::default()
            .with_location("a", Location::example_data())
            .with_location("b", Location::state("Itali"));
        let client = Client::new(database);
        assert!(client.all_active_routes(10).await.unwrap().is_empty());
    }
}
