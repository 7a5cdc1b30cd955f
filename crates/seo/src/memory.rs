//! A catalog held in memory. Behaves like the PostgREST backend as far as
//! the route pages are concerned, including the row limit per request, and
//! can simulate an outage of parts of the backend.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use model::{
    connection::{Connection, ResolvedRoute, RouteSummary, SitemapRoute, TemplateType},
    flight_price::FlightPrice,
    location::Location,
    template::{PageTemplate, TemplateComponent},
    WithId,
};
use utility::id::Id;

use crate::database::{
    AirportRepo, ConnectionRepo, Database, DatabaseError, FlightPriceRepo, Result, TemplateRepo,
};

/// Which reads fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outage {
    All,
    Airports,
    Prices,
}

#[derive(Debug, Clone, Default)]
struct Catalog {
    locations: HashMap<String, Location>,
    connections: Vec<WithId<Connection>>,
    template_types: HashMap<String, TemplateType>,
    templates: Vec<WithId<PageTemplate>>,
    components: Vec<TemplateComponent>,
    airports: Vec<(String, String)>,
    prices: Vec<FlightPrice>,
}

#[derive(Debug, Clone)]
pub struct MemoryDatabase {
    catalog: Arc<Catalog>,
    max_rows: usize,
    outage: Option<Outage>,
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self {
            catalog: Arc::default(),
            max_rows: 1000,
            outage: None,
        }
    }
}

impl MemoryDatabase {
    fn catalog_mut(&mut self) -> &mut Catalog {
        Arc::make_mut(&mut self.catalog)
    }

    pub fn with_location(mut self, id: &str, location: Location) -> Self {
        self.catalog_mut()
            .locations
            .insert(id.to_owned(), location);
        self
    }

    pub fn with_connection(mut self, id: &str, connection: Connection) -> Self {
        self.catalog_mut()
            .connections
            .push(WithId::new(id.into(), connection));
        self
    }

    pub fn with_template_type(mut self, id: &str, name: &str, slug: &str) -> Self {
        self.catalog_mut().template_types.insert(
            id.to_owned(),
            TemplateType {
                name: name.to_owned(),
                slug: slug.to_owned(),
            },
        );
        self
    }

    pub fn with_template(mut self, id: &str, template: PageTemplate) -> Self {
        self.catalog_mut()
            .templates
            .push(WithId::new(id.into(), template));
        self
    }

    pub fn with_component(mut self, component: TemplateComponent) -> Self {
        self.catalog_mut().components.push(component);
        self
    }

    pub fn with_airport(mut self, city: &str, iata_code: &str) -> Self {
        self.catalog_mut()
            .airports
            .push((city.to_owned(), iata_code.to_owned()));
        self
    }

    pub fn with_price(mut self, price: FlightPrice) -> Self {
        self.catalog_mut().prices.push(price);
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows.max(1);
        self
    }

    pub fn with_outage(mut self, outage: Outage) -> Self {
        self.outage = Some(outage);
        self
    }

    fn check(&self, affected: Outage) -> Result<()> {
        match self.outage {
            Some(Outage::All) => Err(DatabaseError::Other("catalog unavailable".into())),
            Some(outage) if outage == affected => {
                Err(DatabaseError::Other(format!("{outage:?} unavailable").into()))
            }
            _ => Ok(()),
        }
    }

    fn location(&self, id: &Id<Location>) -> Result<WithId<Location>> {
        let location = self
            .catalog
            .locations
            .get(id.as_str())
            .ok_or_else(|| DatabaseError::Invalid(format!("location {id} does not exist")))?;
        if !location.is_consistent() {
            return Err(DatabaseError::Invalid(format!(
                "location {id} is a {:?} but city is {:?}",
                location.kind, location.city
            )));
        }
        Ok(WithId::new(id.clone(), location.clone()))
    }

    /// Active connections with a page, in page order.
    fn linked_connections(&self) -> Vec<&WithId<Connection>> {
        let mut connections = self
            .catalog
            .connections
            .iter()
            .filter(|connection| {
                connection.content.is_active()
                    && connection
                        .content
                        .template_url
                        .as_deref()
                        .is_some_and(|url| !url.is_empty())
            })
            .collect::<Vec<_>>();
        connections.sort_by(|a, b| {
            a.content
                .template_url
                .cmp(&b.content.template_url)
                .then_with(|| a.id.cmp(&b.id))
        });
        connections
    }

    fn summary(&self, connection: &WithId<Connection>) -> Result<RouteSummary> {
        Ok(RouteSummary {
            id: connection.id.clone(),
            template_url: connection.content.template_url.clone().unwrap_or_default(),
            from_location: self.location(&connection.content.from_location)?,
            to_location: self.location(&connection.content.to_location)?,
        })
    }

    fn page(&self, offset: usize, limit: usize) -> impl Iterator<Item = &WithId<Connection>> {
        self.linked_connections()
            .into_iter()
            .skip(offset)
            .take(limit.min(self.max_rows))
    }
}

#[async_trait]
impl ConnectionRepo for MemoryDatabase {
    async fn active_connection_by_url(&self, template_url: &str) -> Result<ResolvedRoute> {
        self.check(Outage::All)?;
        let matches = self
            .catalog
            .connections
            .iter()
            .filter(|connection| {
                connection.content.is_active()
                    && connection.content.template_url.as_deref() == Some(template_url)
            })
            .collect::<Vec<_>>();

        let connection = match matches.as_slice() {
            [] => return Err(DatabaseError::NotFound),
            [connection] => (*connection).clone(),
            _ => {
                return Err(DatabaseError::Invalid(format!(
                    "{} active connections share {template_url}",
                    matches.len()
                )))
            }
        };

        let template_type_id = &connection.content.template_type;
        let template_type = self
            .catalog
            .template_types
            .get(template_type_id.as_str())
            .cloned()
            .ok_or_else(|| {
                DatabaseError::Invalid(format!("template type {template_type_id} does not exist"))
            })?;

        Ok(ResolvedRoute {
            from_location: self.location(&connection.content.from_location)?,
            to_location: self.location(&connection.content.to_location)?,
            template_type: WithId::new(template_type_id.clone(), template_type),
            connection,
        })
    }

    async fn active_routes(&self, offset: usize, limit: usize) -> Result<Vec<SitemapRoute>> {
        self.check(Outage::All)?;
        Ok(self
            .page(offset, limit)
            .map(|connection| SitemapRoute {
                id: connection.id.clone(),
                template_url: connection.content.template_url.clone().unwrap_or_default(),
                updated_at: connection.content.updated_at,
            })
            .collect())
    }

    async fn active_routes_from(
        &self,
        location: &Id<Location>,
        limit: usize,
    ) -> Result<Vec<RouteSummary>> {
        self.check(Outage::All)?;
        self.linked_connections()
            .into_iter()
            .filter(|connection| &connection.content.from_location == location)
            .take(limit.min(self.max_rows))
            .map(|connection| self.summary(connection))
            .collect()
    }

    async fn featured_routes(&self, limit: usize) -> Result<Vec<RouteSummary>> {
        self.check(Outage::All)?;
        self.page(0, limit)
            .map(|connection| self.summary(connection))
            .collect()
    }
}

#[async_trait]
impl AirportRepo for MemoryDatabase {
    async fn iata_codes_by_city(&self, city: &str) -> Result<Vec<String>> {
        self.check(Outage::Airports)?;
        Ok(self
            .catalog
            .airports
            .iter()
            .filter(|(airport_city, _)| airport_city == city)
            .map(|(_, code)| code.clone())
            .collect())
    }
}

#[async_trait]
impl FlightPriceRepo for MemoryDatabase {
    async fn cheapest_prices(
        &self,
        origin: &str,
        destination: &str,
        limit: usize,
    ) -> Result<Vec<FlightPrice>> {
        self.check(Outage::Prices)?;
        let mut prices = self
            .catalog
            .prices
            .iter()
            .filter(|price| price.origin == origin && price.destination == destination)
            .cloned()
            .collect::<Vec<_>>();
        prices.sort_by(|a, b| a.total_price.total_cmp(&b.total_price));
        prices.truncate(limit.min(self.max_rows));
        Ok(prices)
    }
}

#[async_trait]
impl TemplateRepo for MemoryDatabase {
    async fn page_template(
        &self,
        template_type: &Id<TemplateType>,
    ) -> Result<WithId<PageTemplate>> {
        self.check(Outage::All)?;
        self.catalog
            .templates
            .iter()
            .find(|template| &template.content.template_type == template_type)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }

    async fn active_components(
        &self,
        template: &Id<PageTemplate>,
    ) -> Result<Vec<TemplateComponent>> {
        self.check(Outage::All)?;
        let mut components = self
            .catalog
            .components
            .iter()
            .filter(|component| &component.template == template && component.is_active())
            .cloned()
            .collect::<Vec<_>>();
        components.sort_by_key(|component| component.display_order);
        Ok(components)
    }
}

impl Database for MemoryDatabase {
    fn max_rows(&self) -> usize {
        self.max_rows
    }
}

/// A small Albanian route catalog used by the tests of this crate and the
/// web crate.
pub mod fixtures {
    use chrono::{NaiveDate, TimeZone, Utc};
    use model::{
        component::ComponentKind,
        connection::{Connection, ConnectionStatus},
        flight_price::FlightPrice,
        location::Location,
        template::{ComponentStatus, PageTemplate, TemplateComponent},
    };

    use super::MemoryDatabase;

    pub const TIRANA: &str = "loc-tirana";
    pub const LONDON: &str = "loc-london";
    pub const ROME: &str = "loc-rome";
    pub const NOWHERE: &str = "loc-nowhere";
    pub const KOSOVO: &str = "loc-kosovo";
    pub const GERMANY: &str = "loc-germany";

    pub const CITY_TO_CITY: &str = "type-city-to-city";
    pub const STATE_TO_STATE: &str = "type-state-to-state";
    pub const CITY_TEMPLATE: &str = "template-city";
    pub const STATE_TEMPLATE: &str = "template-state";

    pub const TIRANA_LONDON_URL: &str = "/bileta-avioni-tirana-ne-london";
    pub const TIRANA_ROME_URL: &str = "/bileta-avioni-tirana-ne-rome/";
    pub const TIRANA_NOWHERE_URL: &str = "/bileta-avioni-tirana-ne-nowhere";
    pub const KOSOVO_GERMANY_URL: &str = "/bileta-avioni-kosove-ne-gjermani";
    pub const INACTIVE_URL: &str = "/bileta-avioni-london-ne-tirana";

    fn connection(from: &str, to: &str, url: &str, template_type: &str, day: u32) -> Connection {
        Connection {
            from_location: from.into(),
            to_location: to.into(),
            template_url: Some(url.to_owned()),
            template_type: template_type.into(),
            status: ConnectionStatus::Active,
            updated_at: Utc.with_ymd_and_hms(2025, 3, day, 8, 30, 0).single(),
        }
    }

    fn price(airline: &str, origin: &str, destination: &str, total_price: f64) -> FlightPrice {
        FlightPrice {
            airline: airline.to_owned(),
            origin: origin.to_owned(),
            destination: destination.to_owned(),
            flight_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default(),
            total_price,
        }
    }

    fn components(database: MemoryDatabase, template: &str, kinds: &[&str]) -> MemoryDatabase {
        kinds
            .iter()
            .enumerate()
            .fold(database, |database, (order, name)| {
                database.with_component(TemplateComponent::new(
                    template.into(),
                    ComponentKind::from(*name),
                    order as i32,
                ))
            })
    }

    pub fn catalog() -> MemoryDatabase {
        let database = MemoryDatabase::default()
            .with_location(
                TIRANA,
                Location::city("Tirana", "Shqipëri").with_formats(Some("nga Tirana"), None),
            )
            .with_location(
                LONDON,
                Location::city("London", "Angli").with_formats(None, Some("për Londër")),
            )
            .with_location(ROME, Location::city("Roma", "Itali"))
            .with_location(NOWHERE, Location::city("Nowhere", "Askund"))
            .with_location(
                KOSOVO,
                Location::state("Kosovë").with_formats(Some("nga Kosova"), None),
            )
            .with_location(
                GERMANY,
                Location::state("Gjermani").with_formats(None, Some("për në Gjermani")),
            )
            .with_template_type(CITY_TO_CITY, "City to city", "city-to-city")
            .with_template_type(STATE_TO_STATE, "State to state", "state-to-state")
            .with_connection(
                "conn-tirana-london",
                connection(TIRANA, LONDON, TIRANA_LONDON_URL, CITY_TO_CITY, 1),
            )
            .with_connection(
                "conn-tirana-rome",
                connection(TIRANA, ROME, TIRANA_ROME_URL, CITY_TO_CITY, 2),
            )
            .with_connection(
                "conn-tirana-nowhere",
                connection(TIRANA, NOWHERE, TIRANA_NOWHERE_URL, CITY_TO_CITY, 3),
            )
            .with_connection(
                "conn-kosovo-germany",
                connection(KOSOVO, GERMANY, KOSOVO_GERMANY_URL, STATE_TO_STATE, 4),
            )
            .with_connection(
                "conn-london-tirana",
                Connection {
                    status: ConnectionStatus::Inactive,
                    ..connection(LONDON, TIRANA, INACTIVE_URL, CITY_TO_CITY, 5)
                },
            )
            .with_template(
                CITY_TEMPLATE,
                PageTemplate {
                    template_type: CITY_TO_CITY.into(),
                    seo_title: "Bileta avioni {nga_city} {per_city}".to_owned(),
                    meta_description:
                        "Rezervoni bileta avioni {nga_city} {per_city} me çmimet më të mira."
                            .to_owned(),
                },
            )
            .with_template(
                STATE_TEMPLATE,
                PageTemplate {
                    template_type: STATE_TO_STATE.into(),
                    seo_title: "Fluturime {nga_state} {per_state}".to_owned(),
                    meta_description: "Gjeni fluturime {nga_state} {per_state}.".to_owned(),
                },
            )
            .with_component(TemplateComponent {
                status: ComponentStatus::Inactive,
                ..TemplateComponent::new(CITY_TEMPLATE.into(), ComponentKind::StatePricing, 3)
            })
            .with_airport("Tirana", "TIA")
            .with_airport("London", "XLON")
            .with_airport("London", "LGW")
            .with_airport("London", "LHR")
            .with_airport("Roma", "FCO")
            .with_price(price("Wizz Air", "TIA", "LGW", 120.0))
            .with_price(price("Ryanair", "TIA", "LGW", 89.5))
            .with_price(price("Wizz Air", "TIA", "LGW", 150.0))
            .with_price(price("Ryanair", "LGW", "TIA", 45.0))
            .with_price(price("ITA Airways", "TIA", "LHR", 300.0));

        let database = components(
            database,
            CITY_TEMPLATE,
            &[
                "SEOHead",
                "HeaderComponent",
                "FlightSearchComponent",
                "PricingTableComponent",
                "RouteInfoComponent",
                "CarouselComponent",
                "FAQComponent",
                "RelatedDestinationsComponent",
                "FooterComponent",
            ],
        );
        components(
            database,
            STATE_TEMPLATE,
            &[
                "SEOHead",
                "HeaderComponent",
                "StatePricingComponent",
                "StateRouteInfoComponent",
                "StateFAQComponent",
                "FooterComponent",
            ],
        )
    }
}
