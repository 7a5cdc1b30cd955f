use model::{
    connection::{ResolvedRoute, RouteSummary},
    flight_price::FlightPrice,
    template::{PageTemplate, TemplateComponent},
    WithId,
};
use serde::Serialize;

/// Everything read from the catalog to render one route page.
#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    /// The request path the page was resolved for.
    pub path: String,
    pub route: ResolvedRoute,
    pub template: WithId<PageTemplate>,
    pub components: Vec<TemplateComponent>,
    /// Cheapest fares for the route; empty when an airport is unknown.
    pub prices: Vec<FlightPrice>,
    /// Other routes from the same departure location.
    pub related: Vec<RouteSummary>,
}
