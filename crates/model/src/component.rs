use std::fmt;

use serde::{Deserialize, Serialize};

/// The content blocks a page template can list. The registry stores them by
/// name; names this build does not know are kept as [`ComponentKind::Unknown`]
/// so that newer templates still render with the blocks that are known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    SeoHead,
    Header,
    FlightSearch,
    PricingTable,
    StateCityPricing,
    StatePricing,
    RouteInfo,
    StateRouteInfo,
    Faq,
    StateFaq,
    RelatedDestinations,
    Footer,
    Unknown(String),
}

impl ComponentKind {
    pub const KNOWN: [ComponentKind; 12] = [
        ComponentKind::SeoHead,
        ComponentKind::Header,
        ComponentKind::FlightSearch,
        ComponentKind::PricingTable,
        ComponentKind::StateCityPricing,
        ComponentKind::StatePricing,
        ComponentKind::RouteInfo,
        ComponentKind::StateRouteInfo,
        ComponentKind::Faq,
        ComponentKind::StateFaq,
        ComponentKind::RelatedDestinations,
        ComponentKind::Footer,
    ];

    /// The name used in `seo_template_components.component_name`.
    pub fn name(&self) -> &str {
        match self {
            Self::SeoHead => "SEOHead",
            Self::Header => "HeaderComponent",
            Self::FlightSearch => "FlightSearchComponent",
            Self::PricingTable => "PricingTableComponent",
            Self::StateCityPricing => "StateCityPricingComponent",
            Self::StatePricing => "StatePricingComponent",
            Self::RouteInfo => "RouteInfoComponent",
            Self::StateRouteInfo => "StateRouteInfoComponent",
            Self::Faq => "FAQComponent",
            Self::StateFaq => "StateFAQComponent",
            Self::RelatedDestinations => "RelatedDestinationsComponent",
            Self::Footer => "FooterComponent",
            Self::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<&str> for ComponentKind {
    fn from(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|kind| kind.name() == name)
            .cloned()
            .unwrap_or_else(|| Self::Unknown(name.to_owned()))
    }
}

impl From<String> for ComponentKind {
    fn from(name: String) -> Self {
        match Self::from(name.as_str()) {
            Self::Unknown(_) => Self::Unknown(name),
            known => known,
        }
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Unknown(name) => name,
            known => known.name().to_owned(),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
