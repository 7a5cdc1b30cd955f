//! Turns the rows read for a route page into the blocks shown on it.

use chrono::NaiveDate;
use model::{
    component::ComponentKind,
    flight_price::{distinct_airlines, format_euro, FlightPrice, PriceSummary},
    location::Location,
    placeholder::expand,
    template::TemplateComponent,
};
use serde::Serialize;

use crate::page::PageData;

const PRICE_TITLE: &str = "{nga_city} {per_state}";
const ROUTE_LABEL: &str = "{nga_city} {per_city}";

/// Links every footer carries regardless of the route.
const FOOTER_LINKS: [(&str, &str, &str); 3] = [
    ("Tirana - London", "/bileta-avioni-tirana-ne-london", "Popular"),
    ("Tirana - Paris", "/bileta-avioni-tirana-ne-paris", "Popular"),
    ("FAQ", "/pyetjet-e-bera-shpesh", "Quick"),
];

#[derive(Debug, Clone, Serialize)]
pub struct AssembledPage {
    pub path: String,
    /// The template's title with the route's phrases filled in.
    pub title: String,
    pub description: String,
    /// Short route phrase used as heading of the price related blocks.
    pub price_title: String,
    pub components: Vec<RenderedComponent>,
}

impl AssembledPage {
    pub fn head(&self) -> Option<&HeadMetadata> {
        self.components.iter().find_map(|component| match component {
            RenderedComponent::SeoHead(head) => Some(head),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadMetadata {
    pub title: String,
    pub description: String,
    pub canonical_path: String,
    pub from_city: Option<String>,
    pub to_city: Option<String>,
    pub from_state: String,
    pub to_state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRow {
    pub airline: String,
    pub date: NaiveDate,
    pub price: f64,
    pub display_price: String,
}

impl From<&FlightPrice> for PriceRow {
    fn from(price: &FlightPrice) -> Self {
        Self {
            airline: price.airline.clone(),
            date: price.flight_date,
            price: price.total_price,
            display_price: format_euro(price.total_price),
        }
    }
}

/// Blocks that only need both endpoints, used on pages between states.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationPair {
    pub title: String,
    pub from_location: Location,
    pub to_location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Faq {
    pub title: String,
    pub from_city: String,
    pub to_city: String,
    pub questions: Vec<FaqEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub text: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "component", rename_all = "snake_case")]
pub enum RenderedComponent {
    SeoHead(HeadMetadata),
    Header {
        title: String,
        subtitle: String,
    },
    FlightSearch {
        from_city: String,
        to_city: String,
    },
    PricingTable {
        title: String,
        from_city: String,
        to_city: String,
        rows: Vec<PriceRow>,
        summary: Option<PriceSummary>,
    },
    StateCityPricing(LocationPair),
    StatePricing(LocationPair),
    RouteInfo {
        title: String,
        from_city: String,
        to_city: String,
        airlines: Vec<String>,
    },
    StateRouteInfo(LocationPair),
    Faq(Faq),
    StateFaq(Faq),
    RelatedDestinations {
        title: String,
        links: Vec<Link>,
    },
    Footer {
        from_city: String,
        to_city: String,
        seo_text: String,
        links: Vec<Link>,
    },
}

/// Values shared by all blocks of one page.
struct Context<'a> {
    data: &'a PageData,
    from: &'a Location,
    to: &'a Location,
    title: String,
    description: String,
    price_title: String,
    summary: Option<PriceSummary>,
}

impl<'a> Context<'a> {
    fn new(data: &'a PageData) -> Self {
        let from = &data.route.from_location.content;
        let to = &data.route.to_location.content;
        let template = &data.template.content;
        Self {
            data,
            from,
            to,
            title: expand(&template.seo_title, from, to),
            description: expand(&template.meta_description, from, to),
            price_title: expand(PRICE_TITLE, from, to),
            summary: PriceSummary::from_prices(&data.prices),
        }
    }

    fn from_city(&self) -> String {
        self.from.display_name().to_owned()
    }

    fn to_city(&self) -> String {
        self.to.display_name().to_owned()
    }

    fn location_pair(&self) -> LocationPair {
        LocationPair {
            title: self.price_title.clone(),
            from_location: self.from.clone(),
            to_location: self.to.clone(),
        }
    }

    fn render(&self, kind: &ComponentKind) -> Option<RenderedComponent> {
        let rendered = match kind {
            ComponentKind::SeoHead => RenderedComponent::SeoHead(HeadMetadata {
                title: self.title.clone(),
                description: self.description.clone(),
                canonical_path: self.data.path.clone(),
                from_city: self.from.city.clone(),
                to_city: self.to.city.clone(),
                from_state: self.from.state.clone(),
                to_state: self.to.state.clone(),
            }),
            ComponentKind::Header => RenderedComponent::Header {
                title: self.title.clone(),
                subtitle: self.description.clone(),
            },
            ComponentKind::FlightSearch => RenderedComponent::FlightSearch {
                from_city: self.from_city(),
                to_city: self.to_city(),
            },
            ComponentKind::PricingTable => RenderedComponent::PricingTable {
                title: self.price_title.clone(),
                from_city: self.from_city(),
                to_city: self.to_city(),
                rows: self.data.prices.iter().map(PriceRow::from).collect(),
                summary: self.summary.clone(),
            },
            ComponentKind::StateCityPricing => {
                RenderedComponent::StateCityPricing(self.location_pair())
            }
            ComponentKind::StatePricing => RenderedComponent::StatePricing(self.location_pair()),
            ComponentKind::RouteInfo => RenderedComponent::RouteInfo {
                title: self.price_title.clone(),
                from_city: self.from_city(),
                to_city: self.to_city(),
                airlines: distinct_airlines(&self.data.prices),
            },
            ComponentKind::StateRouteInfo => {
                RenderedComponent::StateRouteInfo(self.location_pair())
            }
            ComponentKind::Faq => RenderedComponent::Faq(self.faq(route_questions(
                &self.price_title,
                self.summary.as_ref(),
            ))),
            ComponentKind::StateFaq => {
                RenderedComponent::StateFaq(self.faq(state_questions(&self.price_title)))
            }
            ComponentKind::RelatedDestinations => RenderedComponent::RelatedDestinations {
                title: format!("Destinacione të tjera {}", expand("{nga_city}", self.from, self.to)),
                links: self
                    .data
                    .related
                    .iter()
                    .map(|related| Link {
                        text: expand(
                            ROUTE_LABEL,
                            &related.from_location.content,
                            &related.to_location.content,
                        ),
                        url: related.template_url.clone(),
                        category: None,
                    })
                    .collect(),
            },
            ComponentKind::Footer => RenderedComponent::Footer {
                from_city: self.from_city(),
                to_city: self.to_city(),
                seo_text: format!(
                    "Rezervoni biletat tuaja për fluturime të lira nga {} në {}. Ne ofrojmë \
                     çmimet më të mira dhe shërbimin më të mirë për udhëtarët tanë.",
                    self.from.display_name(),
                    self.to.display_name()
                ),
                links: FOOTER_LINKS
                    .iter()
                    .map(|(text, url, category)| Link {
                        text: text.to_string(),
                        url: url.to_string(),
                        category: Some(category.to_string()),
                    })
                    .collect(),
            },
            ComponentKind::Unknown(name) => {
                log::debug!("skipping unknown component '{name}' on {}", self.data.path);
                return None;
            }
        };
        Some(rendered)
    }

    fn faq(&self, questions: Vec<FaqEntry>) -> Faq {
        Faq {
            title: self.price_title.clone(),
            from_city: self.from_city(),
            to_city: self.to_city(),
            questions,
        }
    }
}

fn entry(question: String, answer: String) -> FaqEntry {
    FaqEntry { question, answer }
}

fn route_questions(price_title: &str, summary: Option<&PriceSummary>) -> Vec<FaqEntry> {
    let price_answer = match summary {
        Some(summary) => format!(
            "Çmimet për fluturime {price_title} fillojnë nga {} dhe mund të arrijnë deri në {}, \
             në varësi të sezonit dhe disponueshmërisë.",
            format_euro(summary.min),
            format_euro(summary.max)
        ),
        None => format!(
            "Aktualisht nuk kemi çmime të publikuara për fluturime {price_title}. Kontaktoni me \
             stafin tonë për ofertën më të mirë."
        ),
    };
    let airlines_answer = match summary {
        Some(summary) => format!(
            "Kompanitë kryesore që operojnë fluturime {price_title} janë {}.",
            summary.airline_list()
        ),
        None => format!(
            "Kontaktoni me stafin tonë për të mësuar se cilat kompani ajrore operojnë \
             fluturime {price_title}."
        ),
    };

    vec![
        entry(format!("Sa kushton një biletë {price_title}?"), price_answer),
        entry(
            format!("Si mund të rezervojmë bileta {price_title}?"),
            format!("Biletat {price_title} mund t'i rezervoni duke kontaktuar me stafin tonë."),
        ),
        entry(
            "Cilat kompani ajrore operojnë në këtë rrugë?".to_owned(),
            airlines_answer,
        ),
        entry(
            format!("A ka fluturime direkte {price_title}?"),
            format!(
                "Kontaktoni me stafin tonë për t'u informuar rreth fluturimeve për bileta \
                 avioni {price_title}."
            ),
        ),
        booking_advice(),
    ]
}

fn state_questions(price_title: &str) -> Vec<FaqEntry> {
    vec![
        entry(
            format!("Si mund të gjej bileta avioni {price_title}?"),
            format!(
                "Stafi ynë ju ndihmon të gjeni fluturimet më të përshtatshme {price_title} \
                 nga të gjitha aeroportet e rajonit."
            ),
        ),
        entry(
            format!("Nga cilat qytete ka fluturime {price_title}?"),
            "Ofrojmë fluturime nga qytetet kryesore të rajonit. Kontaktoni me stafin tonë \
             për oraret e sakta."
                .to_owned(),
        ),
        booking_advice(),
    ]
}

fn booking_advice() -> FaqEntry {
    entry(
        "Kur duhet të rezervoj biletën time?".to_owned(),
        "Rekomandohet të rezervoni biletën tuaj të paktën 2-3 muaj përpara për të gjetur \
         çmimet më të mira. Gjatë sezonit të lartë (verë dhe festa), është mirë të \
         rezervoni edhe më herët."
            .to_owned(),
    )
}

/// Active components of the page in display order. Components sharing a
/// display order keep the order they were read in.
pub fn ordered_components(components: &[TemplateComponent]) -> Vec<&TemplateComponent> {
    let mut ordered = components
        .iter()
        .filter(|component| component.is_active())
        .collect::<Vec<_>>();
    ordered.sort_by_key(|component| component.display_order);
    ordered
}

/// Builds the page for `data`, rendering every known active component in
/// display order.
pub fn assemble(data: &PageData) -> AssembledPage {
    let context = Context::new(data);
    let components = ordered_components(&data.components)
        .into_iter()
        .filter_map(|component| context.render(&component.component))
        .collect();

    AssembledPage {
        path: data.path.clone(),
        title: context.title.clone(),
        description: context.description.clone(),
        price_title: context.price_title.clone(),
        components,
    }
}

#[cfg(test)]
mod tests {
    use model::{
        connection::{Connection, ConnectionStatus, ResolvedRoute, RouteSummary, TemplateType},
        template::{ComponentStatus, PageTemplate},
        WithId,
    };

    use super::*;

    const TEMPLATE: &str = "template";

    fn location(id: &str, location: Location) -> WithId<Location> {
        WithId::new(id.into(), location)
    }

    fn route() -> ResolvedRoute {
        ResolvedRoute {
            connection: WithId::new(
                "conn".into(),
                Connection {
                    from_location: "tia".into(),
                    to_location: "lon".into(),
                    template_url: Some("/bileta-avioni-tirana-ne-london".to_owned()),
                    template_type: "city".into(),
                    status: ConnectionStatus::Active,
                    updated_at: None,
                },
            ),
            from_location: location(
                "tia",
                Location::city("Tirana", "Shqipëri").with_formats(Some("nga Tirana"), None),
            ),
            to_location: location(
                "lon",
                Location::city("London", "Angli").with_formats(None, Some("për Londër")),
            ),
            template_type: WithId::new(
                "city".into(),
                TemplateType {
                    name: "City".to_owned(),
                    slug: "city".to_owned(),
                },
            ),
        }
    }

    fn price(airline: &str, total_price: f64) -> FlightPrice {
        FlightPrice {
            airline: airline.to_owned(),
            origin: "TIA".to_owned(),
            destination: "LGW".to_owned(),
            flight_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            total_price,
        }
    }

    fn component(name: &str, display_order: i32) -> TemplateComponent {
        TemplateComponent::new(TEMPLATE.into(), ComponentKind::from(name), display_order)
    }

    fn page(components: Vec<TemplateComponent>, prices: Vec<FlightPrice>) -> PageData {
        PageData {
            path: "/bileta-avioni-tirana-ne-london".to_owned(),
            route: route(),
            template: WithId::new(
                TEMPLATE.into(),
                PageTemplate {
                    template_type: "city".into(),
                    seo_title: "Bileta avioni {nga_city} {per_city}".to_owned(),
                    meta_description: "Fluturime {nga_city} {per_state}".to_owned(),
                },
            ),
            components,
            prices,
            related: vec![],
        }
    }

    fn faq_text(page: &AssembledPage) -> String {
        page.components
            .iter()
            .find_map(|component| match component {
                RenderedComponent::Faq(faq) => Some(
                    faq.questions
                        .iter()
                        .map(|entry| format!("{} {}", entry.question, entry.answer))
                        .collect::<Vec<_>>()
                        .join("\n"),
                ),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn titles_are_expanded() {
        let page = assemble(&page(vec![component("HeaderComponent", 0)], vec![]));
        assert_eq!(page.title, "Bileta avioni nga Tirana për Londër");
        assert_eq!(page.description, "Fluturime nga Tirana për Londër");
        assert_eq!(page.price_title, "nga Tirana për Londër");
        assert_eq!(
            page.components,
            vec![RenderedComponent::Header {
                title: "Bileta avioni nga Tirana për Londër".to_owned(),
                subtitle: "Fluturime nga Tirana për Londër".to_owned(),
            }]
        );
    }

    #[test]
    fn components_follow_display_order_and_unknown_ones_are_skipped() {
        let mut inactive = component("FlightSearchComponent", 0);
        inactive.status = ComponentStatus::Inactive;
        let data = page(
            vec![
                component("FooterComponent", 9),
                component("CarouselComponent", 1),
                inactive,
                component("HeaderComponent", 2),
                component("SEOHead", 2),
                component("RouteInfoComponent", 5),
            ],
            vec![],
        );

        let kinds = assemble(&data)
            .components
            .iter()
            .map(|component| match component {
                RenderedComponent::SeoHead(_) => "head",
                RenderedComponent::Header { .. } => "header",
                RenderedComponent::RouteInfo { .. } => "route",
                RenderedComponent::Footer { .. } => "footer",
                _ => "other",
            })
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec!["header", "head", "route", "footer"]);
    }

    #[test]
    fn faq_states_price_range_and_airlines() {
        let data = page(
            vec![component("FAQComponent", 0)],
            vec![price("A", 100.0), price("B", 250.0)],
        );
        let text = faq_text(&assemble(&data));
        assert!(text.contains("fillojnë nga 100€"));
        assert!(text.contains("deri në 250€"));
        assert!(text.contains("janë A, B."));
    }

    #[test]
    fn faq_without_prices_uses_fallback_phrases() {
        let data = page(
            vec![
                component("FAQComponent", 0),
                component("PricingTableComponent", 1),
                component("RouteInfoComponent", 2),
            ],
            vec![],
        );
        let page = assemble(&data);
        let text = faq_text(&page);
        assert!(text.contains("nuk kemi çmime"));

        let json = serde_json::to_string(&page).unwrap();
        for bad in ["NaN", "Infinity", "null€"] {
            assert!(!json.contains(bad), "{bad} in {json}");
        }
    }

    #[test]
    fn pricing_table_lists_rows_with_summary() {
        let data = page(
            vec![component("PricingTableComponent", 0)],
            vec![price("Wizz Air", 89.5), price("Ryanair", 120.0)],
        );
        match &assemble(&data).components[0] {
            RenderedComponent::PricingTable { rows, summary, .. } => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].display_price, "89.50€");
                assert_eq!(summary.as_ref().map(|summary| summary.max), Some(120.0));
            }
            other => panic!("unexpected component {other:?}"),
        }
    }

    #[test]
    fn related_destinations_link_other_routes() {
        let mut data = page(vec![component("RelatedDestinationsComponent", 0)], vec![]);
        data.related = vec![RouteSummary {
            id: "other".into(),
            template_url: "/bileta-avioni-tirana-ne-roma".to_owned(),
            from_location: data.route.from_location.clone(),
            to_location: location("rom", Location::city("Roma", "Itali")),
        }];

        match &assemble(&data).components[0] {
            RenderedComponent::RelatedDestinations { title, links } => {
                assert_eq!(title, "Destinacione të tjera nga Tirana");
                assert_eq!(
                    links,
                    &vec![Link {
                        text: "nga Tirana për Roma".to_owned(),
                        url: "/bileta-avioni-tirana-ne-roma".to_owned(),
                        category: None,
                    }]
                );
            }
            other => panic!("unexpected component {other:?}"),
        }
    }

    #[test]
    fn head_metadata_keeps_canonical_path_and_endpoints() {
        let page = assemble(&page(vec![component("SEOHead", 0)], vec![]));
        let head = page.head().unwrap();
        assert_eq!(head.canonical_path, "/bileta-avioni-tirana-ne-london");
        assert_eq!(head.from_city.as_deref(), Some("Tirana"));
        assert_eq!(head.to_state, "Angli");
    }

    #[test]
    fn components_serialize_with_their_kind() {
        let page = assemble(&page(vec![component("FlightSearchComponent", 0)], vec![]));
        let json = serde_json::to_value(&page.components[0]).unwrap();
        assert_eq!(json["component"], "flight_search");
        assert_eq!(json["from_city"], "Tirana");
    }
}
