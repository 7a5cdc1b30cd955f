use std::fmt::Write as _;

use model::flight_price::format_euro;
use seo::assembler::{AssembledPage, Faq, Link, LocationPair, RenderedComponent};

use super::escape_html;

const NO_PRICES: &str = "Çmimet për këtë rrugë nuk janë ende të disponueshme.";

fn links(html: &mut String, links: &[Link]) {
    html.push_str("<ul>");
    for link in links {
        let _ = write!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            escape_html(&link.url),
            escape_html(&link.text)
        );
    }
    html.push_str("</ul>");
}

fn location_pair(html: &mut String, class: &str, pair: &LocationPair, text: &str) {
    let _ = write!(
        html,
        "<section class=\"{class}\"><h2>{}</h2><p>{}</p></section>",
        escape_html(&pair.title),
        escape_html(text)
    );
}

fn faq(html: &mut String, class: &str, faq: &Faq) {
    let _ = write!(
        html,
        "<section class=\"{class}\"><h2>Pyetje të shpeshta {}</h2><dl>",
        escape_html(&faq.title)
    );
    for entry in &faq.questions {
        let _ = write!(
            html,
            "<dt>{}</dt><dd>{}</dd>",
            escape_html(&entry.question),
            escape_html(&entry.answer)
        );
    }
    html.push_str("</dl></section>");
}

fn component(html: &mut String, component: &RenderedComponent) {
    match component {
        // Only contributes to the document head.
        RenderedComponent::SeoHead(_) => {}
        RenderedComponent::Header { title, subtitle } => {
            let _ = write!(
                html,
                "<header class=\"seo-header\"><h1>{}</h1><p>{}</p></header>",
                escape_html(title),
                escape_html(subtitle)
            );
        }
        RenderedComponent::FlightSearch { from_city, to_city } => {
            let _ = write!(
                html,
                "<section class=\"seo-flight-search\" data-from=\"{}\" data-to=\"{}\">\
                 <h2>Kërko fluturime nga {} në {}</h2></section>",
                escape_html(from_city),
                escape_html(to_city),
                escape_html(from_city),
                escape_html(to_city)
            );
        }
        RenderedComponent::PricingTable {
            title,
            rows,
            summary,
            ..
        } => {
            let _ = write!(
                html,
                "<section class=\"seo-pricing\"><h2>Çmimet e biletave {}</h2>",
                escape_html(title)
            );
            if rows.is_empty() {
                let _ = write!(html, "<p>{}</p>", escape_html(NO_PRICES));
            } else {
                html.push_str(
                    "<table><thead><tr><th>Kompania</th><th>Data</th><th>Çmimi</th></tr>\
                     </thead><tbody>",
                );
                for row in rows {
                    let _ = write!(
                        html,
                        "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                        escape_html(&row.airline),
                        row.date.format("%d.%m.%Y"),
                        escape_html(&row.display_price)
                    );
                }
                html.push_str("</tbody></table>");
            }
            if let Some(summary) = summary {
                let _ = write!(
                    html,
                    "<p>Nga {} deri në {}</p>",
                    escape_html(&format_euro(summary.min)),
                    escape_html(&format_euro(summary.max))
                );
            }
            html.push_str("</section>");
        }
        RenderedComponent::StateCityPricing(pair) => location_pair(
            html,
            "seo-state-city-pricing",
            pair,
            &format!(
                "Krahasoni çmimet e fluturimeve nga qytetet e {} drejt {}.",
                pair.from_location.state,
                pair.to_location.display_name()
            ),
        ),
        RenderedComponent::StatePricing(pair) => location_pair(
            html,
            "seo-state-pricing",
            pair,
            &format!(
                "Çmimet më të mira për fluturime nga {} në {}.",
                pair.from_location.state,
                pair.to_location.state
            ),
        ),
        RenderedComponent::RouteInfo {
            title,
            from_city,
            to_city,
            airlines,
        } => {
            let _ = write!(
                html,
                "<section class=\"seo-route-info\"><h2>Informacion për fluturimet {}</h2>\
                 <p>Fluturime nga {} në {}.</p>",
                escape_html(title),
                escape_html(from_city),
                escape_html(to_city)
            );
            if !airlines.is_empty() {
                let _ = write!(
                    html,
                    "<p>Kompanitë ajrore: {}</p>",
                    escape_html(&airlines.join(", "))
                );
            }
            html.push_str("</section>");
        }
        RenderedComponent::StateRouteInfo(pair) => location_pair(
            html,
            "seo-state-route-info",
            pair,
            &format!(
                "Fluturime nga aeroportet e {} drejt {}.",
                pair.from_location.state,
                pair.to_location.state
            ),
        ),
        RenderedComponent::Faq(block) => faq(html, "seo-faq", block),
        RenderedComponent::StateFaq(block) => faq(html, "seo-state-faq", block),
        RenderedComponent::RelatedDestinations { title, links: related } => {
            if related.is_empty() {
                return;
            }
            let _ = write!(
                html,
                "<section class=\"seo-related\"><h2>{}</h2>",
                escape_html(title)
            );
            links(html, related);
            html.push_str("</section>");
        }
        RenderedComponent::Footer {
            seo_text,
            links: footer_links,
            ..
        } => {
            let _ = write!(
                html,
                "<footer class=\"seo-footer\"><p>{}</p>",
                escape_html(seo_text)
            );
            links(html, footer_links);
            html.push_str("</footer>");
        }
    }
}

/// Markup of all blocks in page order.
pub fn render_components(page: &AssembledPage) -> String {
    let mut html = String::from("<main class=\"seo-page\">");
    for rendered in &page.components {
        component(&mut html, rendered);
    }
    html.push_str("</main>");
    html
}

#[cfg(test)]
mod tests {
    use seo::assembler::FaqEntry;

    use super::*;

    fn page(components: Vec<RenderedComponent>) -> AssembledPage {
        AssembledPage {
            path: "/x".to_owned(),
            title: "t".to_owned(),
            description: "d".to_owned(),
            price_title: "nga Tirana për Angli".to_owned(),
            components,
        }
    }

    #[test]
    fn blocks_are_rendered_in_order_and_escaped() {
        let html = render_components(&page(vec![
            RenderedComponent::Header {
                title: "Bileta <avioni>".to_owned(),
                subtitle: "s".to_owned(),
            },
            RenderedComponent::Faq(Faq {
                title: "nga Tirana".to_owned(),
                from_city: "Tirana".to_owned(),
                to_city: "London".to_owned(),
                questions: vec![FaqEntry {
                    question: "Sa kushton?".to_owned(),
                    answer: "100€ & më shumë".to_owned(),
                }],
            }),
        ]));

        let header = html.find("seo-header").unwrap();
        let faq = html.find("seo-faq").unwrap();
        assert!(header < faq);
        assert!(html.contains("Bileta &lt;avioni&gt;"));
        assert!(html.contains("100€ &amp; më shumë"));
    }

    #[test]
    fn empty_pricing_table_says_so() {
        let html = render_components(&page(vec![RenderedComponent::PricingTable {
            title: "nga Tirana për Angli".to_owned(),
            from_city: "Tirana".to_owned(),
            to_city: "London".to_owned(),
            rows: vec![],
            summary: None,
        }]));
        assert!(html.contains("nuk janë ende të disponueshme"));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn empty_related_block_is_left_out() {
        let html = render_components(&page(vec![RenderedComponent::RelatedDestinations {
            title: "Destinacione".to_owned(),
            links: vec![],
        }]));
        assert_eq!(html, "<main class=\"seo-page\"></main>");
    }
}
