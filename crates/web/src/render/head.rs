use std::fmt::Write as _;

use seo::assembler::{AssembledPage, HeadMetadata};
use serde_json::{json, Value};

use super::{escape_html, script_json};
use crate::config::SiteConfig;

fn meta_name(html: &mut String, name: &str, content: &str) {
    let _ = writeln!(
        html,
        "    <meta name=\"{name}\" content=\"{}\" />",
        escape_html(content)
    );
}

fn meta_property(html: &mut String, property: &str, content: &str) {
    let _ = writeln!(
        html,
        "    <meta property=\"{property}\" content=\"{}\" />",
        escape_html(content)
    );
}

/// schema.org description of the route, with the endpoints typed as cities
/// when both are cities and as states otherwise.
pub fn structured_data(head: &HeadMetadata, url: &str, site: &SiteConfig) -> Value {
    let mut data = json!({
        "@context": "https://schema.org",
        "@type": "TravelAction",
        "name": head.title,
        "description": head.description,
        "url": url,
        "provider": {
            "@type": "TravelAgency",
            "name": site.site_name,
            "url": site.site_url,
        },
    });

    let endpoints = match (&head.from_city, &head.to_city) {
        (Some(from), Some(to)) => Some(("City", from.as_str(), to.as_str())),
        _ if !head.from_state.is_empty() && !head.to_state.is_empty() => {
            Some(("State", head.from_state.as_str(), head.to_state.as_str()))
        }
        _ => None,
    };
    if let Some((kind, from, to)) = endpoints {
        data["fromLocation"] = json!({ "@type": kind, "name": from });
        data["toLocation"] = json!({ "@type": kind, "name": to });
    }
    data
}

/// Tags for the document head. Pages whose template lists the head component
/// get the full set of social and structured data tags, others only title
/// and description.
pub fn render_head(page: &AssembledPage, site: &SiteConfig) -> serde_json::Result<String> {
    let mut html = String::new();
    let _ = writeln!(html, "    <title>{}</title>", escape_html(&page.title));
    meta_name(&mut html, "description", &page.description);

    let Some(head) = page.head() else {
        return Ok(html);
    };

    let url = format!("{}{}", site.site_url, head.canonical_path);
    let _ = writeln!(
        html,
        "    <link rel=\"canonical\" href=\"{}\" />",
        escape_html(&url)
    );

    meta_property(&mut html, "og:title", &head.title);
    meta_property(&mut html, "og:description", &head.description);
    meta_property(&mut html, "og:type", "website");
    meta_property(&mut html, "og:url", &url);
    meta_property(&mut html, "og:image", &site.og_image_url);
    meta_property(&mut html, "og:site_name", &site.site_name);

    meta_name(&mut html, "twitter:card", "summary_large_image");
    meta_name(&mut html, "twitter:title", &head.title);
    meta_name(&mut html, "twitter:description", &head.description);
    meta_name(&mut html, "twitter:image", &site.og_image_url);

    let _ = writeln!(
        html,
        "    <script type=\"application/ld+json\">{}</script>",
        script_json(&structured_data(head, &url, site))?
    );

    meta_name(&mut html, "robots", "index, follow");
    meta_name(&mut html, "language", "Albanian");
    meta_name(&mut html, "author", &site.site_name);
    meta_name(&mut html, "geo.region", "AL");
    meta_name(
        &mut html,
        "geo.placename",
        head.from_city
            .as_deref()
            .filter(|city| !city.is_empty())
            .unwrap_or(if head.from_state.is_empty() {
                "Albania"
            } else {
                head.from_state.as_str()
            }),
    );

    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(from_city: Option<&str>, to_city: Option<&str>) -> HeadMetadata {
        HeadMetadata {
            title: "Bileta avioni nga Tirana për Londër".to_owned(),
            description: "Fluturime <lira>".to_owned(),
            canonical_path: "/bileta-avioni-tirana-ne-london".to_owned(),
            from_city: from_city.map(str::to_owned),
            to_city: to_city.map(str::to_owned),
            from_state: "Shqipëri".to_owned(),
            to_state: "Angli".to_owned(),
        }
    }

    #[test]
    fn city_pairs_are_typed_as_cities() {
        let data = structured_data(
            &head(Some("Tirana"), Some("London")),
            "https://example.com/x",
            &SiteConfig::default(),
        );
        assert_eq!(data["@type"], "TravelAction");
        assert_eq!(data["fromLocation"]["@type"], "City");
        assert_eq!(data["toLocation"]["name"], "London");
        assert_eq!(data["provider"]["name"], "Hima Travel");
    }

    #[test]
    fn mixed_pairs_fall_back_to_states() {
        let data = structured_data(
            &head(Some("Tirana"), None),
            "https://example.com/x",
            &SiteConfig::default(),
        );
        assert_eq!(data["fromLocation"]["@type"], "State");
        assert_eq!(data["fromLocation"]["name"], "Shqipëri");
    }

    #[test]
    fn head_without_metadata_component_has_title_and_description_only() {
        let page = AssembledPage {
            path: "/x".to_owned(),
            title: "Tirana & London".to_owned(),
            description: "d".to_owned(),
            price_title: String::new(),
            components: vec![],
        };
        let html = render_head(&page, &SiteConfig::default()).unwrap();
        assert!(html.contains("<title>Tirana &amp; London</title>"));
        assert!(!html.contains("og:title"));
        assert!(!html.contains("canonical"));
    }
}
