//! XML sitemaps of the route pages, either as one document or as an index
//! of shards.

use std::fmt::Write as _;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use model::connection::SitemapRoute;
use seo::{database::Database, RequestError};
use serde::Deserialize;

use crate::{
    common::{document, plain_text, CONTENT_TYPE_XML},
    WebState,
};

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const GENERATION_FAILED: &str = "Error generating sitemap";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Monthly,
}

impl ChangeFrequency {
    fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Path below the site url, starting with `/`.
    pub path: String,
    pub lastmod: Option<String>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

impl From<SitemapRoute> for SitemapEntry {
    fn from(route: SitemapRoute) -> Self {
        Self {
            path: route.template_url,
            lastmod: route
                .updated_at
                .map(|updated_at| updated_at.format("%Y-%m-%d").to_string()),
            change_frequency: ChangeFrequency::Daily,
            priority: 0.8,
        }
    }
}

/// Pages of the site that are not generated from the catalog.
pub fn static_pages() -> Vec<SitemapEntry> {
    [
        ("/", ChangeFrequency::Daily, 1.0),
        ("/about", ChangeFrequency::Monthly, 0.6),
        ("/contact", ChangeFrequency::Monthly, 0.6),
        ("/privacy", ChangeFrequency::Monthly, 0.4),
        ("/terms", ChangeFrequency::Monthly, 0.4),
    ]
    .into_iter()
    .map(|(path, change_frequency, priority)| SitemapEntry {
        path: path.to_owned(),
        lastmod: None,
        change_frequency,
        priority,
    })
    .collect()
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn urlset(site_url: &str, entries: &[SitemapEntry]) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<urlset xmlns=\"{SITEMAP_NAMESPACE}\">");

    for entry in entries {
        xml.push_str("  <url>\n");
        let _ = writeln!(
            xml,
            "    <loc>{}</loc>",
            escape_xml(&format!("{site_url}{}", entry.path))
        );
        if let Some(lastmod) = &entry.lastmod {
            let _ = writeln!(xml, "    <lastmod>{lastmod}</lastmod>");
        }
        let _ = writeln!(
            xml,
            "    <changefreq>{}</changefreq>",
            entry.change_frequency.as_str()
        );
        let _ = writeln!(xml, "    <priority>{:.1}</priority>", entry.priority);
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

pub fn shard_path(page: usize) -> String {
    format!("/sitemaps/page-{page}.xml")
}

pub fn sitemap_index(site_url: &str, shard_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<sitemapindex xmlns=\"{SITEMAP_NAMESPACE}\">");
    for page in 1..=shard_count {
        xml.push_str("  <sitemap>\n");
        let _ = writeln!(
            xml,
            "    <loc>{}</loc>",
            escape_xml(&format!("{site_url}{}", shard_path(page)))
        );
        xml.push_str("  </sitemap>\n");
    }
    xml.push_str("</sitemapindex>\n");
    xml
}

/// `page-3.xml` -> `3`. Shards are numbered from 1.
pub fn parse_shard_file(file: &str) -> Option<usize> {
    file.strip_prefix("page-")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
        .filter(|page| *page >= 1)
}

fn xml_response(xml: String) -> Response {
    document(StatusCode::OK, CONTENT_TYPE_XML, true, xml)
}

fn failure(what: &str, why: RequestError) -> Response {
    match why {
        RequestError::InvalidArgument(message) => plain_text(StatusCode::BAD_REQUEST, message),
        why => {
            log::error!("could not generate {what}: {why}");
            plain_text(StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED)
        }
    }
}

/// The whole catalog in one document.
pub async fn sitemap<D: Database>(State(state): State<WebState<D>>) -> Response {
    match state
        .seo_client
        .all_active_routes(state.site.sitemap.batch_size)
        .await
    {
        Ok(routes) => {
            log::info!("sitemap with {} routes", routes.len());
            let entries = static_pages()
                .into_iter()
                .chain(routes.into_iter().map(SitemapEntry::from))
                .collect::<Vec<_>>();
            xml_response(urlset(&state.site.site_url, &entries))
        }
        Err(why) => failure("sitemap", why),
    }
}

pub async fn sitemap_index_handler<D: Database>(State(state): State<WebState<D>>) -> Response {
    xml_response(sitemap_index(
        &state.site.site_url,
        state.site.sitemap.shard_count,
    ))
}

async fn shard<D: Database>(state: &WebState<D>, page: usize) -> Response {
    match state
        .seo_client
        .active_routes_page(page, state.site.sitemap.shard_size)
        .await
    {
        Ok(routes) => {
            log::info!("sitemap shard {page} with {} routes", routes.len());
            let entries = routes
                .into_iter()
                .map(SitemapEntry::from)
                .collect::<Vec<_>>();
            xml_response(urlset(&state.site.site_url, &entries))
        }
        Err(why) => failure("sitemap shard", why),
    }
}

/// `GET /sitemaps/page-{N}.xml`
pub async fn sitemap_shard<D: Database>(
    State(state): State<WebState<D>>,
    Path(file): Path<String>,
) -> Response {
    match parse_shard_file(&file) {
        Some(page) => shard(&state, page).await,
        None => plain_text(
            StatusCode::BAD_REQUEST,
            format!("invalid sitemap page '{file}'"),
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct ShardQuery {
    page: Option<String>,
}

/// `GET /sitemap-page.xml?page=N`, the first shard without a page.
pub async fn sitemap_page<D: Database>(
    State(state): State<WebState<D>>,
    Query(query): Query<ShardQuery>,
) -> Response {
    let page = match query.page.as_deref().map(str::trim) {
        None | Some("") => Some(1),
        Some(page) => page.parse::<usize>().ok().filter(|page| *page >= 1),
    };
    match page {
        Some(page) => shard(&state, page).await,
        None => plain_text(StatusCode::BAD_REQUEST, "page must be a number from 1"),
    }
}
