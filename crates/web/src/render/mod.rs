//! HTML documents served to crawlers and on first paint.

use std::fmt::Write as _;

use seo::{assembler::AssembledPage, page::PageData};
use serde::Serialize;

use crate::config::SiteConfig;

pub mod components;
pub mod head;

const STYLESHEET: &str = "/assets/index.css";
const CLIENT_SCRIPT: &str = "/assets/index.js";

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// JSON that can be placed inside a `<script>` element: no `<` survives, so
/// neither `</script>` nor `<!--` can end the element early.
pub fn script_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}

/// What the client application picks up instead of fetching the page again.
#[derive(Serialize)]
struct PreloadedState<'a> {
    seo_data: &'a PageData,
    page: &'a AssembledPage,
}

/// The full document for a route page.
pub fn render_document(
    page: &AssembledPage,
    data: &PageData,
    site: &SiteConfig,
) -> serde_json::Result<String> {
    let head = head::render_head(page, site)?;
    let body = components::render_components(page);
    let state = script_json(&PreloadedState {
        seo_data: data,
        page,
    })?;

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"sq\">\n  <head>\n");
    html.push_str("    <meta charset=\"UTF-8\" />\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n",
    );
    html.push_str(&head);
    let _ = writeln!(html, "    <link rel=\"stylesheet\" href=\"{STYLESHEET}\">");
    html.push_str("  </head>\n  <body>\n");
    let _ = writeln!(html, "    <div id=\"root\">{body}</div>");
    let _ = writeln!(html, "    <script type=\"module\" src=\"{CLIENT_SCRIPT}\"></script>");
    let _ = writeln!(html, "    <script>window.__PRELOADED_STATE__ = {state}</script>");
    html.push_str("  </body>\n</html>\n");
    Ok(html)
}

/// An empty document the client application renders into on its own.
pub fn fallback_shell(site: &SiteConfig) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"sq\">\n  \
         <head>\n    \
         <meta charset=\"UTF-8\" />\n    \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n    \
         <title>{} - Bileta Avioni</title>\n    \
         <link rel=\"stylesheet\" href=\"{STYLESHEET}\">\n  \
         </head>\n  \
         <body>\n    \
         <div id=\"root\"></div>\n    \
         <script type=\"module\" src=\"{CLIENT_SCRIPT}\"></script>\n  \
         </body>\n\
         </html>\n",
        escape_html(&site.site_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape_html("për Tiranë"), "për Tiranë");
    }

    #[test]
    fn script_json_cannot_close_the_script() {
        let json = script_json(&vec!["</script><script>alert(1)</script>"]).unwrap();
        assert!(!json.contains('<'));
        let back: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec!["</script><script>alert(1)</script>"]);
    }

    #[test]
    fn fallback_shell_has_an_empty_root() {
        let html = fallback_shell(&SiteConfig::default());
        assert!(html.contains("<div id=\"root\"></div>"));
        assert!(html.contains("<title>Hima Travel - Bileta Avioni</title>"));
        assert!(!html.contains("__PRELOADED_STATE__"));
    }
}
