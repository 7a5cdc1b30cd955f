use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::Response,
};
use seo::{assembler::assemble, database::Database, RequestError};
use thiserror::Error;

use crate::{
    common::{document, CONTENT_TYPE_HTML},
    render::{fallback_shell, render_document},
    WebState,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("could not serialize page state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Renders the route page at `path`, `Ok(None)` if there is none.
pub async fn render_route<D: Database>(
    state: &WebState<D>,
    path: &str,
) -> Result<Option<String>, RenderError> {
    let Some(data) = state.seo_client.page_data(path).await? else {
        return Ok(None);
    };
    let page = assemble(&data);
    Ok(Some(render_document(&page, &data, &state.site)?))
}

/// Serves every path no other route claims. Failures never reach the client:
/// without a page the client application gets an empty shell to render into.
pub async fn render_page<D: Database>(State(state): State<WebState<D>>, uri: Uri) -> Response {
    let path = uri.path();
    match render_route(&state, path).await {
        Ok(Some(html)) => document(StatusCode::OK, CONTENT_TYPE_HTML, true, html),
        Ok(None) => {
            log::info!("no route page for {path}, serving client shell");
            fallback(&state)
        }
        Err(why) => {
            log::error!("could not render {path}: {why}");
            fallback(&state)
        }
    }
}

fn fallback<D: Database>(state: &WebState<D>) -> Response {
    document(
        StatusCode::OK,
        CONTENT_TYPE_HTML,
        false,
        fallback_shell(&state.site),
    )
}
