use axum::{
    extract::{OriginalUri, State},
    http::Method,
    response::IntoResponse,
    routing::{get, on},
    Json, Router,
};
use model::connection::RouteSummary;
use seo::database::Database;
use serde_json::json;

use crate::{
    common::{route_not_found, RouteErrorResponse, RouteResult, VecResponse, METHOD_FILTER_ALL},
    WebState,
};

/// Routes shown in the popular routes block of the client application.
pub const POPULAR_ROUTES_LIMIT: usize = 6;

pub fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/routes/popular", get(popular_routes::<D>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn ping() -> impl IntoResponse {
    Json(json!({
        "message": "pong!"
    }))
}

async fn popular_routes<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { seo_client, .. }): State<WebState<D>>,
) -> RouteResult<Json<VecResponse<RouteSummary>>> {
    seo_client
        .featured_routes(POPULAR_ROUTES_LIMIT)
        .await
        .map(|routes| VecResponse::new(routes).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}
