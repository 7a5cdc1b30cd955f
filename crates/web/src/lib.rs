pub use crate::common::RouteResult;

use std::sync::Arc;

use axum::{routing::get, Router};
use seo::{client::Client, database::Database};
use tokio::{net::TcpListener, signal};
use tower_http::services::ServeDir;

use crate::config::SiteConfig;

pub mod api;
pub mod common;
pub mod config;
pub mod render;
pub mod sitemap;
pub mod ssr;

#[derive(Clone)]
pub struct WebState<D: Database> {
    pub seo_client: Client<D>,
    pub site: Arc<SiteConfig>,
}

impl<D: Database> WebState<D> {
    pub fn new(seo_client: Client<D>, site: SiteConfig) -> Self {
        Self {
            seo_client,
            site: Arc::new(site),
        }
    }
}

/// All routes of the site. Paths that match nothing else are rendered as
/// route pages.
pub fn router<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/sitemap.xml", get(sitemap::sitemap::<D>))
        .route(
            "/sitemap-index.xml",
            get(sitemap::sitemap_index_handler::<D>),
        )
        .route("/sitemaps/:file", get(sitemap::sitemap_shard::<D>))
        .route("/sitemap-page.xml", get(sitemap::sitemap_page::<D>))
        .nest_service("/api", api::routes(state.clone()))
        .nest_service("/assets", ServeDir::new(&state.site.assets_dir))
        .fallback(ssr::render_page::<D>)
        .with_state(state)
}

pub async fn start_web_server<D: Database>(state: WebState<D>) -> std::io::Result<()> {
    let bind_address = state.site.bind_address;
    let routes = router(state);

    let listener = TcpListener::bind(bind_address).await?;
    log::info!("listening on {bind_address}");
    axum::serve(listener, routes.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(why) = signal::ctrl_c().await {
            log::error!("could not listen for ctrl-c: {why}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(why) => {
                log::error!("could not listen for SIGTERM: {why}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::info!("signal received, shutting down");
}
