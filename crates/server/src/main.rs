use std::sync::Arc;

use anyhow::Context;
use cinescope_catalog::tmdb::TmdbTransport;
use cinescope_catalog::{BrowseSource, CatalogFetcher, DetailsLookup, SearchScope};
use cinescope_server::config::ServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    info!(
        base_url = %config.catalog.base_url,
        details_mode = ?config.details_mode,
        cast_limit = config.cast_limit,
        "catalog configured"
    );

    let fetcher = CatalogFetcher::new(Arc::new(TmdbTransport::new(config.catalog.clone())));
    let details =
        DetailsLookup::new(fetcher.clone(), config.details_mode).with_cast_limit(config.cast_limit);

    let app_state = cinescope_server::state::AppState {
        fetcher,
        details,
        search_scope: SearchScope::default(),
        fallback: BrowseSource::default(),
        embed_base: config.embed_base.clone(),
    };

    let app = cinescope_server::routes::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .context("failed to bind")?;
    info!(addr = %config.bind, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
