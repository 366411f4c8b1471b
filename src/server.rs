use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;

use crate::config::Config;
use crate::errors::PageError;
use crate::handlers;
use crate::llm::BackendRegistry;
use crate::services::{DataLoader, SearchService};
use crate::types::AppState;

impl AppState {
    /// Wire the live services from configuration; one HTTP client is shared
    pub fn from_config(config: Config) -> Self {
        let client = reqwest::Client::new();
        let backends = BackendRegistry::from_config(&config, client.clone());
        log::debug!("Registered models: {:?}", backends.models().collect::<Vec<_>>());
        Self {
            search: Arc::new(SearchService::new(client.clone(), config.search_url.clone())),
            loader: DataLoader::new(client),
            backends: Arc::new(backends),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_bookmarks))
        .route("/search", get(handlers::handle_search_page))
        .route("/search/events", get(handlers::handle_search_events))
        .route("/static/*path", get(handlers::handle_static))
        .route("/*path", get(handlers::handle_shortcut))
        .with_state(state)
}

pub async fn serve(config: Config) -> Result<(), PageError> {
    let addr = config.socket_addr();
    let app = build_router(AppState::from_config(config));

    let listener = TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await.map_err(PageError::from)
}
