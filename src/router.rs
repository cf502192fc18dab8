use crate::config::PlaidEnvironment;
use crate::db::LinkStore;
use crate::handlers::{info, link};
use crate::plaid::AggregationProvider;
use crate::service::LinkService;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared, immutable state handed to every handler.
#[derive(Clone)]
pub struct BuddyState {
    pub links: LinkService,
    pub environment: PlaidEnvironment,
}

impl BuddyState {
    pub fn new(
        provider: Arc<dyn AggregationProvider>,
        store: Arc<dyn LinkStore>,
        client_name: impl Into<String>,
        environment: PlaidEnvironment,
    ) -> Self {
        Self {
            links: LinkService::new(provider, store, client_name),
            environment,
        }
    }
}

pub fn buddy_router(state: BuddyState) -> Router {
    Router::new()
        .route("/", get(info::api_info))
        .route("/health", get(info::health))
        .route("/api/create_link_token", post(link::create_link_token))
        .route(
            "/api/exchange_and_create_accounts",
            post(link::exchange_and_create_accounts),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
