mod client;
mod handlers;

pub use crate::client::{AiClient, ClientError, CompletionClient};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub ai: Arc<dyn CompletionClient>,
}

/// Mount the API on `router`. Fails fast when the bearer token is absent
/// from the environment.
pub fn init(router: Router<AppState>) -> Result<Router<()>, ClientError> {
    let ai = AiClient::from_env()?;
    Ok(routes(router, AppState { ai: Arc::new(ai) }))
}

fn routes(router: Router<AppState>, state: AppState) -> Router<()> {
    router
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/match-actor",
            post(handlers::match_actor).fallback(handlers::method_not_allowed),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
