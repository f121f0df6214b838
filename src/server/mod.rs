mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::address::{AddressResolver, ApiKey, ComplaintsClient};

pub fn build_router(
    resolver: AddressResolver,
    key: ApiKey,
    static_map_endpoint: String,
    complaints: Option<ComplaintsClient>,
) -> Router {
    let state = Arc::new(AppState {
        resolver,
        key,
        static_map_endpoint,
        complaints,
    });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/validate", get(handlers::validate))
        .route("/api/map", get(handlers::map_url))
        .route("/api/complaints", get(handlers::complaints))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, app: Router) -> std::io::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("NYC address validator listening on http://{}", addr);

    axum::serve(listener, app).await
}
