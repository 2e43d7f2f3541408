//! REST API routes configuration

use crate::api::handlers::{self, ApiState};
use crate::api::websocket::ws_handler;
use axum::{
    body::Body,
    http::{header, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// JSON 404 for unknown routes
async fn fallback_handler(uri: Uri) -> impl IntoResponse {
    log::debug!("No route for {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "application/json")],
        Body::from(r#"{"error":"Not Found"}"#),
    )
        .into_response()
}

/// Create the API router with all routes
pub fn create_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ws", get(ws_handler))
        // Vaults
        .route(
            "/api/vaults",
            get(handlers::list_vaults).post(handlers::create_vault),
        )
        .route("/api/vaults/{address}", get(handlers::get_vault))
        .route("/api/vaults/{address}/events", get(handlers::get_vault_events))
        .route("/api/vaults/{address}/digest", get(handlers::get_digest))
        .route("/api/vaults/{address}/sift", post(handlers::sift_signatures))
        .route("/api/vaults/{address}/arm", post(handlers::arm_vault))
        .route("/api/vaults/{address}/cancel", post(handlers::cancel_vault))
        .route("/api/vaults/{address}/release", post(handlers::release_vault))
        .route("/api/vaults/{address}/config", post(handlers::update_config))
        .route(
            "/api/vaults/{address}/emergency",
            post(handlers::emergency_transfer),
        )
        .route("/api/vaults/{address}/deposit", post(handlers::deposit))
        .route("/api/vaults/{address}/tokens", get(handlers::discover_tokens))
        // Tokens
        .route(
            "/api/tokens",
            get(handlers::list_tokens).post(handlers::register_token),
        )
        .fallback(fallback_handler)
        .with_state(state)
        .layer(cors)
}

/// Human-readable route list, printed at start-up
pub fn describe_routes() -> &'static [(&'static str, &'static str, &'static str)] {
    &[
        ("GET", "/health", "Health check"),
        ("GET", "/ws", "WebSocket vault events"),
        ("GET", "/api/vaults", "List vaults"),
        ("POST", "/api/vaults", "Create vault"),
        ("GET", "/api/vaults/{addr}", "Vault state"),
        ("GET", "/api/vaults/{addr}/events", "Recent events"),
        ("GET", "/api/vaults/{addr}/digest", "Message heirs sign"),
        ("POST", "/api/vaults/{addr}/sift", "Check signatures"),
        ("POST", "/api/vaults/{addr}/arm", "Arm a release"),
        ("POST", "/api/vaults/{addr}/cancel", "Cancel (owner)"),
        ("POST", "/api/vaults/{addr}/release", "Release after delay"),
        ("POST", "/api/vaults/{addr}/config", "Update heirs (owner)"),
        ("POST", "/api/vaults/{addr}/emergency", "Emergency transfer (owner)"),
        ("POST", "/api/vaults/{addr}/deposit", "Fund a vault"),
        ("GET", "/api/vaults/{addr}/tokens", "Token balances"),
        ("GET", "/api/tokens", "List tokens"),
        ("POST", "/api/tokens", "Register token"),
    ]
}
