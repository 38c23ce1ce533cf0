//! HTTP API over the coupon engine.

/// Bearer-token authentication
pub mod auth;
/// Error to response mapping
pub mod error;
/// Endpoint handlers
pub mod handlers;
/// Request bodies and query strings
pub mod requests;
/// Response envelope
pub mod response;

use crate::{
    config::ApiTokens,
    core::CouponEngine,
    errors::{Error, Result},
};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, patch, post},
};
use handlers::{
    create_coupon, delete_coupon, get_coupon, health, list_coupons, not_found, redeem_coupon,
    toggle_coupon, update_coupon, validate_coupon,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The coupon engine
    pub engine: Arc<CouponEngine>,
    /// Accepted bearer tokens
    pub tokens: Arc<ApiTokens>,
}

impl AppState {
    /// Bundles an engine and its token table.
    #[must_use]
    pub fn new(engine: Arc<CouponEngine>, tokens: ApiTokens) -> Self {
        Self {
            engine,
            tokens: Arc::new(tokens),
        }
    }
}

fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_coupons).post(create_coupon))
        .route("/validate", post(validate_coupon))
        .route(
            "/:id",
            get(get_coupon).put(update_coupon).delete(delete_coupon),
        )
        .route("/:id/toggle", patch(toggle_coupon))
        .route("/:id/redeem", post(redeem_coupon))
}

/// Builds the application router.
///
/// # Errors
/// Returns [`Error::Config`] when `cors_origin` is not a valid header value.
pub fn router(state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin.parse::<HeaderValue>().map_err(|e| Error::Config {
        message: format!("Invalid CORS origin {cors_origin:?}: {e}"),
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Ok(Router::new()
        .route("/health", get(health))
        .nest("/api/coupons", coupon_routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}
