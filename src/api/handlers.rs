//! HTTP request handlers
//!
//! Each handler extracts the request, calls the [`CouponEngine`](crate::core::CouponEngine),
//! and wraps the outcome in an [`ApiResponse`].

use super::{
    AppState,
    auth::{AuthUser, COUPON_ADMINS, COUPON_WRITERS},
    requests::{CreateCouponRequest, ListCouponsQuery, UpdateCouponRequest, ValidateCouponRequest},
    response::ApiResponse,
};
use crate::{
    core::{Coupon, Validation},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};

fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| Error::invalid_input(rejection.body_text()))
}

fn coupon_id(path: std::result::Result<Path<i64>, PathRejection>) -> Result<i64> {
    path.map(|Path(id)| id)
        .map_err(|_| Error::invalid_input("Invalid coupon id"))
}

fn found(id: i64, coupon: Option<Coupon>) -> Result<Coupon> {
    coupon.ok_or(Error::CouponNotFound { id })
}

/// `GET /api/coupons` - list with optional `isActive`, `type`, and `search` filters
#[instrument(skip(state))]
pub async fn list_coupons(
    State(state): State<AppState>,
    _user: AuthUser,
    query: std::result::Result<Query<ListCouponsQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(query) = query.map_err(|rejection| Error::invalid_input(rejection.body_text()))?;
    let coupons = state.engine.list(&query.into_filter()?).await?;
    let count = coupons.len();
    Ok(ApiResponse::data(coupons).with_count(count).into_response())
}

/// `GET /api/coupons/:id`
#[instrument(skip(state))]
pub async fn get_coupon(
    State(state): State<AppState>,
    _user: AuthUser,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Response> {
    let id = coupon_id(path)?;
    let coupon = found(id, state.engine.get(id).await?)?;
    Ok(ApiResponse::data(coupon).into_response())
}

/// `POST /api/coupons` - admin or manager
#[instrument(skip(state, payload))]
pub async fn create_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<CreateCouponRequest>, JsonRejection>,
) -> Result<Response> {
    user.require(COUPON_WRITERS)?;
    let input = body(payload)?.into_new_coupon(Utc::now().date_naive())?;
    let coupon = state.engine.create(input).await?;
    Ok(ApiResponse::data(coupon)
        .with_message("Coupon created successfully")
        .into_response_with(StatusCode::CREATED))
}

/// `PUT /api/coupons/:id` - admin or manager
#[instrument(skip(state, payload))]
pub async fn update_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    path: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<UpdateCouponRequest>, JsonRejection>,
) -> Result<Response> {
    user.require(COUPON_WRITERS)?;
    let id = coupon_id(path)?;
    let patch = body(payload)?.into_patch(Utc::now().date_naive())?;
    let coupon = found(id, state.engine.update(id, patch).await?)?;
    Ok(ApiResponse::data(coupon)
        .with_message("Coupon updated successfully")
        .into_response())
}

/// `PATCH /api/coupons/:id/toggle` - admin or manager
#[instrument(skip(state))]
pub async fn toggle_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Response> {
    user.require(COUPON_WRITERS)?;
    let id = coupon_id(path)?;
    let coupon = found(id, state.engine.toggle_active(id).await?)?;
    let message = if coupon.is_active {
        "Coupon activated successfully"
    } else {
        "Coupon deactivated successfully"
    };
    Ok(ApiResponse::data(coupon).with_message(message).into_response())
}

/// `DELETE /api/coupons/:id` - admin only
#[instrument(skip(state))]
pub async fn delete_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Response> {
    user.require(COUPON_ADMINS)?;
    let id = coupon_id(path)?;
    if !state.engine.delete(id).await? {
        return Err(Error::CouponNotFound { id });
    }
    Ok(ApiResponse::message("Coupon deleted successfully").into_response())
}

/// `POST /api/coupons/validate` - quote a discount without redeeming
#[instrument(skip(state, payload))]
pub async fn validate_coupon(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: std::result::Result<Json<ValidateCouponRequest>, JsonRejection>,
) -> Result<Response> {
    let (code, order_amount) = body(payload)?.into_parts()?;
    match state.engine.validate(&code, order_amount).await? {
        Validation::Valid(applied) => Ok(ApiResponse::data(applied)
            .with_message("Coupon is valid")
            .into_response()),
        Validation::Invalid(reason) => {
            info!("Coupon {} rejected: {}", code, reason);
            Ok(ApiResponse::failure(reason.to_string())
                .into_response_with(StatusCode::BAD_REQUEST))
        }
    }
}

/// `POST /api/coupons/:id/redeem` - admin or manager, records one use of a coupon
#[instrument(skip(state))]
pub async fn redeem_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Response> {
    user.require(COUPON_WRITERS)?;
    let id = coupon_id(path)?;
    let coupon = found(id, state.engine.consume(id).await?)?;
    Ok(ApiResponse::data(coupon)
        .with_message("Coupon redeemed successfully")
        .into_response())
}

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    message: &'static str,
    timestamp: String,
    version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "OK",
        message: "BWAdmin Server is running",
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> Response {
    ApiResponse::failure(format!("Route {uri} not found"))
        .into_response_with(StatusCode::NOT_FOUND)
}
