//! HTTP API - submission entry point and address check

use crate::error::{FieldError, ValidationError};
use crate::estimation::geocode::lookup_address;
use crate::estimation::{EstimateRequest, EstimationService, PriceEstimate};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub type AppState = Arc<EstimationService>;

#[derive(Serialize, Deserialize)]
pub struct ApiResponse {
    pub message: String,
    pub status: String,
}

#[derive(Deserialize)]
pub struct AddressParams {
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressCheck {
    pub valid: bool,
    pub neighborhood: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    fields: &'a [FieldError],
}

pub struct ApiError(ValidationError);

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: "validation failed",
            fields: &self.0.errors,
        };
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

pub fn build_router(service: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/api/health", get(health_check))
        .route("/api/estimate", post(estimate))
        .route("/api/address/lookup", get(address_lookup))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(service)
}

async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        message: "Estimation API is running!".to_string(),
        status: "ok".to_string(),
    })
}

async fn estimate(
    State(service): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<PriceEstimate>, ApiError> {
    let estimate = service.submit(&req).await?;
    Ok(Json(estimate))
}

async fn address_lookup(
    State(service): State<AppState>,
    Query(params): Query<AddressParams>,
) -> Json<AddressCheck> {
    let found = lookup_address(service.geocoder(), &params.address, service.country()).await;

    Json(AddressCheck {
        valid: found.is_some(),
        neighborhood: found
            .as_ref()
            .and_then(|m| m.neighborhood())
            .map(str::to_string),
        display_name: found.map(|m| m.display_name),
    })
}
