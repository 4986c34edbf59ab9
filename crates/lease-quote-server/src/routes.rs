use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use lease_quote_core::lease::normalizer::{RateRequest, ValueRequest};
use lease_quote_core::lease::offer::{DeliveryDirective, OfferRequest};
use lease_quote_core::quote::{self, RateResponse, ValueResponse};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Lease to quote and how the resulting offer should be delivered.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessOfferRequest {
    pub quote: RateRequest,
    #[serde(default)]
    pub delivery: Option<DeliveryDirective>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessOfferResponse {
    pub message: String,
    pub pdf_data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_status: Option<String>,
}

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/calculate-rate", post(calculate_rate))
        .route("/calculate-value", post(calculate_value))
        .route("/process-offer", post(process_offer))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn calculate_rate(
    State(state): State<AppState>,
    body: Result<Json<RateRequest>, JsonRejection>,
) -> Result<Json<RateResponse>, ApiError> {
    let Json(request) = body?;
    let response = quote::calculate_rate(&request, &state.engine)?;
    Ok(Json(response))
}

async fn calculate_value(
    State(state): State<AppState>,
    body: Result<Json<ValueRequest>, JsonRejection>,
) -> Result<Json<ValueResponse>, ApiError> {
    let Json(request) = body?;
    let response = quote::calculate_value(&request, &state.engine)?;
    Ok(Json(response))
}

async fn process_offer(
    State(state): State<AppState>,
    body: Result<Json<ProcessOfferRequest>, JsonRejection>,
) -> Result<Json<ProcessOfferResponse>, ApiError> {
    let Json(body) = body?;
    let params = quote::prepare_offer(&body.quote, &state.engine, Local::now().date_naive())?;
    let request = OfferRequest {
        params,
        delivery: body.delivery,
    };
    request.validate()?;

    let document = state.offer_service.render(&request).await?;
    let pdf = document.pdf_bytes()?;
    info!(
        bytes = pdf.len(),
        delivered = document.email_status.is_some(),
        "offer processed"
    );

    Ok(Json(ProcessOfferResponse {
        message: "Offer document generated".to_string(),
        pdf_data: document.pdf_data,
        email_status: document.email_status,
    }))
}
