//! HTTP routes
//!
//! Implements the external-dns webhook provider contract:
//! - `GET /` negotiation (media type + domain filter)
//! - `GET /records` current records
//! - `POST /records` apply a change set
//! - `POST /adjustendpoints` endpoint adjustment hook
//! - `/healthz` liveness, any method

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{any, get, post},
};
use hostsdns_core::endpoint::decode;
use hostsdns_core::{Changes, Endpoint, HostsProvider, MEDIA_TYPE};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::WebhookError;

/// Provider shared by all handlers
pub type SharedProvider = Arc<HostsProvider>;

/// Build the webhook router around `provider`
pub fn create_router(provider: SharedProvider) -> Router {
    Router::new()
        .route("/", get(negotiate_handler).fallback(method_not_allowed))
        .route(
            "/records",
            get(records_handler)
                .post(apply_changes_handler)
                .fallback(method_not_allowed),
        )
        .route(
            "/adjustendpoints",
            post(adjust_endpoints_handler).fallback(method_not_allowed),
        )
        .route("/healthz", any(healthz_handler))
        .with_state(provider)
}

/// JSON body tagged with the webhook media type
fn webhook_json<T: Serialize>(status: StatusCode, value: &T) -> Result<Response, WebhookError> {
    let body = serde_json::to_vec(value)
        .map_err(|e| WebhookError::Internal(format!("encode response: {}", e)))?;
    Ok((status, [(header::CONTENT_TYPE, MEDIA_TYPE)], body).into_response())
}

async fn method_not_allowed() -> WebhookError {
    WebhookError::MethodNotAllowed
}

async fn negotiate_handler(State(provider): State<SharedProvider>) -> Result<Response, WebhookError> {
    debug!("Negotiation request");
    webhook_json(StatusCode::OK, &provider.domain_filter())
}

async fn records_handler(State(provider): State<SharedProvider>) -> Result<Response, WebhookError> {
    let endpoints = provider.records().await?;
    debug!("Returning {} record(s)", endpoints.len());
    webhook_json(StatusCode::OK, &endpoints)
}

async fn apply_changes_handler(
    State(provider): State<SharedProvider>,
    body: Bytes,
) -> Result<Response, WebhookError> {
    // Decode fully before touching the file
    let changes: Changes = decode(&body)?;
    debug!(
        "Change set: {} create(s), {} delete(s), {} update(s)",
        changes.create.len(),
        changes.delete.len(),
        changes.update_new.len()
    );

    provider.apply_changes(&changes).await?;
    Ok((StatusCode::NO_CONTENT, [(header::CONTENT_TYPE, MEDIA_TYPE)]).into_response())
}

async fn adjust_endpoints_handler(
    State(provider): State<SharedProvider>,
    body: Bytes,
) -> Result<Response, WebhookError> {
    let endpoints: Vec<Endpoint> = decode(&body)?;
    let adjusted = provider.adjust_endpoints(endpoints);
    debug!("Adjusted {} endpoint(s)", adjusted.len());
    webhook_json(StatusCode::OK, &adjusted)
}

async fn healthz_handler() -> &'static str {
    "ok"
}
