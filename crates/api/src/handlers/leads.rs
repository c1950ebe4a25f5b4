//! Lead submission endpoint.
//!
//! ## Flow
//!
//! rate limit → JSON parse → validation → honeypot gate → digest →
//! conditional insert. The first failure short-circuits, and every response
//! renders the `{ ok, error?, idempotent? }` shape.
//!
//! ## Idempotency
//!
//! The stored id is the SHA-256 of the client-generated lead token, so
//! resubmitting the same form (double click, client retry) maps to the same
//! record. A duplicate is answered with `ok: true, idempotent: true`, never
//! an error.
//!
//! ## Endpoints
//!
//! - POST /api/leads - Validate and store a lead submission

use axum::{
    Json, Router,
    body::Bytes,
    debug_handler,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;
use sha2::{Digest, Sha256};
use shared::api::LeadResponse;
use shared::validate::validate_lead;

use crate::{error::AppError, models::LeadRecord, state::AppState, stores::InsertOutcome};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit_lead))
}

/// First comma-separated entry of `x-forwarded-for`, trimmed; "unknown"
/// when absent or empty. Clients without the header all land in one
/// rate-limit bucket.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}

/// Idempotency key: hex SHA-256 of the client-supplied lead token.
fn lead_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[debug_handler]
async fn submit_lead(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let ip = client_ip(&headers);

    if !state.rate_limiter.admit(&ip, Utc::now()).is_allowed() {
        return Err(AppError::External(
            StatusCode::TOO_MANY_REQUESTS,
            "muitas tentativas",
        ));
    }

    let raw: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|_| AppError::Validation("json inválido".to_string()))?;

    let lead = validate_lead(&raw).map_err(AppError::Validation)?;

    // Honeypot tripped: answer exactly like a success so automated
    // submitters learn nothing, and persist nothing.
    if !lead.honeypot.is_empty() {
        tracing::debug!(ip = %ip, "honeypot submission discarded");
        return Ok(Json(LeadResponse::ok()));
    }

    let id = lead_digest(&lead.lead_id);
    let received_at = Utc::now();
    let record = LeadRecord::new(id, received_at, ip, lead);

    match state.store.insert_if_absent(&record).await? {
        InsertOutcome::Inserted => {
            tracing::info!(
                lead_id = %record.id,
                lead_type = record.lead.lead_type.as_str(),
                "lead stored"
            );
            Ok(Json(LeadResponse::ok()))
        }
        InsertOutcome::AlreadyExists => {
            tracing::info!(lead_id = %record.id, "duplicate lead suppressed");
            Ok(Json(LeadResponse::idempotent()))
        }
    }
}
