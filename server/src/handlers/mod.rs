use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::Participant;
use crate::qr::{self, ParticipantQrPayload};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{check_in_outcome, created, success};

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "atfi-checkin",
    };

    success(payload, "Health check successful").into_response()
}

#[derive(Debug, Deserialize)]
pub struct RegisterParticipantBody {
    pub user_id: String,
    pub user_address: Option<String>,
}

#[derive(Serialize)]
struct RegistrationPayload {
    participant: Participant,
    qr_data: String,
    /// Legacy text form for manual entry; only issued when an address is known.
    manual_code: Option<String>,
}

pub async fn register_participant(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(body): Json<RegisterParticipantBody>,
) -> Result<Response, AppError> {
    let user_id = body.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::ValidationError("user_id must not be empty".to_string()));
    }
    let user_address = body
        .user_address
        .as_deref()
        .map(str::trim)
        .filter(|address| !address.is_empty());

    let participant = state
        .registry
        .register(event_id, user_id, user_address)
        .await?;
    tracing::info!(event_id, user_id, "Participant registered");

    let manual_code = participant.user_address.as_deref().map(|address| {
        qr::encode_legacy(event_id, address, Some(participant.user_id.as_str()))
    });
    let payload = RegistrationPayload {
        qr_data: qr::encode(event_id, &participant.user_id)?,
        manual_code,
        participant,
    };

    Ok(created(payload, "Participant registered").into_response())
}

#[derive(Debug, Deserialize)]
pub struct ScanBody {
    pub qr_data: String,
}

pub async fn check_in_scan(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(body): Json<ScanBody>,
) -> Result<Response, AppError> {
    if body.qr_data.trim().is_empty() {
        return Err(AppError::ValidationError("qr_data must not be empty".to_string()));
    }

    let outcome = state.verifier.verify_scan(&body.qr_data, event_id).await;
    Ok(check_in_outcome(outcome))
}

#[derive(Debug, Deserialize)]
pub struct ManualEntryBody {
    pub code: String,
}

pub async fn check_in_manual(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(body): Json<ManualEntryBody>,
) -> Result<Response, AppError> {
    if body.code.trim().is_empty() {
        return Err(AppError::ValidationError("code must not be empty".to_string()));
    }

    let outcome = state
        .verifier
        .verify_manual_entry(&body.code, event_id)
        .await;
    Ok(check_in_outcome(outcome))
}

#[derive(Debug, Deserialize)]
pub struct InspectBody {
    pub qr_data: String,
    pub max_age_hours: Option<u64>,
}

#[derive(Serialize)]
struct InspectPayload {
    payload: ParticipantQrPayload,
    fresh: bool,
}

/// Decodes a QR code without checking anyone in, so a station can preview
/// the ticket and its age.
pub async fn inspect_qr(
    State(state): State<AppState>,
    Json(body): Json<InspectBody>,
) -> Result<Response, AppError> {
    let payload = qr::decode(&body.qr_data)?;
    let max_age_hours = body.max_age_hours.unwrap_or(state.qr_max_age_hours);
    let fresh = qr::is_fresh(&payload, max_age_hours);

    Ok(success(InspectPayload { payload, fresh }, "QR code decoded").into_response())
}
