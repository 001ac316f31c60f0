use std::sync::Arc;

use tracing::{info, warn};

use super::{CheckInOutcome, CheckInRequest, INVALID_QR_MESSAGE};
use crate::qr::{self, ParticipantQrPayload};
use crate::registry::ParticipantRegistry;

/// Turns station scans into registry check-ins.
///
/// Holds no per-scan state; every call returns an outcome and never an error.
#[derive(Clone)]
pub struct CheckInVerifier {
    registry: Arc<dyn ParticipantRegistry>,
}

impl CheckInVerifier {
    pub fn new(registry: Arc<dyn ParticipantRegistry>) -> Self {
        Self { registry }
    }

    /// Checks in the participant behind a scanned ticket QR code.
    pub async fn verify_scan(&self, raw: &str, current_event_id: i64) -> CheckInOutcome {
        match qr::decode(raw) {
            Ok(payload) => self.verify_payload(payload, current_event_id).await,
            Err(e) => {
                warn!(event_id = current_event_id, error = %e, "Rejected scan");
                CheckInOutcome::rejected(INVALID_QR_MESSAGE)
            }
        }
    }

    /// Checks in from text typed at the station in the legacy
    /// `ATFI-EVENT:` form.
    pub async fn verify_manual_entry(&self, text: &str, current_event_id: i64) -> CheckInOutcome {
        match qr::parse_legacy_text(text) {
            Some(payload) => self.verify_payload(payload, current_event_id).await,
            None => {
                warn!(event_id = current_event_id, "Rejected manual entry");
                CheckInOutcome::rejected(INVALID_QR_MESSAGE)
            }
        }
    }

    async fn verify_payload(
        &self,
        payload: ParticipantQrPayload,
        current_event_id: i64,
    ) -> CheckInOutcome {
        if payload.event_id != current_event_id {
            warn!(
                event_id = current_event_id,
                payload_event_id = payload.event_id,
                "QR code belongs to another event"
            );
            return CheckInOutcome::rejected(format!(
                "QR code is for event {}, but this station is checking in event {}",
                payload.event_id, current_event_id
            ));
        }

        let request = CheckInRequest {
            event_id: payload.event_id,
            identifier: payload.identifier,
        };

        match self.registry.check_in(&request).await {
            Ok(outcome) => {
                info!(
                    event_id = request.event_id,
                    success = outcome.success,
                    message = %outcome.message,
                    "Check-in processed"
                );
                outcome
            }
            Err(e) => {
                warn!(event_id = request.event_id, error = %e, "Registry check-in failed");
                CheckInOutcome::rejected(format!("Check-in failed: {e}"))
            }
        }
    }
}
