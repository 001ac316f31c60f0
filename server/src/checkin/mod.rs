//! Check-in decisions for a scanning station.

pub mod verifier;

pub use verifier::CheckInVerifier;

use crate::models::Participant;
use crate::qr::Identifier;

pub const INVALID_QR_MESSAGE: &str = "Invalid QR code format";

/// A check-in to perform against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInRequest {
    pub event_id: i64,
    pub identifier: Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInOutcome {
    pub success: bool,
    pub message: String,
    pub participant: Option<Participant>,
}

impl CheckInOutcome {
    pub fn checked_in(participant: Participant, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            participant: Some(participant),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            participant: None,
        }
    }
}
