//! Participant QR payloads: the JSON form printed on tickets and the legacy
//! `ATFI-EVENT:` text form used for manual entry.

pub mod codec;
pub mod legacy;
pub mod payload;

pub use codec::{decode, encode, is_fresh, is_fresh_at, DEFAULT_MAX_AGE_HOURS};
pub use legacy::{encode_legacy, parse_legacy_text, LEGACY_PREFIX};
pub use payload::{Identifier, ParticipantQrPayload};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("Malformed QR payload: {0}")]
    MalformedPayload(String),

    #[error("Failed to serialize QR payload")]
    Serialize(#[from] serde_json::Error),
}

impl QrError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        QrError::MalformedPayload(reason.into())
    }
}
