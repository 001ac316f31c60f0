use std::sync::Arc;

use crate::checkin::CheckInVerifier;
use crate::registry::ParticipantRegistry;

/// Shared by every handler; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn ParticipantRegistry>,
    pub verifier: CheckInVerifier,
    pub qr_max_age_hours: u64,
}

impl AppState {
    pub fn new(registry: Arc<dyn ParticipantRegistry>, qr_max_age_hours: u64) -> Self {
        Self {
            verifier: CheckInVerifier::new(registry.clone()),
            registry,
            qr_max_age_hours,
        }
    }
}
