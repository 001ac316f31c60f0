//! Participant registrations and the check-in side effect.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRegistry;
pub use postgres::PgRegistry;

use async_trait::async_trait;
use thiserror::Error;

use crate::checkin::{CheckInOutcome, CheckInRequest};
use crate::models::Participant;

pub const CHECKED_IN_MESSAGE: &str = "Participant checked in successfully";
pub const ALREADY_CHECKED_IN_MESSAGE: &str = "Participant already checked in";

pub fn not_registered_message(event_id: i64) -> String {
    format!("Participant is not registered for event {event_id}")
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("User {user_id} is already registered for event {event_id}")]
    AlreadyRegistered { event_id: i64, user_id: String },

    #[error("Address {user_address} is already registered for event {event_id}")]
    AddressTaken { event_id: i64, user_address: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Owner of participant registrations.
///
/// `check_in` reports business rejections (unknown participant, repeated
/// check-in) as a failed [`CheckInOutcome`]; `Err` is reserved for failures
/// to reach the backing store. Checking in twice never changes state.
#[async_trait]
pub trait ParticipantRegistry: Send + Sync {
    async fn register(
        &self,
        event_id: i64,
        user_id: &str,
        user_address: Option<&str>,
    ) -> Result<Participant, RegistryError>;

    async fn check_in(&self, request: &CheckInRequest) -> Result<CheckInOutcome, RegistryError>;
}
