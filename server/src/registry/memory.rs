use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;

use super::{
    not_registered_message, ParticipantRegistry, RegistryError, ALREADY_CHECKED_IN_MESSAGE,
    CHECKED_IN_MESSAGE,
};
use crate::checkin::{CheckInOutcome, CheckInRequest};
use crate::models::Participant;
use crate::qr::Identifier;

/// Process-local registry, used when no database is configured.
#[derive(Default)]
pub struct InMemoryRegistry {
    participants: RwLock<HashMap<(i64, String), Participant>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParticipantRegistry for InMemoryRegistry {
    #[instrument(skip(self))]
    async fn register(
        &self,
        event_id: i64,
        user_id: &str,
        user_address: Option<&str>,
    ) -> Result<Participant, RegistryError> {
        let key = (event_id, user_id.to_string());
        let mut participants = self.participants.write().await;

        if participants.contains_key(&key) {
            return Err(RegistryError::AlreadyRegistered {
                event_id,
                user_id: user_id.to_string(),
            });
        }
        if let Some(address) = user_address {
            if participants
                .values()
                .any(|p| p.event_id == event_id && p.has_address(address))
            {
                return Err(RegistryError::AddressTaken {
                    event_id,
                    user_address: address.to_string(),
                });
            }
        }

        let participant = Participant::new(
            event_id,
            user_id.to_string(),
            user_address.map(str::to_string),
        );
        participants.insert(key, participant.clone());
        Ok(participant)
    }

    #[instrument(skip(self), fields(event_id = request.event_id))]
    async fn check_in(&self, request: &CheckInRequest) -> Result<CheckInOutcome, RegistryError> {
        let mut participants = self.participants.write().await;

        let found = match &request.identifier {
            Identifier::ById(user_id) => {
                participants.get_mut(&(request.event_id, user_id.clone()))
            }
            Identifier::ByAddress(address) => participants
                .values_mut()
                .find(|p| p.event_id == request.event_id && p.has_address(address)),
        };

        let outcome = match found {
            None => CheckInOutcome::rejected(not_registered_message(request.event_id)),
            Some(participant) if participant.checked_in => {
                CheckInOutcome::rejected(ALREADY_CHECKED_IN_MESSAGE)
            }
            Some(participant) => {
                participant.mark_checked_in();
                CheckInOutcome::checked_in(participant.clone(), CHECKED_IN_MESSAGE)
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn stored(registry: &InMemoryRegistry, event_id: i64, user_id: &str) -> Participant {
        registry
            .participants
            .read()
            .await
            .get(&(event_id, user_id.to_string()))
            .cloned()
            .unwrap()
    }

    fn by_id(event_id: i64, user_id: &str) -> CheckInRequest {
        CheckInRequest {
            event_id,
            identifier: Identifier::ById(user_id.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates() {
        let registry = InMemoryRegistry::new();
        registry.register(1, "u-1", None).await.unwrap();

        let err = registry.register(1, "u-1", None).await.unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRegistered { event_id: 1, .. }));

        // Same user, different event is a separate registration.
        registry.register(2, "u-1", None).await.unwrap();
    }

    #[tokio::test]
    async fn test_check_in_once() {
        let registry = InMemoryRegistry::new();
        registry.register(1, "u-1", None).await.unwrap();

        let first = registry.check_in(&by_id(1, "u-1")).await.unwrap();
        assert!(first.success);
        assert_eq!(first.message, CHECKED_IN_MESSAGE);
        let participant = first.participant.unwrap();
        assert!(participant.checked_in);
        assert!(participant.checked_in_at.is_some());

        let second = registry.check_in(&by_id(1, "u-1")).await.unwrap();
        assert!(!second.success);
        assert_eq!(second.message, ALREADY_CHECKED_IN_MESSAGE);
        assert!(second.participant.is_none());

        let stored = stored(&registry, 1, "u-1").await;
        assert_eq!(stored.checked_in_at, participant.checked_in_at);
    }

    #[tokio::test]
    async fn test_check_in_unknown_participant() {
        let registry = InMemoryRegistry::new();
        registry.register(1, "u-1", None).await.unwrap();

        let outcome = registry.check_in(&by_id(2, "u-1")).await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, not_registered_message(2));
    }

    #[tokio::test]
    async fn test_check_in_by_address_ignores_case() {
        let registry = InMemoryRegistry::new();
        registry.register(4, "u-4", Some("0xDeAd")).await.unwrap();

        let request = CheckInRequest {
            event_id: 4,
            identifier: Identifier::ByAddress("0xdead".to_string()),
        };
        let outcome = registry.check_in(&request).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.participant.unwrap().user_id, "u-4");
    }

    #[tokio::test]
    async fn test_register_rejects_shared_address_within_event() {
        let registry = InMemoryRegistry::new();
        registry.register(1, "a", Some("0xdead")).await.unwrap();

        let err = registry.register(1, "b", Some("0xDEAD")).await.unwrap_err();
        assert!(matches!(err, RegistryError::AddressTaken { event_id: 1, .. }));

        // Another event may reuse the wallet.
        registry.register(2, "b", Some("0xdead")).await.unwrap();

        let request = CheckInRequest {
            event_id: 1,
            identifier: Identifier::ByAddress("0xdead".to_string()),
        };
        let first = registry.check_in(&request).await.unwrap();
        assert_eq!(first.participant.unwrap().user_id, "a");
        let second = registry.check_in(&request).await.unwrap();
        assert_eq!(second.message, ALREADY_CHECKED_IN_MESSAGE);
        assert!(!stored(&registry, 2, "b").await.checked_in);
    }
}
