use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::{
    not_registered_message, ParticipantRegistry, RegistryError, ALREADY_CHECKED_IN_MESSAGE,
    CHECKED_IN_MESSAGE,
};
use crate::checkin::{CheckInOutcome, CheckInRequest};
use crate::models::Participant;
use crate::qr::Identifier;

const INSERT_PARTICIPANT: &str = r#"
    INSERT INTO participants (id, event_id, user_id, user_address, checked_in, created_at, updated_at)
    VALUES ($1, $2, $3, $4, FALSE, $5, $5)
    ON CONFLICT DO NOTHING
    RETURNING *
"#;

const CHECK_IN_BY_USER_ID: &str = r#"
    UPDATE participants
    SET checked_in = TRUE, checked_in_at = NOW(), updated_at = NOW()
    WHERE event_id = $1 AND user_id = $2 AND checked_in = FALSE
    RETURNING *
"#;

// Addresses are unique per event (see the migration), so this matches at
// most one row.
const CHECK_IN_BY_ADDRESS: &str = r#"
    UPDATE participants
    SET checked_in = TRUE, checked_in_at = NOW(), updated_at = NOW()
    WHERE event_id = $1 AND LOWER(user_address) = LOWER($2) AND checked_in = FALSE
    RETURNING *
"#;

const EXISTS_BY_USER_ID: &str =
    "SELECT EXISTS (SELECT 1 FROM participants WHERE event_id = $1 AND user_id = $2)";

const EXISTS_BY_ADDRESS: &str = "SELECT EXISTS (SELECT 1 FROM participants \
     WHERE event_id = $1 AND LOWER(user_address) = LOWER($2))";

/// Registry backed by the `participants` table.
#[derive(Clone)]
pub struct PgRegistry {
    pool: PgPool,
}

impl PgRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRegistry for PgRegistry {
    #[instrument(skip(self))]
    async fn register(
        &self,
        event_id: i64,
        user_id: &str,
        user_address: Option<&str>,
    ) -> Result<Participant, RegistryError> {
        let draft = Participant::new(event_id, user_id.to_string(), user_address.map(str::to_string));

        let inserted = sqlx::query_as::<_, Participant>(INSERT_PARTICIPANT)
            .bind(draft.id)
            .bind(draft.event_id)
            .bind(&draft.user_id)
            .bind(&draft.user_address)
            .bind(draft.created_at)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(participant) = inserted {
            return Ok(participant);
        }

        // Either unique key can reject the insert; report the one that did.
        let user_taken: bool = sqlx::query_scalar(EXISTS_BY_USER_ID)
            .bind(event_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Err(match user_address {
            Some(address) if !user_taken => RegistryError::AddressTaken {
                event_id,
                user_address: address.to_string(),
            },
            _ => RegistryError::AlreadyRegistered {
                event_id,
                user_id: user_id.to_string(),
            },
        })
    }

    #[instrument(skip(self), fields(event_id = request.event_id))]
    async fn check_in(&self, request: &CheckInRequest) -> Result<CheckInOutcome, RegistryError> {
        let (update_sql, exists_sql) = match &request.identifier {
            Identifier::ById(_) => (CHECK_IN_BY_USER_ID, EXISTS_BY_USER_ID),
            Identifier::ByAddress(_) => (CHECK_IN_BY_ADDRESS, EXISTS_BY_ADDRESS),
        };
        let key = request.identifier.as_str();

        let updated = sqlx::query_as::<_, Participant>(update_sql)
            .bind(request.event_id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(participant) = updated {
            return Ok(CheckInOutcome::checked_in(participant, CHECKED_IN_MESSAGE));
        }

        let registered: bool = sqlx::query_scalar(exists_sql)
            .bind(request.event_id)
            .bind(key)
            .fetch_one(&self.pool)
            .await?;

        Ok(if registered {
            CheckInOutcome::rejected(ALREADY_CHECKED_IN_MESSAGE)
        } else {
            CheckInOutcome::rejected(not_registered_message(request.event_id))
        })
    }
}
