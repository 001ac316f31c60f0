use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: Uuid,
    pub event_id: i64,
    pub user_id: String,
    pub user_address: Option<String>,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(event_id: i64, user_id: String, user_address: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            user_address,
            checked_in: false,
            checked_in_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Wallet addresses are hex and compare case-insensitively.
    pub fn has_address(&self, address: &str) -> bool {
        self.user_address
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(address))
    }

    pub fn mark_checked_in(&mut self) {
        let now = Utc::now();
        self.checked_in = true;
        self.checked_in_at = Some(now);
        self.updated_at = now;
    }
}
