use serde::Serialize;

/// The key a participant is checked in by.
///
/// Current tickets carry a `user_id`; tickets issued before user ids existed
/// only carry the wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Identifier {
    ById(String),
    ByAddress(String),
}

impl Identifier {
    /// Picks the identifier by priority: a non-empty `user_id`, then a
    /// non-empty `user_address`.
    pub fn resolve(user_id: Option<&str>, user_address: Option<&str>) -> Option<Self> {
        match (non_empty(user_id), non_empty(user_address)) {
            (Some(id), _) => Some(Identifier::ById(id.to_string())),
            (None, Some(address)) => Some(Identifier::ByAddress(address.to_string())),
            (None, None) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Identifier::ById(value) | Identifier::ByAddress(value) => value,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// A decoded participant QR payload. Never mutated after decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantQrPayload {
    pub event_id: i64,
    pub identifier: Identifier,
    /// Creation time in milliseconds since the epoch, if the payload had one.
    pub timestamp: Option<i64>,
}

impl ParticipantQrPayload {
    pub fn user_id(&self) -> Option<&str> {
        match &self.identifier {
            Identifier::ById(id) => Some(id),
            Identifier::ByAddress(_) => None,
        }
    }

    pub fn user_address(&self) -> Option<&str> {
        match &self.identifier {
            Identifier::ByAddress(address) => Some(address),
            Identifier::ById(_) => None,
        }
    }
}
