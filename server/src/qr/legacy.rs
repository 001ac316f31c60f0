//! Compact text form for manual entry: `ATFI-EVENT:<id>-USER:<address>[-ID:<user_id>]`.

use std::sync::LazyLock;

use chrono::Utc;
use regex::{Captures, Regex};

use super::payload::{Identifier, ParticipantQrPayload};

pub const LEGACY_PREFIX: &str = "ATFI-EVENT";

static WITH_USER_ID: LazyLock<Regex> = LazyLock::new(|| {
    let prefix = regex::escape(LEGACY_PREFIX);
    Regex::new(&format!(r"^{prefix}:(\d+)-USER:([^-]+)-ID:(.+)$"))
        .expect("static regex should not panic")
});
static ADDRESS_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    let prefix = regex::escape(LEGACY_PREFIX);
    Regex::new(&format!(r"^{prefix}:(\d+)-USER:(.+)$")).expect("static regex should not panic")
});

pub fn encode_legacy(event_id: i64, address: &str, user_id: Option<&str>) -> String {
    match user_id {
        Some(id) => format!("{LEGACY_PREFIX}:{event_id}-USER:{address}-ID:{id}"),
        None => format!("{LEGACY_PREFIX}:{event_id}-USER:{address}"),
    }
}

/// Parses the legacy text form, trying the `-ID:` variant first.
///
/// The text carries no creation time, so the returned payload is stamped with
/// the current time. Returns `None` when neither form matches.
pub fn parse_legacy_text(text: &str) -> Option<ParticipantQrPayload> {
    let text = text.trim();

    if let Some(caps) = WITH_USER_ID.captures(text) {
        return build(&caps, Some(3));
    }
    ADDRESS_ONLY
        .captures(text)
        .and_then(|caps| build(&caps, None))
}

fn build(caps: &Captures<'_>, user_id_group: Option<usize>) -> Option<ParticipantQrPayload> {
    let event_id = caps.get(1)?.as_str().parse::<i64>().ok()?;
    let address = caps.get(2).map(|m| m.as_str());
    let user_id = user_id_group.and_then(|group| caps.get(group)).map(|m| m.as_str());

    Some(ParticipantQrPayload {
        event_id,
        identifier: Identifier::resolve(user_id, address)?,
        timestamp: Some(Utc::now().timestamp_millis()),
    })
}
