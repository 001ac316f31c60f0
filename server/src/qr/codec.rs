use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use super::payload::{Identifier, ParticipantQrPayload};
use super::QrError;

pub const DEFAULT_MAX_AGE_HOURS: u64 = 24;

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Wire shape of a ticket QR code. Field order is part of the format.
#[derive(Serialize)]
struct WirePayload<'a> {
    event_id: i64,
    user_address: &'a str,
    user_id: &'a str,
    timestamp: i64,
}

/// Encodes a freshly issued ticket for `(event_id, user_id)`, stamped with the
/// current time. The address slot is left empty, so `user_id` must not be.
pub fn encode(event_id: i64, user_id: &str) -> Result<String, QrError> {
    if user_id.is_empty() {
        return Err(QrError::malformed("user_id must not be empty"));
    }
    let wire = WirePayload {
        event_id,
        user_address: "",
        user_id,
        timestamp: Utc::now().timestamp_millis(),
    };
    Ok(serde_json::to_string(&wire)?)
}

/// Decodes scanned text into a typed payload.
///
/// `event_id` must be a JSON integer. `user_id` and `user_address` only count
/// when they are strings; at least one of them must be non-empty. Missing or
/// mistyped `timestamp` is left absent.
pub fn decode(raw: &str) -> Result<ParticipantQrPayload, QrError> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| QrError::malformed(format!("not valid JSON: {e}")))?;

    let Value::Object(fields) = value else {
        return Err(QrError::malformed("expected a JSON object"));
    };

    let event_id = fields
        .get("event_id")
        .and_then(Value::as_i64)
        .ok_or_else(|| QrError::malformed("event_id must be an integer"))?;

    let identifier = Identifier::resolve(
        string_field(&fields, "user_id"),
        string_field(&fields, "user_address"),
    )
    .ok_or_else(|| QrError::malformed("no user_id or user_address"))?;

    Ok(ParticipantQrPayload {
        event_id,
        identifier,
        timestamp: fields.get("timestamp").and_then(Value::as_i64),
    })
}

fn string_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

/// Whether the payload is at most `max_age_hours` old.
///
/// Payloads without a timestamp are treated as fresh.
pub fn is_fresh(payload: &ParticipantQrPayload, max_age_hours: u64) -> bool {
    is_fresh_at(payload, max_age_hours, Utc::now().timestamp_millis())
}

pub fn is_fresh_at(payload: &ParticipantQrPayload, max_age_hours: u64, now_ms: i64) -> bool {
    let Some(issued_at) = payload.timestamp else {
        return true;
    };
    let max_age_ms = i64::try_from(max_age_hours)
        .map(|hours| hours.saturating_mul(MILLIS_PER_HOUR))
        .unwrap_or(i64::MAX);
    now_ms.saturating_sub(issued_at) <= max_age_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_then_decode_keeps_event_and_user() {
        let raw = encode(42, "u-1").unwrap();
        let payload = decode(&raw).unwrap();

        assert_eq!(payload.event_id, 42);
        assert_eq!(payload.user_id(), Some("u-1"));
        assert!(payload.timestamp.is_some());
    }

    #[test]
    fn test_encode_rejects_empty_user_id() {
        assert!(matches!(encode(1, ""), Err(QrError::MalformedPayload(_))));
    }

    #[test]
    fn test_encode_then_decode_keeps_awkward_user_ids() {
        for user_id in [" ", "a\"b", "ATFI-EVENT:1-USER:0x1-ID:x", "\u{1F39F} ticket"] {
            let payload = decode(&encode(i64::MIN, user_id).unwrap()).unwrap();
            assert_eq!(payload.event_id, i64::MIN);
            assert_eq!(payload.user_id(), Some(user_id));
        }
    }

    #[test]
    fn test_encode_field_layout() {
        let raw = encode(7, "abc").unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();

        assert!(raw.starts_with(r#"{"event_id":7,"user_address":"","user_id":"abc","timestamp":"#));
        assert_eq!(value["user_address"], "");
        assert!(value["timestamp"].is_i64());
    }

    #[test]
    fn test_decode_minimal_payload_leaves_timestamp_absent() {
        let payload = decode(r#"{"event_id":42,"user_id":"u-1"}"#).unwrap();
        assert_eq!(payload.timestamp, None);
        assert_eq!(payload.user_address(), None);
    }

    #[test]
    fn test_decode_legacy_address_only_payload() {
        let payload = decode(r#"{"event_id":9,"user_address":"0xdead","timestamp":1700000000000}"#)
            .unwrap();
        assert_eq!(payload.identifier, Identifier::ByAddress("0xdead".to_string()));
        assert_eq!(payload.timestamp, Some(1_700_000_000_000));
    }

    #[test]
    fn test_decode_prefers_user_id() {
        let payload = decode(r#"{"event_id":1,"user_id":"abc","user_address":"0xdead"}"#).unwrap();
        assert_eq!(payload.identifier, Identifier::ById("abc".to_string()));
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        let cases = [
            "not json",
            "",
            "[1,2,3]",
            r#""just a string""#,
            r#"{"event_id":42}"#,
            r#"{"event_id":42,"user_id":"","user_address":""}"#,
            r#"{"event_id":42,"user_id":17}"#,
            r#"{"event_id":"42","user_id":"u-1"}"#,
            r#"{"event_id":42.5,"user_id":"u-1"}"#,
            r#"{"event_id":null,"user_id":"u-1"}"#,
            r#"{"user_id":"u-1"}"#,
        ];
        for raw in cases {
            assert!(
                matches!(decode(raw), Err(QrError::MalformedPayload(_))),
                "expected MalformedPayload for {raw:?}"
            );
        }
    }

    #[test]
    fn test_decode_ignores_mistyped_timestamp() {
        let payload = decode(r#"{"event_id":1,"user_id":"a","timestamp":"yesterday"}"#).unwrap();
        assert_eq!(payload.timestamp, None);
    }

    fn stamped(timestamp: Option<i64>) -> ParticipantQrPayload {
        ParticipantQrPayload {
            event_id: 1,
            identifier: Identifier::ById("a".to_string()),
            timestamp,
        }
    }

    #[test]
    fn test_missing_timestamp_is_fresh() {
        assert!(is_fresh_at(&stamped(None), 0, i64::MAX));
    }

    #[test]
    fn test_freshness_threshold() {
        let now = 10 * MILLIS_PER_HOUR;
        assert!(is_fresh_at(&stamped(Some(now - 24 * MILLIS_PER_HOUR + 1)), 24, now));
        assert!(is_fresh_at(&stamped(Some(now - 2 * MILLIS_PER_HOUR)), 2, now));
        assert!(!is_fresh_at(&stamped(Some(now - 2 * MILLIS_PER_HOUR - 1)), 2, now));
    }

    #[test]
    fn test_future_timestamp_is_fresh() {
        assert!(is_fresh_at(&stamped(Some(5_000)), 1, 1_000));
    }

    #[test]
    fn test_just_encoded_payload_is_fresh() {
        let payload = decode(&encode(3, "x").unwrap()).unwrap();
        assert!(is_fresh(&payload, DEFAULT_MAX_AGE_HOURS));
    }
}
