use proptest::prelude::*;

use atfi_checkin_server::qr::{self, Identifier};

proptest! {
    /// encode -> decode keeps the event id and user id for any non-empty id.
    #[test]
    fn qr_payload_roundtrip(event_id in any::<i64>(), user_id in ".+") {
        let raw = qr::encode(event_id, &user_id).unwrap();
        let payload = qr::decode(&raw).unwrap();
        prop_assert_eq!(payload.event_id, event_id);
        prop_assert_eq!(payload.user_id(), Some(user_id.as_str()));
        prop_assert!(payload.timestamp.is_some());
    }

    /// Legacy text with an `-ID:` segment is keyed by the user id.
    #[test]
    fn legacy_text_roundtrip(
        event_id in 0i64..=i64::MAX,
        address in "0x[0-9a-fA-F]{1,40}",
        user_id in "[A-Za-z0-9_:-]{1,32}",
    ) {
        let text = qr::encode_legacy(event_id, &address, Some(user_id.as_str()));
        let payload = qr::parse_legacy_text(&text).unwrap();
        prop_assert_eq!(payload.event_id, event_id);
        prop_assert_eq!(payload.identifier, Identifier::ById(user_id));
    }

    /// Decoding arbitrary text never panics; it either yields a payload or
    /// a malformed-payload error.
    #[test]
    fn decode_arbitrary_text_does_not_panic(raw in ".*") {
        let _ = qr::decode(&raw);
    }
}
