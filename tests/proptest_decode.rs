//! Property-based tests for the frame decoder.
//!
//! The decoder faces whatever bytes a client sends; these properties
//! pin down that it classifies without panicking and that well-formed
//! frames survive a decode with id, method and params intact.

use proptest::prelude::*;
use serde_json::Value;
use wp_bridge::protocol::{decode, DecodeOutcome, Frame, RequestId, Response, RpcError};

/// Generate a numeric or string request id, as JSON text.
fn arb_id() -> impl Strategy<Value = String> {
    prop_oneof![
        (0i64..=1_000_000).prop_map(|n| n.to_string()),
        "[a-zA-Z0-9_-]{1,24}".prop_map(|s| format!("\"{}\"", s)),
    ]
}

/// Generate a plausible method name.
fn arb_method() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_/]{0,24}"
}

/// Generate a params object from flat string pairs.
fn arb_params() -> impl Strategy<Value = String> {
    proptest::collection::vec(("[a-z]{1,8}", "[a-zA-Z0-9 ]{0,16}"), 0..4).prop_map(|pairs| {
        let object: serde_json::Map<String, Value> = pairs
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        Value::Object(object).to_string()
    })
}

fn request_line(id: &str, method: &str, params: &str) -> String {
    format!(r#"{{"jsonrpc":"2.0","id":{},"method":"{}","params":{}}}"#, id, method, params)
}

proptest! {
    /// Any byte soup classifies without panicking.
    #[test]
    fn decode_never_panics(raw in "\\PC{0,256}") {
        let _ = decode(&raw);
    }

    /// Any JSON value, valid frame or not, classifies without panicking.
    #[test]
    fn decode_handles_arbitrary_json(raw in arb_params()) {
        let _ = decode(&raw);
    }

    /// Well-formed requests decode with their fields intact.
    #[test]
    fn valid_requests_decode_losslessly(
        id in arb_id(),
        method in arb_method(),
        params in arb_params(),
    ) {
        let line = request_line(&id, &method, &params);
        match decode(&line) {
            DecodeOutcome::Frame(Frame::Request(req)) => {
                prop_assert_eq!(&req.method, &method);
                prop_assert_eq!(req.id.to_string(), id.trim_matches('"'));
                let expected: Value = serde_json::from_str(&params).unwrap();
                prop_assert_eq!(req.params, Some(expected));
            }
            other => prop_assert!(false, "expected request, got {:?}", other),
        }
    }

    /// Notifications (no id) decode as notifications, never requests.
    #[test]
    fn id_less_frames_are_notifications(method in arb_method()) {
        let line = format!(r#"{{"jsonrpc":"2.0","method":"{}"}}"#, method);
        match decode(&line) {
            DecodeOutcome::Frame(Frame::Notification(n)) => {
                prop_assert_eq!(&n.method, &method);
            }
            other => prop_assert!(false, "expected notification, got {:?}", other),
        }
    }

    /// An encoded response decodes back with the same id and outcome.
    #[test]
    fn responses_round_trip(n in 0i64..=1_000_000, is_error in any::<bool>()) {
        let id = RequestId::Number(n);
        let response = if is_error {
            Response::error(id.clone(), RpcError::server_error("boom"))
        } else {
            Response::success(id.clone(), serde_json::json!({"ok": true}))
        };

        let line = response.to_json().unwrap();
        match decode(&line) {
            DecodeOutcome::Frame(Frame::Response(decoded)) => {
                prop_assert_eq!(&decoded.id, &Some(id));
                prop_assert_eq!(decoded.is_error(), is_error);
            }
            other => prop_assert!(false, "expected response, got {:?}", other),
        }
    }

    /// Version tags other than "2.0" are always rejected.
    #[test]
    fn wrong_version_is_invalid(version in "[0-9]\\.[0-9]", n in 0i64..=1000) {
        prop_assume!(version != "2.0");
        let line = format!(r#"{{"jsonrpc":"{}","id":{},"method":"x"}}"#, version, n);
        prop_assert!(matches!(decode(&line), DecodeOutcome::Invalid(_)));
    }
}
