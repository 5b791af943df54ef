//! JSON-RPC 2.0 message codec.
//!
//! Defines the wire frames (request, response, notification) and a strict
//! decoder. The decoder never panics on hostile input: every line of bytes
//! is classified as a well-formed frame, an invalid envelope (with the
//! request id recovered when possible, so an error response can be
//! correlated), or unparseable garbage.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC version tag required on every frame.
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes, plus the implementation-defined
/// code used for domain failures (unknown site, upstream API errors).
pub mod error_codes {
    /// Invalid JSON was received.
    pub const PARSE_ERROR: i64 = -32700;
    /// The JSON sent is not a valid request object.
    pub const INVALID_REQUEST: i64 = -32600;
    /// The method does not exist.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Invalid method parameters.
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i64 = -32603;
    /// Domain-level failure raised by a tool handler.
    pub const SERVER_ERROR: i64 = -32000;
}

/// Request identifier. JSON-RPC allows numbers or strings; anything else
/// is rejected by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric id.
    Number(i64),
    /// String id.
    String(String),
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::String(s)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::String(s) => write!(f, "{}", s),
        }
    }
}

/// JSON-RPC 2.0 request (has an id, expects exactly one response).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Version tag, always "2.0".
    pub jsonrpc: String,
    /// Request id echoed back in the response.
    pub id: RequestId,
    /// Method name.
    pub method: String,
    /// Method parameters, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Request {
    /// Create a new request.
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// JSON-RPC 2.0 notification (no id, never answered).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Version tag, always "2.0".
    pub jsonrpc: String,
    /// Method name.
    pub method: String,
    /// Notification parameters, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Notification {
    /// Create a new notification.
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// JSON-RPC 2.0 error object carried inside an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// Error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
    /// Optional structured detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    /// Create an error with an explicit code.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach structured detail.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// `-32600` Invalid Request.
    pub fn invalid_request() -> Self {
        Self::new(error_codes::INVALID_REQUEST, "Invalid Request")
    }

    /// `-32601` Method not found, naming the offending method.
    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
        )
    }

    /// `-32602` Invalid params.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(error_codes::INVALID_PARAMS, message)
    }

    /// `-32603` Internal error.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::INTERNAL_ERROR, message)
    }

    /// `-32000` domain failure; the message is the thrown error text.
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::SERVER_ERROR, message)
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

/// JSON-RPC 2.0 response. The id is `None` only when answering a frame
/// whose id could not be recovered; it serializes as JSON `null` then.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Version tag, always "2.0".
    pub jsonrpc: String,
    /// Id of the request being answered (`null` when unrecoverable).
    pub id: Option<RequestId>,
    /// Success payload. Mutually exclusive with `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error payload. Mutually exclusive with `result`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    /// Create a success response.
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response correlated to a request id.
    pub fn error(id: RequestId, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id),
            result: None,
            error: Some(error),
        }
    }

    /// Create an error response with a `null` id, for frames whose id
    /// was present but unusable.
    pub fn error_null_id(error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: None,
            result: None,
            error: Some(error),
        }
    }

    /// True when the response carries a result.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// True when the response carries an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A fully decoded, well-formed frame.
#[derive(Debug, Clone)]
pub enum Frame {
    /// Client request expecting a response.
    Request(Request),
    /// Fire-and-forget notification.
    Notification(Notification),
    /// Response to a server-initiated request.
    Response(Response),
}

/// Classification of a frame that failed envelope validation. The variant
/// determines whether (and how) an error response can be correlated.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidFrame {
    /// The id was recovered; respond with it.
    WithId(RequestId),
    /// An id key was present but not a number or string; respond with
    /// a `null` id.
    UnusableId,
    /// No id key at all; nothing to respond to.
    NoId,
}

/// Outcome of decoding one raw line.
#[derive(Debug, Clone)]
pub enum DecodeOutcome {
    /// Structurally valid JSON-RPC frame.
    Frame(Frame),
    /// Parsed as JSON but failed envelope validation.
    Invalid(InvalidFrame),
    /// Not JSON at all.
    Unparseable,
}

/// How the id field of an incoming object looked.
enum IdField {
    Absent,
    Valid(RequestId),
    Unusable,
}

fn extract_id(obj: &serde_json::Map<String, Value>) -> IdField {
    match obj.get("id") {
        None => IdField::Absent,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => IdField::Valid(RequestId::Number(i)),
            // Fractional or out-of-range numbers are not valid ids.
            None => IdField::Unusable,
        },
        Some(Value::String(s)) => IdField::Valid(RequestId::String(s.clone())),
        Some(_) => IdField::Unusable,
    }
}

fn invalid_for(id: IdField) -> DecodeOutcome {
    DecodeOutcome::Invalid(match id {
        IdField::Valid(id) => InvalidFrame::WithId(id),
        IdField::Unusable => InvalidFrame::UnusableId,
        IdField::Absent => InvalidFrame::NoId,
    })
}

/// Decode one raw line into a frame classification.
///
/// Validation is strict: the version tag must be exactly `"2.0"`, the id
/// (when present) must be an integer or a string, and the method (when
/// present) must be a string. A frame with a valid method and no id is a
/// notification. A frame with no method but a result or error is an
/// inbound response. Everything else is invalid, with the id recovered
/// where the frame allows it.
pub fn decode(raw: &str) -> DecodeOutcome {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(_) => return DecodeOutcome::Unparseable,
    };

    let Some(obj) = value.as_object() else {
        // Arrays (batches) and primitives carry no recoverable id.
        return DecodeOutcome::Invalid(InvalidFrame::NoId);
    };

    let id = extract_id(obj);

    if obj.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return invalid_for(id);
    }

    match obj.get("method") {
        Some(Value::String(method)) => match id {
            IdField::Valid(id) => DecodeOutcome::Frame(Frame::Request(Request {
                jsonrpc: JSONRPC_VERSION.to_string(),
                id,
                method: method.clone(),
                params: obj.get("params").cloned(),
            })),
            IdField::Absent => DecodeOutcome::Frame(Frame::Notification(Notification {
                jsonrpc: JSONRPC_VERSION.to_string(),
                method: method.clone(),
                params: obj.get("params").cloned(),
            })),
            IdField::Unusable => DecodeOutcome::Invalid(InvalidFrame::UnusableId),
        },
        Some(_) => invalid_for(id),
        None => decode_response(obj, id),
    }
}

fn decode_response(obj: &serde_json::Map<String, Value>, id: IdField) -> DecodeOutcome {
    let has_result = obj.contains_key("result");
    let error = obj.get("error");

    if has_result == error.is_some() {
        // Neither or both: not a response shape.
        return invalid_for(id);
    }

    let IdField::Valid(id) = id else {
        return invalid_for(id);
    };

    if has_result {
        return DecodeOutcome::Frame(Frame::Response(Response {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id),
            result: obj.get("result").cloned(),
            error: None,
        }));
    }

    match error.and_then(|e| serde_json::from_value::<RpcError>(e.clone()).ok()) {
        Some(err) => DecodeOutcome::Frame(Frame::Response(Response {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id),
            result: None,
            error: Some(err),
        })),
        None => DecodeOutcome::Invalid(InvalidFrame::WithId(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_request(raw: &str) -> Request {
        match decode(raw) {
            DecodeOutcome::Frame(Frame::Request(req)) => req,
            other => panic!("expected request, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_request() {
        let req = decode_request(r#"{"jsonrpc":"2.0","id":1,"method":"listTools"}"#);
        assert_eq!(req.id, RequestId::Number(1));
        assert_eq!(req.method, "listTools");
        assert!(req.params.is_none());
    }

    #[test]
    fn test_decode_request_string_id() {
        let req = decode_request(r#"{"jsonrpc":"2.0","id":"abc-1","method":"initialize","params":{}}"#);
        assert_eq!(req.id, RequestId::String("abc-1".to_string()));
        assert!(req.params.is_some());
    }

    #[test]
    fn test_decode_notification() {
        let outcome = decode(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#);
        match outcome {
            DecodeOutcome::Frame(Frame::Notification(n)) => {
                assert_eq!(n.method, "notifications/initialized");
            }
            other => panic!("expected notification, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_inbound_response() {
        let outcome = decode(r#"{"jsonrpc":"2.0","id":7,"result":{"ok":true}}"#);
        match outcome {
            DecodeOutcome::Frame(Frame::Response(r)) => {
                assert_eq!(r.id, Some(RequestId::Number(7)));
                assert!(r.is_success());
            }
            other => panic!("expected response, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_wrong_version() {
        let outcome = decode(r#"{"jsonrpc":"1.0","id":5,"method":"x"}"#);
        match outcome {
            DecodeOutcome::Invalid(InvalidFrame::WithId(id)) => {
                assert_eq!(id, RequestId::Number(5));
            }
            other => panic!("expected invalid-with-id, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_missing_version() {
        let outcome = decode(r#"{"id":5,"method":"x"}"#);
        assert!(matches!(
            outcome,
            DecodeOutcome::Invalid(InvalidFrame::WithId(RequestId::Number(5)))
        ));
    }

    #[test]
    fn test_decode_rejects_object_id() {
        let outcome = decode(r#"{"jsonrpc":"2.0","id":{},"method":"x"}"#);
        assert!(matches!(
            outcome,
            DecodeOutcome::Invalid(InvalidFrame::UnusableId)
        ));
    }

    #[test]
    fn test_decode_rejects_fractional_id() {
        let outcome = decode(r#"{"jsonrpc":"2.0","id":1.5,"method":"x"}"#);
        assert!(matches!(
            outcome,
            DecodeOutcome::Invalid(InvalidFrame::UnusableId)
        ));
    }

    #[test]
    fn test_decode_rejects_non_string_method() {
        let outcome = decode(r#"{"jsonrpc":"2.0","id":2,"method":42}"#);
        assert!(matches!(
            outcome,
            DecodeOutcome::Invalid(InvalidFrame::WithId(RequestId::Number(2)))
        ));
    }

    #[test]
    fn test_decode_id_without_method_is_invalid() {
        let outcome = decode(r#"{"jsonrpc":"2.0","id":3}"#);
        assert!(matches!(
            outcome,
            DecodeOutcome::Invalid(InvalidFrame::WithId(RequestId::Number(3)))
        ));
    }

    #[test]
    fn test_decode_malformed_without_id_is_dropped() {
        let outcome = decode(r#"{"jsonrpc":"2.0"}"#);
        assert!(matches!(outcome, DecodeOutcome::Invalid(InvalidFrame::NoId)));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(decode("not json at all"), DecodeOutcome::Unparseable));
        assert!(matches!(decode(""), DecodeOutcome::Unparseable));
    }

    #[test]
    fn test_decode_array_is_invalid_without_id() {
        let outcome = decode(r#"[{"jsonrpc":"2.0","id":1,"method":"x"}]"#);
        assert!(matches!(outcome, DecodeOutcome::Invalid(InvalidFrame::NoId)));
    }

    #[test]
    fn test_response_serialization() {
        let resp = Response::success(RequestId::Number(1), serde_json::json!({"tools": []}));
        let json = resp.to_json().unwrap();
        assert!(json.contains(r#""jsonrpc":"2.0""#));
        assert!(json.contains(r#""id":1"#));
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_error_response_null_id() {
        let resp = Response::error_null_id(RpcError::invalid_request());
        let json = resp.to_json().unwrap();
        assert!(json.contains(r#""id":null"#));
        assert!(json.contains("-32600"));
        assert!(json.contains("Invalid Request"));
    }

    #[test]
    fn test_method_not_found_text() {
        let err = RpcError::method_not_found("bogus");
        assert_eq!(err.code, error_codes::METHOD_NOT_FOUND);
        assert!(err.message.contains("Method not found"));
        assert!(err.message.contains("bogus"));
    }

    #[test]
    fn test_notification_omits_params_when_absent() {
        let n = Notification::new("notifications/tools/list_changed", None);
        let json = n.to_json().unwrap();
        assert!(!json.contains("params"));
    }
}
