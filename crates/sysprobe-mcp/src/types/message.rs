//! JSON-RPC 2.0 envelope types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

use super::error::McpError;

/// JSON-RPC 2.0 protocol version.
pub const JSONRPC_VERSION: &str = "2.0";

/// Client-supplied correlation token.
///
/// Holds the literal JSON text of the id (number, string, or `null`) so it is
/// echoed exactly as received. Every clone owns a fresh allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Box<RawValue>);

impl RequestId {
    /// Build an id from literal JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        RawValue::from_string(json.to_string()).map(Self)
    }

    /// The literal JSON text of the id.
    pub fn as_json(&self) -> &str {
        self.0.get()
    }
}

impl PartialEq for RequestId {
    fn eq(&self, other: &Self) -> bool {
        self.as_json() == other.as_json()
    }
}

impl Eq for RequestId {}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_json())
    }
}

/// An incoming request or notification.
///
/// `params` stays undecoded until a handler asks for it. A missing `id` makes
/// the envelope a notification; an explicit `"id": null` is still a request.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default, deserialize_with = "present_id")]
    pub id: Option<RequestId>,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub params: Option<Box<RawValue>>,
}

fn present_id<'de, D>(deserializer: D) -> Result<Option<RequestId>, D::Error>
where
    D: Deserializer<'de>,
{
    RequestId::deserialize(deserializer).map(Some)
}

impl Envelope {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Raw params, with an explicit `null` treated as absent.
    pub fn params(&self) -> Option<&RawValue> {
        self.params
            .as_deref()
            .filter(|raw| raw.get().trim() != "null")
    }
}

/// A JSON-RPC 2.0 success response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    pub result: Value,
}

/// A JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: String,
    pub id: RequestId,
    pub error: JsonRpcErrorObject,
}

/// Error object within a JSON-RPC error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A response carrying exactly one of `result` or `error`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JsonRpcReply {
    Success(JsonRpcResponse),
    Failure(JsonRpcError),
}

impl JsonRpcResponse {
    /// A `null` result is replaced by an empty object so the field is never
    /// absent on the wire.
    pub fn new(id: RequestId, result: Value) -> Self {
        let result = if result.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            result
        };
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }
    }
}

impl JsonRpcError {
    pub fn new(id: RequestId, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcErrorObject {
                code,
                message,
                data: None,
            },
        }
    }
}

impl JsonRpcReply {
    pub fn from_outcome(id: RequestId, outcome: Result<Value, McpError>) -> Self {
        match outcome {
            Ok(value) => JsonRpcReply::Success(JsonRpcResponse::new(id, value)),
            Err(e) => JsonRpcReply::Failure(e.to_json_rpc_error(id)),
        }
    }

    pub fn id(&self) -> &RequestId {
        match self {
            JsonRpcReply::Success(r) => &r.id,
            JsonRpcReply::Failure(e) => &e.id,
        }
    }

    pub fn error(&self) -> Option<&JsonRpcErrorObject> {
        match self {
            JsonRpcReply::Success(_) => None,
            JsonRpcReply::Failure(e) => Some(&e.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(text: &str) -> Envelope {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_id_keeps_literal_text() {
        let env = envelope(r#"{"jsonrpc":"2.0","id":1.50,"method":"ping"}"#);
        assert_eq!(env.id.unwrap().as_json(), "1.50");

        let env = envelope(r#"{"jsonrpc":"2.0","id":"abc","method":"ping"}"#);
        assert_eq!(env.id.unwrap().as_json(), r#""abc""#);
    }

    #[test]
    fn test_null_id_is_a_request() {
        let env = envelope(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#);
        assert!(!env.is_notification());
        assert_eq!(env.id.unwrap().as_json(), "null");

        let env = envelope(r#"{"jsonrpc":"2.0","method":"ping"}"#);
        assert!(env.is_notification());
    }

    #[test]
    fn test_cloned_id_owns_its_storage() {
        let env = envelope(r#"{"id":"abc","method":"ping"}"#);
        let original = env.id.unwrap();
        let copy = original.clone();
        assert_eq!(copy, original);
        assert_ne!(copy.as_json().as_ptr(), original.as_json().as_ptr());
    }

    #[test]
    fn test_missing_fields_default() {
        let env = envelope("{}");
        assert_eq!(env.jsonrpc, "");
        assert_eq!(env.method, "");
        assert!(env.params().is_none());
    }

    #[test]
    fn test_null_params_are_absent() {
        let env = envelope(r#"{"method":"ping","params":null}"#);
        assert!(env.params().is_none());
        let env = envelope(r#"{"method":"ping","params":{"message":"x"}}"#);
        assert_eq!(env.params().unwrap().get(), r#"{"message":"x"}"#);
    }

    #[test]
    fn test_reply_has_exactly_one_outcome() {
        let id = RequestId::from_json("7").unwrap();
        let ok = JsonRpcReply::from_outcome(id.clone(), Ok(Value::Null));
        let text = serde_json::to_string(&ok).unwrap();
        assert_eq!(text, r#"{"jsonrpc":"2.0","id":7,"result":{}}"#);

        let err = JsonRpcReply::from_outcome(id, Err(McpError::MethodNotFound("x".into())));
        let value: Value = serde_json::from_str(&serde_json::to_string(&err).unwrap()).unwrap();
        assert!(value.get("result").is_none());
        assert_eq!(value["error"], json!({"code": -32601, "message": "method \"x\" not found"}));
    }
}
