//! MCP request parameter types and strict params decoding.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use super::error::{McpError, McpResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PingParams {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolCallParams {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Box<RawValue>>,
}

/// Decode handler params, rejecting unknown fields.
///
/// Returns `Ok(None)` when the envelope carried no params.
pub fn decode_params<T: DeserializeOwned>(raw: Option<&RawValue>) -> McpResult<Option<T>> {
    raw.map(|raw| serde_json::from_str(raw.get()))
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str) -> Box<RawValue> {
        RawValue::from_string(text.to_string()).unwrap()
    }

    #[test]
    fn test_absent_params() {
        let decoded: Option<PingParams> = decode_params(None).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let params = raw(r#"{"message":"hi","extra":1}"#);
        let err = decode_params::<PingParams>(Some(&params)).unwrap_err();
        assert_eq!(err.code(), -32602);
        assert!(err.to_string().contains("extra"), "got: {err}");
    }

    #[test]
    fn test_tool_call_arguments_stay_raw() {
        let params = raw(r#"{"name":"echo","arguments":{"message":"hello"}}"#);
        let decoded: ToolCallParams = decode_params(Some(&params)).unwrap().unwrap();
        assert_eq!(decoded.name, "echo");
        assert_eq!(decoded.arguments.unwrap().get(), r#"{"message":"hello"}"#);
    }
}
