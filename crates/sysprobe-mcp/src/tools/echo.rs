//! Tool: echo: returns a message unchanged.

use serde::Deserialize;
use serde_json::json;
use serde_json::value::RawValue;

use crate::cancel::CancelToken;
use crate::types::{ToolCallResult, ToolDefinition};

use super::registry::{ToolError, ToolOutcome};

#[derive(Debug, Deserialize)]
struct EchoParams {
    #[serde(default)]
    message: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition::new("echo", "Echo a message back to the caller.").with_schema(json!({
        "type": "object",
        "properties": {
            "message": {
                "type": "string",
                "description": "Text to echo back to the caller."
            }
        },
        "required": ["message"]
    }))
}

pub async fn execute(args: Option<Box<RawValue>>, _cancel: CancelToken) -> ToolOutcome {
    let raw = args
        .as_deref()
        .map(RawValue::get)
        .filter(|raw| raw.trim() != "null")
        .ok_or_else(|| ToolError::InvalidArguments("missing arguments".to_string()))?;
    let params: EchoParams =
        serde_json::from_str(raw).map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

    if params.message.is_empty() {
        return Err(ToolError::Failed("message cannot be empty".to_string()));
    }

    Ok(Some(ToolCallResult::text(params.message)))
}
