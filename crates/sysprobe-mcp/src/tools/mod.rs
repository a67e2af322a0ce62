//! MCP tool implementations.

pub mod cpu_status;
pub mod echo;
pub mod memory_status;
pub mod registry;
pub mod uptime;

use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::types::ToolDefinition;

pub use registry::{
    handler, ToolError, ToolFuture, ToolHandler, ToolOutcome, ToolRegistration, ToolRegistry,
};

/// The bundled tools, in the order they are listed.
pub fn default_tools() -> Vec<(ToolDefinition, ToolHandler)> {
    vec![
        (echo::definition(), handler(echo::execute)),
        (cpu_status::definition(), handler(cpu_status::execute)),
        (memory_status::definition(), handler(memory_status::execute)),
        (uptime::definition(), handler(uptime::execute)),
    ]
}

/// Accept absent, `null`, or empty-object arguments; reject anything else.
pub(crate) fn ensure_no_arguments(tool: &str, raw: Option<&RawValue>) -> Result<(), ToolError> {
    let Some(raw) = raw else {
        return Ok(());
    };

    let payload: Option<Map<String, Value>> = serde_json::from_str(raw.get())
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

    match payload {
        Some(map) if !map.is_empty() => {
            Err(ToolError::Failed(format!("{tool} does not accept arguments")))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str) -> Box<RawValue> {
        RawValue::from_string(text.to_string()).unwrap()
    }

    #[test]
    fn test_no_arguments_accepted() {
        assert!(ensure_no_arguments("t", None).is_ok());
        assert!(ensure_no_arguments("t", Some(&raw("null"))).is_ok());
        assert!(ensure_no_arguments("t", Some(&raw(" {} "))).is_ok());
    }

    #[test]
    fn test_arguments_rejected() {
        let err = ensure_no_arguments("t", Some(&raw(r#"{"a":1}"#))).unwrap_err();
        assert_eq!(err.to_string(), "t does not accept arguments");
        assert!(matches!(
            ensure_no_arguments("t", Some(&raw("[1]"))),
            Err(ToolError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_default_tool_order() {
        let names: Vec<String> = default_tools().into_iter().map(|(d, _)| d.name).collect();
        assert_eq!(names, ["echo", "cpu_status", "memory_status", "uptime"]);
    }
}
