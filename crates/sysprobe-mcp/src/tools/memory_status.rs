//! Tool: memory_status: reports memory and swap usage.

use serde_json::json;
use serde_json::value::RawValue;
use sysprobe::{MemoryInfo, ProcFs};

use crate::cancel::CancelToken;
use crate::types::{ToolCallResult, ToolDefinition};

use super::ensure_no_arguments;
use super::registry::ToolOutcome;

pub fn definition() -> ToolDefinition {
    ToolDefinition::new("memory_status", "Report physical memory and swap usage.").with_schema(
        json!({
            "type": "object",
            "additionalProperties": false
        }),
    )
}

pub async fn execute(args: Option<Box<RawValue>>, _cancel: CancelToken) -> ToolOutcome {
    ensure_no_arguments("memory_status", args.as_deref())?;
    let info = ProcFs::default().memory()?;
    Ok(Some(ToolCallResult::text(render(&info))))
}

fn render(info: &MemoryInfo) -> String {
    format!(
        "Memory: {} used / {} total ({:.1}%), {} available\nSwap: {} used / {} total",
        mib(info.used_kib()),
        mib(info.total_kib),
        info.used_ratio() * 100.0,
        mib(info.available_kib),
        mib(info.swap_used_kib()),
        mib(info.swap_total_kib),
    )
}

fn mib(kib: u64) -> String {
    format!("{:.1} MiB", kib as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let info = MemoryInfo {
            total_kib: 2048,
            available_kib: 1024,
            swap_total_kib: 1024,
            swap_free_kib: 512,
        };
        assert_eq!(
            render(&info),
            "Memory: 1.0 MiB used / 2.0 MiB total (50.0%), 1.0 MiB available\n\
             Swap: 0.5 MiB used / 1.0 MiB total"
        );
    }
}
