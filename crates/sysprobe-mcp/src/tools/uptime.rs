//! Tool: uptime: reports time since boot.

use serde_json::json;
use serde_json::value::RawValue;
use sysprobe::ProcFs;

use crate::cancel::CancelToken;
use crate::types::{ToolCallResult, ToolDefinition};

use super::ensure_no_arguments;
use super::registry::ToolOutcome;

pub fn definition() -> ToolDefinition {
    ToolDefinition::new("uptime", "Report system uptime and aggregate idle time.").with_schema(
        json!({
            "type": "object",
            "additionalProperties": false
        }),
    )
}

pub async fn execute(args: Option<Box<RawValue>>, _cancel: CancelToken) -> ToolOutcome {
    ensure_no_arguments("uptime", args.as_deref())?;
    let uptime = ProcFs::default().uptime()?;
    Ok(Some(ToolCallResult::text(format!(
        "Uptime: {}\nIdle: {:.0}s",
        human_duration(uptime.uptime_secs),
        uptime.idle_secs
    ))))
}

fn human_duration(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let (days, rem) = (total / 86_400, total % 86_400);
    let (hours, rem) = (rem / 3_600, rem % 3_600);
    let (minutes, seconds) = (rem / 60, rem % 60);
    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else {
        format!("{hours}h {minutes}m {seconds}s")
    }
}
