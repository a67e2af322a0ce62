//! `/proc/uptime` parsing.

use crate::types::{ProbeError, ProbeResult, Uptime};

pub fn parse_uptime(content: &str) -> ProbeResult<Uptime> {
    let mut fields = content.split_whitespace();
    let (Some(up), Some(idle)) = (fields.next(), fields.next()) else {
        return Err(ProbeError::Format("/proc/uptime"));
    };

    let parse = |field: &str| {
        field.parse::<f64>().map_err(|e| ProbeError::Parse {
            what: "/proc/uptime",
            detail: e.to_string(),
        })
    };

    Ok(Uptime {
        uptime_secs: parse(up)?,
        idle_secs: parse(idle)?,
    })
}
