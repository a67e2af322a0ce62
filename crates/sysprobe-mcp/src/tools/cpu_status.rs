//! Tool: cpu_status: reports load averages and sampled CPU utilization.

use std::time::Duration;

use serde_json::json;
use serde_json::value::RawValue;
use sysprobe::ProcFs;

use crate::cancel::CancelToken;
use crate::types::{ToolCallResult, ToolDefinition};

use super::ensure_no_arguments;
use super::registry::{ToolError, ToolOutcome};

const CPU_SAMPLE_WINDOW: Duration = Duration::from_millis(250);

pub fn definition() -> ToolDefinition {
    ToolDefinition::new("cpu_status", "Report CPU load averages and recent utilization.")
        .with_schema(json!({
            "type": "object",
            "description": "Optional parameters (currently unused).",
            "additionalProperties": false
        }))
}

pub async fn execute(args: Option<Box<RawValue>>, cancel: CancelToken) -> ToolOutcome {
    ensure_no_arguments("cpu_status", args.as_deref())?;

    let procfs = ProcFs::default();
    let load = procfs.load_average()?;
    let usage = sample_usage(&procfs, CPU_SAMPLE_WINDOW, &cancel).await?;
    let cores = std::thread::available_parallelism().map_or(1, |n| n.get());

    let text = format!(
        "CPU cores: {cores}\nLoad average (1m, 5m, 15m): {:.2} {:.2} {:.2}\nSampled utilization: {:.2}% over {:?}",
        load.one,
        load.five,
        load.fifteen,
        usage * 100.0,
        CPU_SAMPLE_WINDOW,
    );

    Ok(Some(ToolCallResult::text(text)))
}

/// Sample aggregate CPU times twice, `window` apart.
///
/// Returns [`ToolError::Cancelled`] as soon as `cancel` fires instead of
/// waiting out the window.
pub async fn sample_usage(
    procfs: &ProcFs,
    window: Duration,
    cancel: &CancelToken,
) -> Result<f64, ToolError> {
    let first = procfs.cpu_times()?;

    tokio::select! {
        _ = cancel.cancelled() => return Err(ToolError::Cancelled),
        _ = tokio::time::sleep(window) => {}
    }

    let second = procfs.cpu_times()?;
    Ok(first.usage_until(&second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn fake_proc() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stat"), "cpu  100 0 100 800 0 0 0 0 0 0\n").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_sample_usage_static_counters() {
        let dir = fake_proc();
        let procfs = ProcFs::new(dir.path());
        let usage = sample_usage(&procfs, Duration::from_millis(5), &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(usage, 0.0);
    }

    #[tokio::test]
    async fn test_cancellation_cuts_the_window_short() {
        let dir = fake_proc();
        let procfs = ProcFs::new(dir.path());
        let cancel = CancelToken::new();
        cancel.cancel();

        let started = Instant::now();
        let err = sample_usage(&procfs, Duration::from_secs(30), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_rejects_arguments() {
        let args = RawValue::from_string(r#"{"verbose":true}"#.to_string()).unwrap();
        let err = execute(Some(args), CancelToken::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "cpu_status does not accept arguments");
    }
}
