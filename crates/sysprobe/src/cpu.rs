//! Load average and CPU time parsing.

use crate::types::{CpuTimes, LoadAverage, ProbeError, ProbeResult};

/// Parse the contents of `/proc/loadavg`.
pub fn parse_load_average(content: &str) -> ProbeResult<LoadAverage> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(ProbeError::Format("/proc/loadavg"));
    }

    let mut values = [0.0f64; 3];
    for (slot, field) in values.iter_mut().zip(&fields[..3]) {
        *slot = field.parse().map_err(|e: std::num::ParseFloatError| ProbeError::Parse {
            what: "load average",
            detail: e.to_string(),
        })?;
    }

    Ok(LoadAverage {
        one: values[0],
        five: values[1],
        fifteen: values[2],
    })
}

/// Parse the aggregate `cpu` line of `/proc/stat`.
///
/// Idle time is the sum of the `idle` and `iowait` columns; total is the sum
/// of every column on the line.
pub fn parse_cpu_times(content: &str) -> ProbeResult<CpuTimes> {
    let line = content.lines().next().unwrap_or("");
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 5 || fields[0] != "cpu" {
        return Err(ProbeError::Format("/proc/stat"));
    }

    let mut times = CpuTimes::default();
    for (idx, field) in fields[1..].iter().enumerate() {
        let value: u64 = field.parse().map_err(|e: std::num::ParseIntError| ProbeError::Parse {
            what: "/proc/stat field",
            detail: e.to_string(),
        })?;
        times.total = times
            .total
            .checked_add(value)
            .ok_or_else(|| ProbeError::Parse {
                what: "/proc/stat total",
                detail: "counter sum overflows u64".to_string(),
            })?;
        // idle <= total
        if idx == 3 || idx == 4 {
            times.idle += value;
        }
    }

    Ok(times)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load_average() {
        let load = parse_load_average("0.52 0.41 0.30 2/1024 12345\n").unwrap();
        assert_eq!(load.one, 0.52);
        assert_eq!(load.five, 0.41);
        assert_eq!(load.fifteen, 0.30);
    }

    #[test]
    fn test_parse_cpu_times_overflow() {
        let stat = format!("cpu  {} {} 0 0 0\n", u64::MAX, u64::MAX);
        assert!(matches!(
            parse_cpu_times(&stat),
            Err(ProbeError::Parse { what: "/proc/stat total", .. })
        ));
    }

    #[test]
    fn test_parse_load_average_truncated() {
        assert!(matches!(
            parse_load_average("0.52 0.41"),
            Err(ProbeError::Format(_))
        ));
        assert!(matches!(
            parse_load_average("a b c"),
            Err(ProbeError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_cpu_times() {
        let stat = "cpu  100 0 50 800 50 0 0 0 0 0\ncpu0 50 0 25 400 25 0 0 0 0 0\n";
        let times = parse_cpu_times(stat).unwrap();
        assert_eq!(times.total, 1000);
        assert_eq!(times.idle, 850);
    }

    #[test]
    fn test_parse_cpu_times_rejects_other_lines() {
        assert!(parse_cpu_times("intr 1 2 3 4 5").is_err());
        assert!(parse_cpu_times("cpu 1 2").is_err());
        assert!(parse_cpu_times("").is_err());
    }

    #[test]
    fn test_usage_until() {
        let before = CpuTimes { idle: 800, total: 1000 };
        let after = CpuTimes { idle: 850, total: 1100 };
        assert!((before.usage_until(&after) - 0.5).abs() < 1e-9);
        assert_eq!(before.usage_until(&before), 0.0);
    }

    #[test]
    fn test_usage_clamped() {
        let before = CpuTimes { idle: 0, total: 100 };
        let after = CpuTimes { idle: 500, total: 200 };
        assert_eq!(before.usage_until(&after), 0.0);
    }
}
