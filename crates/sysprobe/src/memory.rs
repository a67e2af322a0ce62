//! `/proc/meminfo` parsing.

use crate::types::{MemoryInfo, ProbeError, ProbeResult};

/// Parse the contents of `/proc/meminfo`.
///
/// `MemTotal` is required. `MemAvailable` falls back to `MemFree` on kernels
/// that predate it; swap figures default to zero.
pub fn parse_meminfo(content: &str) -> ProbeResult<MemoryInfo> {
    let mut total = None;
    let mut available = None;
    let mut free = None;
    let mut info = MemoryInfo::default();

    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let slot = match key.trim() {
            "MemTotal" => &mut total,
            "MemAvailable" => &mut available,
            "MemFree" => &mut free,
            "SwapTotal" => {
                info.swap_total_kib = parse_kib(rest)?;
                continue;
            }
            "SwapFree" => {
                info.swap_free_kib = parse_kib(rest)?;
                continue;
            }
            _ => continue,
        };
        *slot = Some(parse_kib(rest)?);
    }

    info.total_kib = total.ok_or(ProbeError::Format("/proc/meminfo"))?;
    info.available_kib = available.or(free).unwrap_or(0);
    Ok(info)
}

fn parse_kib(value: &str) -> ProbeResult<u64> {
    let number = value.split_whitespace().next().unwrap_or("");
    number.parse().map_err(|e: std::num::ParseIntError| ProbeError::Parse {
        what: "/proc/meminfo value",
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "MemTotal:       16303428 kB\n\
                          MemFree:         1203428 kB\n\
                          MemAvailable:    8151714 kB\n\
                          Buffers:          402312 kB\n\
                          SwapTotal:       2097148 kB\n\
                          SwapFree:        2097148 kB\n";

    #[test]
    fn test_parse_meminfo() {
        let info = parse_meminfo(SAMPLE).unwrap();
        assert_eq!(info.total_kib, 16303428);
        assert_eq!(info.available_kib, 8151714);
        assert_eq!(info.used_kib(), 16303428 - 8151714);
        assert_eq!(info.swap_used_kib(), 0);
        assert!((info.used_ratio() - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_available_falls_back_to_free() {
        let info = parse_meminfo("MemTotal: 1000 kB\nMemFree: 250 kB\n").unwrap();
        assert_eq!(info.available_kib, 250);
    }

    #[test]
    fn test_missing_total() {
        assert!(matches!(
            parse_meminfo("MemFree: 250 kB\n"),
            Err(ProbeError::Format(_))
        ));
    }

    #[test]
    fn test_bad_value() {
        assert!(matches!(
            parse_meminfo("MemTotal: lots kB\n"),
            Err(ProbeError::Parse { .. })
        ));
    }
}
