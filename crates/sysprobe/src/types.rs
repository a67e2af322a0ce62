//! Core data types for system readings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load averages over the last 1, 5, and 15 minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Aggregate CPU jiffies from the first `cpu` line of `/proc/stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CpuTimes {
    /// `idle` + `iowait`.
    pub idle: u64,
    pub total: u64,
}

impl CpuTimes {
    /// Utilization between this sample and a later one, clamped to `[0, 1]`.
    pub fn usage_until(&self, later: &CpuTimes) -> f64 {
        let total = later.total.saturating_sub(self.total);
        if total == 0 {
            return 0.0;
        }
        let idle = later.idle.saturating_sub(self.idle);
        let usage = 1.0 - idle as f64 / total as f64;
        usage.clamp(0.0, 1.0)
    }
}

/// Memory and swap figures from `/proc/meminfo`, in kibibytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_kib: u64,
    pub available_kib: u64,
    pub swap_total_kib: u64,
    pub swap_free_kib: u64,
}

impl MemoryInfo {
    pub fn used_kib(&self) -> u64 {
        self.total_kib.saturating_sub(self.available_kib)
    }

    pub fn swap_used_kib(&self) -> u64 {
        self.swap_total_kib.saturating_sub(self.swap_free_kib)
    }

    /// Fraction of memory in use, `0.0` when the total is unknown.
    pub fn used_ratio(&self) -> f64 {
        if self.total_kib == 0 {
            return 0.0;
        }
        self.used_kib() as f64 / self.total_kib as f64
    }
}

/// Seconds since boot and aggregate idle seconds from `/proc/uptime`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Uptime {
    pub uptime_secs: f64,
    pub idle_secs: f64,
}

/// Errors raised while reading or parsing probe sources.
#[derive(thiserror::Error, Debug)]
pub enum ProbeError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected {0} format")]
    Format(&'static str),

    #[error("parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },
}

pub type ProbeResult<T> = Result<T, ProbeError>;
