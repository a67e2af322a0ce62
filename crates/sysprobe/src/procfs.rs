//! Reader for procfs-style files under a configurable root.

use std::path::{Path, PathBuf};

use crate::cpu::{parse_cpu_times, parse_load_average};
use crate::memory::parse_meminfo;
use crate::types::{CpuTimes, LoadAverage, MemoryInfo, ProbeError, ProbeResult, Uptime};
use crate::uptime::parse_uptime;

const DEFAULT_ROOT: &str = "/proc";

/// Reads probe sources relative to a procfs mount point.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load_average(&self) -> ProbeResult<LoadAverage> {
        parse_load_average(&self.read("loadavg")?)
    }

    pub fn cpu_times(&self) -> ProbeResult<CpuTimes> {
        parse_cpu_times(&self.read("stat")?)
    }

    pub fn memory(&self) -> ProbeResult<MemoryInfo> {
        parse_meminfo(&self.read("meminfo")?)
    }

    pub fn uptime(&self) -> ProbeResult<Uptime> {
        parse_uptime(&self.read("uptime")?)
    }

    fn read(&self, name: &str) -> ProbeResult<String> {
        let path = self.root.join(name);
        tracing::trace!("Reading {}", path.display());
        std::fs::read_to_string(&path).map_err(|source| ProbeError::Read { path, source })
    }
}
