//! Sysprobe: system probes for load, CPU time, memory, and uptime readings.

pub mod cpu;
pub mod memory;
pub mod procfs;
pub mod types;
pub mod uptime;

pub use cpu::{parse_cpu_times, parse_load_average};
pub use memory::parse_meminfo;
pub use procfs::ProcFs;
pub use types::*;
pub use uptime::parse_uptime;
