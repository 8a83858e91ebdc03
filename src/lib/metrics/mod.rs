//! Point-in-time readings of host memory and CPU utilization.

mod cpu;
mod error;
mod memory;

pub use cpu::{CpuSource, SysinfoCpu};
pub use error::MetricsError;
pub use memory::{parse_meminfo, MemoryInfo, MemorySource, ProcMeminfo, DEFAULT_MEMINFO_PATH};
