use std::path::{Path, PathBuf};

use tracing::*;

use super::MetricsError;

pub const DEFAULT_MEMINFO_PATH: &str = "/proc/meminfo";

/// Memory counters as reported by the kernel, in kibibytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total: u64,
    pub free: u64,
    pub cached: u64,
    pub slab: u64,
    pub buffers: u64,
}

impl MemoryInfo {
    /// Percentage of memory in use once page cache, slab and buffers are
    /// counted as reclaimable, truncated toward zero.
    pub fn used_percent(&self) -> i64 {
        let total = self.total as f64;
        let used = (total
            - self.free as f64
            - self.cached as f64
            - self.slab as f64
            - self.buffers as f64)
            / total;

        (100.0 * used) as i64
    }

    pub fn total_mb(&self) -> i64 {
        (self.total / 1024) as i64
    }

    pub fn free_mb(&self) -> i64 {
        (self.free / 1024) as i64
    }
}

pub trait MemorySource: Send {
    fn read_memory(&mut self) -> Result<MemoryInfo, MetricsError>;
}

/// Reads a `/proc/meminfo` formatted file on every call.
#[derive(Debug, Clone)]
pub struct ProcMeminfo {
    path: PathBuf,
}

impl Default for ProcMeminfo {
    fn default() -> Self {
        Self::new(DEFAULT_MEMINFO_PATH)
    }
}

impl ProcMeminfo {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl MemorySource for ProcMeminfo {
    #[instrument(level = "trace", skip(self), fields(path = ?self.path))]
    fn read_memory(&mut self) -> Result<MemoryInfo, MetricsError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| MetricsError::Io {
            path: self.path.clone(),
            source,
        })?;

        parse_meminfo(&content)
    }
}

/// Parse the content of a meminfo file.
///
/// Lines look like `MemTotal:       16318324 kB`. `MemTotal` and `MemFree` are
/// required, the reclaimable counters default to zero when the kernel does
/// not report them.
pub fn parse_meminfo(content: &str) -> Result<MemoryInfo, MetricsError> {
    let mut total = None;
    let mut free = None;
    let mut info = MemoryInfo::default();

    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };

        let field = match key.trim() {
            "MemTotal" => "MemTotal",
            "MemFree" => "MemFree",
            "Cached" => "Cached",
            "Slab" => "Slab",
            "Buffers" => "Buffers",
            _ => continue,
        };

        let value = rest
            .split_whitespace()
            .next()
            .and_then(|value| value.parse::<u64>().ok())
            .ok_or_else(|| MetricsError::InvalidValue {
                field,
                value: rest.trim().to_string(),
            })?;

        match field {
            "MemTotal" => total = Some(value),
            "MemFree" => free = Some(value),
            "Cached" => info.cached = value,
            "Slab" => info.slab = value,
            _ => info.buffers = value,
        }
    }

    info.total = total.ok_or(MetricsError::MissingField("MemTotal"))?;
    info.free = free.ok_or(MetricsError::MissingField("MemFree"))?;

    if info.total == 0 {
        return Err(MetricsError::EmptyTotal);
    }

    Ok(info)
}
