use sysinfo::{CpuExt, System, SystemExt};
use tracing::*;

use super::MetricsError;

pub trait CpuSource: Send {
    /// Utilization in `[0, 100]` since the previous reading, without waiting.
    fn read_cpu_percent(&mut self) -> Result<f64, MetricsError>;
}

/// CPU usage from `sysinfo`, one instance per consumer so the delta between
/// two reads belongs to that consumer alone.
pub struct SysinfoCpu {
    system: System,
}

impl std::fmt::Debug for SysinfoCpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SysinfoCpu").finish_non_exhaustive()
    }
}

impl Default for SysinfoCpu {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoCpu {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu();

        Self { system }
    }
}

impl CpuSource for SysinfoCpu {
    #[instrument(level = "trace", skip(self))]
    fn read_cpu_percent(&mut self) -> Result<f64, MetricsError> {
        if !System::IS_SUPPORTED {
            return Err(MetricsError::Unsupported);
        }

        self.system.refresh_cpu();
        let usage = self.system.global_cpu_info().cpu_usage();
        if !usage.is_finite() {
            return Err(MetricsError::InvalidReading(usage));
        }

        Ok(f64::from(usage).clamp(0.0, 100.0))
    }
}
