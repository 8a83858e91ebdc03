use std::time::Duration;

use serde::Serialize;

use crate::metrics::{CpuSource, MemorySource, MetricsError};

pub const MEMORY_INTERVAL: Duration = Duration::from_millis(1000);
pub const CPU_INTERVAL: Duration = Duration::from_millis(500);

/// Something that turns host readings into numbered samples at a fixed pace.
pub trait SampleProducer: 'static {
    type Sample: Serialize;

    fn name(&self) -> &'static str;

    fn interval(&self) -> Duration;

    fn produce(&mut self, sequence: i64) -> Result<Self::Sample, MetricsError>;
}

/// Sent as `[sequence, used_percent, total_mb, free_mb]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "[i64; 4]")]
pub struct MemorySample {
    pub sequence: i64,
    pub used_percent: i64,
    pub total_mb: i64,
    pub free_mb: i64,
}

impl From<MemorySample> for [i64; 4] {
    fn from(sample: MemorySample) -> Self {
        [
            sample.sequence,
            sample.used_percent,
            sample.total_mb,
            sample.free_mb,
        ]
    }
}

/// Sent as `[sequence, used_percent]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "[i64; 2]")]
pub struct CpuSample {
    pub sequence: i64,
    pub used_percent: i64,
}

impl From<CpuSample> for [i64; 2] {
    fn from(sample: CpuSample) -> Self {
        [sample.sequence, sample.used_percent]
    }
}

#[derive(Debug)]
pub struct MemoryProducer<S> {
    source: S,
    interval: Duration,
}

impl<S: MemorySource + 'static> MemoryProducer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            interval: MEMORY_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl<S: MemorySource + 'static> SampleProducer for MemoryProducer<S> {
    type Sample = MemorySample;

    fn name(&self) -> &'static str {
        "memory"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn produce(&mut self, sequence: i64) -> Result<MemorySample, MetricsError> {
        let info = self.source.read_memory()?;

        Ok(MemorySample {
            sequence,
            used_percent: info.used_percent(),
            total_mb: info.total_mb(),
            free_mb: info.free_mb(),
        })
    }
}

#[derive(Debug)]
pub struct CpuProducer<S> {
    source: S,
    interval: Duration,
}

impl<S: CpuSource + 'static> CpuProducer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            interval: CPU_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl<S: CpuSource + 'static> SampleProducer for CpuProducer<S> {
    type Sample = CpuSample;

    fn name(&self) -> &'static str {
        "cpu"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn produce(&mut self, sequence: i64) -> Result<CpuSample, MetricsError> {
        let percent = self.source.read_cpu_percent()?;

        Ok(CpuSample {
            sequence,
            used_percent: percent as i64,
        })
    }
}
