//! Live telemetry pushed over long-lived client connections.

mod connection;
mod producer;
mod publisher;

pub use connection::{Connection, ConnectionError};
pub use producer::{
    CpuProducer, CpuSample, MemoryProducer, MemorySample, SampleProducer, CPU_INTERVAL,
    MEMORY_INTERVAL,
};
pub use publisher::{serve, Termination};
