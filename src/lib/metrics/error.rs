use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Field {0:?} is missing")]
    MissingField(&'static str),

    #[error("Field {field:?} has an invalid value: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Total memory reported as zero")]
    EmptyTotal,

    #[error("CPU usage is not available on this platform")]
    Unsupported,

    #[error("CPU usage reading is not a number: {0}")]
    InvalidReading(f32),
}
