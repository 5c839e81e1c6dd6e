use std::path::PathBuf;

use thiserror::Error;

/// Problems with the scenario description. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failures persisting or summarising replication results.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("histogram setup failed: {0}")]
    Histogram(#[from] hdrhistogram::CreationError),

    #[error("histogram record failed: {0}")]
    Record(#[from] hdrhistogram::RecordError),
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to store results: {0}")]
    Store(#[from] StoreError),
}
