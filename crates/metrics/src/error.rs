#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[cfg(feature = "prometheus")]
    #[error(transparent)]
    Prometheus(#[from] metrics_exporter_prometheus::BuildError),

    /// Global label keys must be non-empty Prometheus identifiers.
    #[error("invalid global label key {key:?}")]
    InvalidLabel { key: String },
}

pub type Result<T> = std::result::Result<T, Error>;
