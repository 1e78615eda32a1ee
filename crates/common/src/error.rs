use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required argument was absent or malformed. The only error that
    /// reaches callers of `dispatch` as a hard failure.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("formatter {formatter} failed: {message}")]
    Formatter { formatter: String, message: String },

    #[error("processor {processor} failed: {source}")]
    Processor {
        processor: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    External(#[from] anyhow::Error),

    #[error("internal error")]
    Other {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    #[must_use]
    pub fn formatter(formatter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Formatter {
            formatter: formatter.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn processor(
        processor: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processor {
            processor: processor.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn other(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other {
            source: Box::new(source),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
