use std::path::PathBuf;

/// Errors raised by the sentiment pipeline stages
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A file could not be read or written
    #[error("unable to access {}: {source}", path.display())]
    Io {
        /// The offending path
        path: PathBuf,

        /// The underlying I/O failure
        source: std::io::Error,
    },

    /// A row in a labelled sentence file could not be parsed
    #[error("malformed row at {}:{line}: {reason}", path.display())]
    Format {
        /// The file containing the row
        path: PathBuf,

        /// 1-based line number of the row
        line: u64,

        /// What was wrong with it
        reason: String,
    },

    /// A stage received empty or degenerate input
    #[error("invalid input to {stage}: {reason}")]
    InvalidInput {
        /// The stage that rejected the input
        stage: &'static str,

        /// What was wrong with it
        reason: String,
    },
}

impl Error {
    /// Attach the offending path to an I/O failure
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Shorthand for an `InvalidInput` error
    pub fn invalid_input(stage: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            stage,
            reason: reason.into(),
        }
    }
}

/// Result alias for the pipeline
pub type Result<T> = std::result::Result<T, Error>;
