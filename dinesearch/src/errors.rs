use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the fallible edges of dinesearch.
///
/// Parsing and building never fail; only configuration, dataset loading and
/// name lookups can.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `dinesearch.toml` is not valid TOML or has the wrong shape.
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// A restaurant dataset is not a valid JSON array of records.
    #[error("invalid dataset: {0}")]
    Dataset(#[from] serde_json::Error),

    /// Configuration parsed but holds unusable values.
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },

    /// Feature name that is neither a known key nor a known column.
    #[error("unknown feature: {name}")]
    UnknownFeature { name: String },

    /// A `${VAR}` placeholder referenced an unset environment variable.
    #[error("environment variable {name} not set")]
    MissingEnv { name: String },
}

impl SearchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
