//! Error types for the launcher.

use std::path::PathBuf;

use crate::catalog::{ItemId, SectionId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to read the configuration file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the configuration file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML or has the wrong shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("no section with id {0}")]
    UnknownSection(SectionId),

    #[error("no item with id {1} in section {0}")]
    UnknownItem(SectionId, ItemId),

    /// Opening a URL or path with the system opener failed.
    #[error("failed to open {target}: {source}")]
    Launch {
        target: String,
        #[source]
        source: std::io::Error,
    },
}
