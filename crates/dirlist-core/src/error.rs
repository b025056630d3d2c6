//! Error types for listing operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error category reported to callers for every failed listing.
pub const DIRECTORY_ERROR: &str = "directoryError";

/// Errors that can occur during a listing operation.
#[derive(Debug, Error)]
pub enum ListError {
    /// A required argument was not supplied.
    #[error("required {name} parameter missing")]
    MissingArgument { name: String },

    /// An argument was supplied with the wrong type or an unusable value.
    #[error("invalid '{name}' argument: {message}")]
    InvalidArgument { name: String, message: String },

    /// A root path does not exist.
    #[error("{} not found", path.display())]
    NotFound { path: PathBuf },

    /// A root path exists but cannot be inspected.
    #[error("{} is not accessible: {source}", path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory walk failed part way through.
    #[error("traversal failed at '{}' (walk root '{}'): {message}", path.display(), root.display())]
    Traversal {
        path: PathBuf,
        root: PathBuf,
        message: String,
    },
}

/// Coarse classification of a [`ListError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Rejected during validation, before any walk started.
    Input,
    /// The filesystem walk itself failed.
    Traversal,
}

impl ListError {
    /// Create an error for a root path that failed validation.
    pub fn root(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Inaccessible { path, source },
        }
    }

    /// Create an invalid argument error.
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a missing argument error.
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingArgument { name: name.into() }
    }

    /// Which side of the walk this error came from.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingArgument { .. }
            | Self::InvalidArgument { .. }
            | Self::NotFound { .. }
            | Self::Inaccessible { .. } => ErrorKind::Input,
            Self::Traversal { .. } => ErrorKind::Traversal,
        }
    }

    /// The error category string callers see.
    pub fn category(&self) -> &'static str {
        DIRECTORY_ERROR
    }
}
