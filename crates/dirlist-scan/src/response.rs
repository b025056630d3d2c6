//! The single result shape returned to callers.

use dirlist_core::{ErrorKind, ListError, ResultTree};
use serde::{Deserialize, Serialize};

/// Successful listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSuccess {
    pub success: bool,
    pub files: ResultTree,
}

/// Failed listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFailure {
    /// Always `directoryError`.
    pub error: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of one external method call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceResponse {
    Success(ListSuccess),
    Error(ListFailure),
}

impl ServiceResponse {
    pub fn success(files: ResultTree) -> Self {
        Self::Success(ListSuccess {
            success: true,
            files,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn files(&self) -> Option<&ResultTree> {
        match self {
            Self::Success(s) => Some(&s.files),
            Self::Error(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ListFailure> {
        match self {
            Self::Error(f) => Some(f),
            Self::Success(_) => None,
        }
    }
}

impl From<ListError> for ServiceResponse {
    fn from(err: ListError) -> Self {
        match err.kind() {
            ErrorKind::Input => tracing::debug!("listing rejected: {err}"),
            ErrorKind::Traversal => tracing::error!("listing failed: {err}"),
        }
        Self::Error(ListFailure {
            error: err.category().to_string(),
            kind: err.kind(),
            message: err.to_string(),
        })
    }
}

impl From<Result<ResultTree, ListError>> for ServiceResponse {
    fn from(result: Result<ResultTree, ListError>) -> Self {
        match result {
            Ok(files) => Self::success(files),
            Err(err) => err.into(),
        }
    }
}
