//! Listing arguments and their validation from loosely typed input.

use std::path::PathBuf;

use dirlist_core::{ListConfig, ListError};
use serde_json::Value;
use url::Url;

/// Validated-shape arguments for one listing call.
///
/// Whether the paths exist is checked by the service, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Roots to list, in order.
    pub files: Vec<PathBuf>,
    pub config: ListConfig,
}

impl ListRequest {
    pub fn new(files: impl IntoIterator<Item = impl Into<PathBuf>>, config: ListConfig) -> Self {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            config,
        }
    }

    /// Parse the argument map accepted by the external methods.
    ///
    /// Recognized keys are `files` (required), `followLinks`, `mimetypes`
    /// and `limit`. Non-string `mimetypes` elements are skipped.
    pub fn from_args(args: &Value) -> Result<Self, ListError> {
        let args = args
            .as_object()
            .ok_or_else(|| ListError::invalid("arguments", "expected an object"))?;

        let files = match args.get("files") {
            None | Some(Value::Null) => return Err(ListError::missing("files")),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(path_from_reference)
                        .ok_or_else(|| {
                            ListError::invalid("files", "non-path argument found in 'files'")
                        })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(ListError::invalid("files", "expected a list of paths")),
        };

        let mut config = ListConfig::default();

        match args.get("followLinks") {
            None | Some(Value::Null) => {}
            Some(Value::Bool(follow)) => config.follow_links = *follow,
            Some(_) => return Err(ListError::invalid("followLinks", "expected a boolean")),
        }

        match args.get("mimetypes") {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                config.mime_filters = items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect();
            }
            Some(_) => return Err(ListError::invalid("mimetypes", "expected a list of strings")),
        }

        match args.get("limit") {
            None | Some(Value::Null) => {}
            Some(Value::Number(n)) => {
                let limit = n.as_u64().ok_or_else(|| {
                    ListError::invalid("limit", format!("{n} is not a non-negative integer"))
                })?;
                config.limit = usize::try_from(limit).unwrap_or(usize::MAX);
            }
            Some(_) => return Err(ListError::invalid("limit", "expected an integer")),
        }

        Ok(Self { files, config })
    }
}

/// Convert a path reference to a filesystem path.
///
/// Accepts plain paths and URLs such as `file:///tmp/x` or `path:///tmp/x`.
/// A URL whose path cannot be decoded keeps its raw path component.
pub fn path_from_reference(reference: &str) -> PathBuf {
    match Url::parse(reference) {
        // Single-letter schemes are Windows drive letters, not URLs.
        Ok(url) if url.scheme().len() > 1 => url
            .to_file_path()
            .unwrap_or_else(|_| PathBuf::from(url.path())),
        _ => PathBuf::from(reference),
    }
}
