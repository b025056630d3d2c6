//! Directory detection and MIME classification of visited paths.

use std::path::Path;

use dirlist_core::{Entry, ListError};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// MIME type reported for directories.
pub const DIRECTORY_MIME: &str = "inode/directory";

/// MIME type for files nothing recognizes.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Decides what kind of thing a path is.
pub trait PathClassifier {
    /// Whether `path` is a directory, following symbolic links.
    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    /// MIME type of `path`, or `None` if it cannot be determined.
    fn mime_type(&self, path: &Path) -> Option<String>;
}

/// Classifier using magic bytes first, then the file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct MimeClassifier;

impl MimeClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl PathClassifier for MimeClassifier {
    fn mime_type(&self, path: &Path) -> Option<String> {
        if path.is_dir() {
            return Some(DIRECTORY_MIME.to_string());
        }

        // Unreadable files still get an extension-based answer.
        if let Ok(Some(kind)) = infer::get_from_path(path) {
            return Some(kind.mime_type().to_string());
        }

        Some(
            mime_from_extension(path)
                .unwrap_or(FALLBACK_MIME)
                .to_string(),
        )
    }
}

/// Map a file extension to a MIME type.
///
/// Covers text formats that carry no magic bytes plus the common binary
/// formats, for files too short to sniff.
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "txt" | "text" | "log" => "text/plain",
        "htm" | "html" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "md" | "markdown" => "text/markdown",
        "xml" => "text/xml",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "toml" => "application/toml",
        "yaml" | "yml" => "application/yaml",
        "svg" => "image/svg+xml",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "ico" => "image/vnd.microsoft.icon",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "mp3" => "audio/mpeg",
        "wav" => "audio/x-wav",
        "mp4" => "video/mp4",
        _ => return None,
    };
    Some(mime)
}

/// A compiled set of MIME patterns such as `text/plain` or `image/*`.
#[derive(Debug, Clone)]
pub struct MimeFilter {
    patterns: Vec<String>,
    set: GlobSet,
}

impl MimeFilter {
    /// Compile `patterns`. Matching is case-insensitive.
    pub fn new(patterns: &[String]) -> Result<Self, ListError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| ListError::invalid("mimetypes", e.to_string()))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| ListError::invalid("mimetypes", e.to_string()))?;

        Ok(Self {
            patterns: patterns.to_vec(),
            set,
        })
    }

    /// A filter that accepts everything.
    pub fn accept_all() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether a MIME type string matches any pattern.
    pub fn matches_type(&self, mime: &str) -> bool {
        self.set.is_match(mime)
    }

    /// Whether `entry` passes the filter.
    pub fn accepts(&self, classifier: &dyn PathClassifier, entry: &Entry) -> bool {
        if self.is_empty() {
            return true;
        }
        if entry.is_dir {
            return self.matches_type(DIRECTORY_MIME);
        }
        classifier
            .mime_type(&entry.absolute_path)
            .is_some_and(|mime| self.matches_type(&mime))
    }
}

impl Default for MimeFilter {
    fn default() -> Self {
        Self::accept_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct Fixed(&'static str);

    impl PathClassifier for Fixed {
        fn mime_type(&self, _path: &Path) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn filter(patterns: &[&str]) -> MimeFilter {
        let patterns: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        MimeFilter::new(&patterns).unwrap()
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_extension(Path::new("a.txt")), Some("text/plain"));
        assert_eq!(mime_from_extension(Path::new("A.JPG")), Some("image/jpeg"));
        assert_eq!(mime_from_extension(Path::new("noext")), None);
        assert_eq!(mime_from_extension(Path::new("x.unknown")), None);
    }

    #[test]
    fn test_exact_and_wildcard_patterns() {
        let exact = filter(&["image/jpeg"]);
        assert!(exact.matches_type("image/jpeg"));
        assert!(exact.matches_type("IMAGE/JPEG"));
        assert!(!exact.matches_type("image/png"));

        let wildcard = filter(&["image/*"]);
        assert!(wildcard.matches_type("image/png"));
        assert!(!wildcard.matches_type("text/plain"));
    }

    #[test]
    fn test_invalid_pattern_is_input_error() {
        let err = MimeFilter::new(&["image/[".to_string()]).unwrap_err();
        assert_eq!(err.kind(), dirlist_core::ErrorKind::Input);
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = MimeFilter::accept_all();
        let entry = Entry::new(PathBuf::from("/x/y.bin"), "y.bin", false);
        assert!(filter.accepts(&Fixed("application/octet-stream"), &entry));
    }

    #[test]
    fn test_directories_need_directory_pattern() {
        let entry = Entry::new(PathBuf::from("/x/d"), "d", true);
        assert!(!filter(&["text/plain"]).accepts(&Fixed("text/plain"), &entry));
        assert!(filter(&["inode/directory"]).accepts(&Fixed("text/plain"), &entry));
    }

    #[test]
    fn test_accepts_uses_classifier() {
        let entry = Entry::new(PathBuf::from("/x/y"), "y", false);
        let jpeg = filter(&["image/jpeg"]);
        assert!(jpeg.accepts(&Fixed("image/jpeg"), &entry));
        assert!(!jpeg.accepts(&Fixed("image/png"), &entry));
    }
}
