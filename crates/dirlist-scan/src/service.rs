//! The listing service: validation, walking and result assembly.

use std::path::PathBuf;

use dirlist_core::{ListError, ListMode, ResultTree};
use serde::Serialize;
use serde_json::Value;

use crate::classifier::{MimeClassifier, MimeFilter, PathClassifier};
use crate::notify::Notify;
use crate::policy::VisitPolicy;
use crate::request::ListRequest;
use crate::response::ServiceResponse;
use crate::walker::{JwalkWalker, TraversalWalker, WalkOptions};

/// Name the service is published under.
pub const SERVICE_NAME: &str = "Directory";

/// Published service version.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Description of one published method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDescription {
    pub name: &'static str,
    pub description: &'static str,
    pub recursive: bool,
    pub structured: bool,
}

/// Directory listing service.
///
/// Every call is independent: validation, walking and result assembly run
/// to completion on the calling thread, with no state kept between calls.
#[derive(Debug, Clone, Default)]
pub struct DirectoryService<W = JwalkWalker, C = MimeClassifier> {
    walker: W,
    classifier: C,
}

impl DirectoryService {
    /// Create a service backed by the filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// The published methods.
    pub fn methods() -> Vec<MethodDescription> {
        ListMode::ALL
            .into_iter()
            .map(|mode| MethodDescription {
                name: mode.method_name(),
                description: mode.description(),
                recursive: mode.is_recursive(),
                structured: !mode.is_flat(),
            })
            .collect()
    }
}

impl<W, C> DirectoryService<W, C>
where
    W: TraversalWalker,
    C: PathClassifier,
{
    /// Create a service with custom collaborators.
    pub fn with_parts(walker: W, classifier: C) -> Self {
        Self { walker, classifier }
    }

    /// Direct children of each root, as flat handles.
    pub fn list(
        &self,
        request: &ListRequest,
        notifier: Option<&mut dyn Notify>,
    ) -> Result<ResultTree, ListError> {
        self.run(ListMode::List, request, notifier)
    }

    /// Everything below each root, as flat handles.
    pub fn recursive_list(
        &self,
        request: &ListRequest,
        notifier: Option<&mut dyn Notify>,
    ) -> Result<ResultTree, ListError> {
        self.run(ListMode::RecursiveList, request, notifier)
    }

    /// Everything below each root, as a nested tree.
    pub fn recursive_list_with_structure(
        &self,
        request: &ListRequest,
        notifier: Option<&mut dyn Notify>,
    ) -> Result<ResultTree, ListError> {
        self.run(ListMode::RecursiveListWithStructure, request, notifier)
    }

    /// Dispatch an external call by method name and collapse the outcome
    /// into the response shape.
    pub fn call(
        &self,
        method: &str,
        args: &Value,
        notifier: Option<&mut dyn Notify>,
    ) -> ServiceResponse {
        let result = ListMode::from_method_name(method)
            .ok_or_else(|| ListError::invalid("method", format!("unknown method '{method}'")))
            .and_then(|mode| {
                let request = ListRequest::from_args(args)?;
                self.run(mode, &request, notifier)
            });
        result.into()
    }

    /// Run one listing operation.
    ///
    /// All roots are checked before any walk starts. A single policy is
    /// shared by every root, so `limit` bounds the whole call.
    pub fn run(
        &self,
        mode: ListMode,
        request: &ListRequest,
        notifier: Option<&mut dyn Notify>,
    ) -> Result<ResultTree, ListError> {
        let roots = self.validate(request)?;
        let filter = if request.config.has_filters() {
            MimeFilter::new(&request.config.mime_filters)?
        } else {
            MimeFilter::accept_all()
        };

        tracing::debug!(
            method = mode.method_name(),
            roots = roots.len(),
            limit = request.config.limit,
            mimetypes = ?filter.patterns(),
            "starting listing"
        );

        let mut policy = VisitPolicy::new(mode.is_flat(), &self.classifier)
            .with_filter(filter)
            .with_limit(request.config.limit);
        if let Some(notifier) = notifier {
            policy = policy.with_notifier(notifier);
        }

        for root in &roots {
            if policy.is_exhausted() {
                break;
            }
            let options = WalkOptions {
                follow_links: request.config.follow_links,
                recursive: mode.is_recursive() && self.classifier.is_directory(root),
            };
            policy.start_root();
            self.walker.walk(root, options, &mut policy)?;
        }

        tracing::debug!(
            visited = policy.visited(),
            accepted = policy.accepted(),
            "listing complete"
        );
        Ok(policy.adopt_tree())
    }

    fn validate(&self, request: &ListRequest) -> Result<Vec<PathBuf>, ListError> {
        if request.files.is_empty() {
            return Err(ListError::invalid("files", "at least one path is required"));
        }
        for path in &request.files {
            std::fs::metadata(path).map_err(|e| ListError::root(path, e))?;
        }
        Ok(request.files.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirlist_core::{Entry, ListConfig, Notification};
    use std::cell::RefCell;
    use std::path::Path;
    use tempfile::TempDir;

    use crate::walker::{VisitOutcome, Visitor};

    /// Replays a fixed entry list for any root.
    struct Scripted {
        entries: Vec<Entry>,
        walks: RefCell<Vec<WalkOptions>>,
    }

    impl TraversalWalker for Scripted {
        fn walk(
            &self,
            _root: &Path,
            options: WalkOptions,
            visitor: &mut dyn Visitor,
        ) -> Result<(), ListError> {
            self.walks.borrow_mut().push(options);
            for entry in &self.entries {
                if visitor.visit(entry) == VisitOutcome::Stop {
                    break;
                }
            }
            Ok(())
        }
    }

    struct Failing;

    impl TraversalWalker for Failing {
        fn walk(
            &self,
            root: &Path,
            _options: WalkOptions,
            _visitor: &mut dyn Visitor,
        ) -> Result<(), ListError> {
            Err(ListError::Traversal {
                path: root.join("gone"),
                root: root.to_path_buf(),
                message: "No such file or directory".into(),
            })
        }
    }

    fn scripted(entries: Vec<Entry>) -> DirectoryService<Scripted, MimeClassifier> {
        DirectoryService::with_parts(
            Scripted {
                entries,
                walks: RefCell::new(Vec::new()),
            },
            MimeClassifier::new(),
        )
    }

    #[test]
    fn test_methods_published() {
        let names: Vec<_> = DirectoryService::methods()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["list", "recursiveList", "recursiveListWithStructure"]);
    }

    #[test]
    fn test_missing_root_fails_before_walking() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let service = scripted(vec![Entry::new("/r/x", "x", false)]);
        let request = ListRequest::new([temp.path().to_path_buf(), missing.clone()], ListConfig::default());

        let mut notes: Vec<Notification> = Vec::new();
        let err = service
            .recursive_list(&request, Some(&mut notes))
            .unwrap_err();

        assert!(err.to_string().contains(&missing.display().to_string()));
        assert!(service.walker.walks.borrow().is_empty());
        assert!(notes.is_empty());
    }

    #[test]
    fn test_budget_shared_across_roots() {
        let one = TempDir::new().unwrap();
        let two = TempDir::new().unwrap();
        let service = scripted(vec![
            Entry::new("/r/x", "x", false),
            Entry::new("/r/y", "y", false),
        ]);
        let config = ListConfig::builder().limit(1usize).build().unwrap();
        let request = ListRequest::new([one.path(), two.path()], config);

        let tree = service.list(&request, None).unwrap();
        assert_eq!(tree.len(), 1);
        // The second root is never walked once the budget is gone.
        assert_eq!(service.walker.walks.borrow().len(), 1);
    }

    #[test]
    fn test_non_recursive_mode_walks_shallow() {
        let temp = TempDir::new().unwrap();
        let service = scripted(Vec::new());
        let request = ListRequest::new([temp.path()], ListConfig::default());

        service.list(&request, None).unwrap();
        service.recursive_list(&request, None).unwrap();

        let walks = service.walker.walks.borrow();
        assert!(!walks[0].recursive);
        assert!(walks[1].recursive);
    }

    #[test]
    fn test_traversal_error_becomes_response() {
        let temp = TempDir::new().unwrap();
        let service = DirectoryService::with_parts(Failing, MimeClassifier::new());
        let args = serde_json::json!({ "files": [temp.path().to_string_lossy()] });

        let resp = service.call("recursiveList", &args, None);
        let failure = resp.failure().unwrap();
        assert_eq!(failure.error, "directoryError");
        assert_eq!(failure.kind, dirlist_core::ErrorKind::Traversal);
        assert!(failure.message.contains("gone"));
    }

    #[test]
    fn test_unknown_method() {
        let service = DirectoryService::new();
        let resp = service.call("delete", &serde_json::json!({ "files": [] }), None);
        assert!(resp.failure().unwrap().message.contains("unknown method"));
    }

    #[test]
    fn test_empty_files_rejected() {
        let service = DirectoryService::new();
        let request = ListRequest::new(Vec::<PathBuf>::new(), ListConfig::default());
        let err = service.list(&request, None).unwrap_err();
        assert!(matches!(err, ListError::InvalidArgument { .. }));
    }
}
