//! Depth-first directory walking.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use dirlist_core::{Entry, ListError};
use jwalk::{DirEntry, Parallelism, WalkDir};

/// Decision returned by a [`Visitor`] for each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOutcome {
    Continue,
    Stop,
}

/// Receives every entry produced by a walk.
pub trait Visitor {
    fn visit(&mut self, entry: &Entry) -> VisitOutcome;
}

/// Options for a single walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Follow symbolic links.
    pub follow_links: bool,
    /// Descend below the direct children of the root.
    pub recursive: bool,
}

/// Produces the entries below a root, parents before their descendants.
pub trait TraversalWalker {
    /// Walk `root`, stopping as soon as the visitor says so.
    ///
    /// A directory root walked recursively is itself delivered first, with
    /// an empty relative path. A non-directory root is delivered as the
    /// only entry, relative to its parent.
    fn walk(
        &self,
        root: &Path,
        options: WalkOptions,
        visitor: &mut dyn Visitor,
    ) -> Result<(), ListError>;
}

/// Single-threaded walker built on jwalk, yielding name-sorted entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwalkWalker;

impl JwalkWalker {
    pub fn new() -> Self {
        Self
    }
}

impl TraversalWalker for JwalkWalker {
    fn walk(
        &self,
        root: &Path,
        options: WalkOptions,
        visitor: &mut dyn Visitor,
    ) -> Result<(), ListError> {
        if !root.is_dir() {
            let relative = root
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| root.to_path_buf());
            visitor.visit(&Entry::new(root, relative, false));
            return Ok(());
        }

        let (min_depth, max_depth) = if options.recursive {
            (0, usize::MAX)
        } else {
            (1, 1)
        };

        let walker = WalkDir::new(root)
            .parallelism(Parallelism::Serial)
            .skip_hidden(false)
            .follow_links(options.follow_links)
            .min_depth(min_depth)
            .max_depth(max_depth)
            .process_read_dir(|_depth, _path, _state, children| {
                children.sort_by(|a, b| child_name(a).cmp(&child_name(b)));
            });

        for entry_result in walker {
            let dir_entry = match entry_result {
                Ok(dir_entry) => dir_entry,
                Err(err) => {
                    // A link whose target is gone is still an entry.
                    if let Some(link) = dangling_link(&err, options) {
                        let entry = Entry::new(&link, relative_to(&link, root), false);
                        if visitor.visit(&entry) == VisitOutcome::Stop {
                            break;
                        }
                        continue;
                    }
                    return Err(traversal_error(err, root));
                }
            };

            let path = dir_entry.path();
            let relative = relative_to(&path, root);

            // Unfollowed links to directories still count as directories.
            let file_type = dir_entry.file_type();
            let is_dir = file_type.is_dir() || (file_type.is_symlink() && path.is_dir());

            let entry = Entry::new(path, relative, is_dir);
            if visitor.visit(&entry) == VisitOutcome::Stop {
                break;
            }
        }

        Ok(())
    }
}

/// Sort key for one read_dir result. Failed entries keep their place by name
/// instead of trailing their siblings.
fn child_name(child: &jwalk::Result<DirEntry<((), ())>>) -> Option<&OsStr> {
    match child {
        Ok(entry) => Some(entry.file_name.as_os_str()),
        Err(err) => err.path().and_then(Path::file_name),
    }
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// The path of a symlink jwalk failed to follow because its target is missing.
fn dangling_link(err: &jwalk::Error, options: WalkOptions) -> Option<PathBuf> {
    if !options.follow_links {
        return None;
    }
    let not_found = err
        .io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound);
    let path = err.path()?;
    let is_link = path
        .symlink_metadata()
        .is_ok_and(|meta| meta.file_type().is_symlink());

    (not_found && is_link && !path.exists()).then(|| path.to_path_buf())
}

fn traversal_error(err: jwalk::Error, root: &Path) -> ListError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    tracing::error!(path = %path.display(), root = %root.display(), "walk failed: {err}");
    ListError::Traversal {
        path,
        root: root.to_path_buf(),
        message: err.to_string(),
    }
}
