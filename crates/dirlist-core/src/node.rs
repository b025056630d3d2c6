//! Visited entries and result node types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One filesystem node observed during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Fully qualified path.
    pub absolute_path: PathBuf,
    /// Path relative to the walk root, empty only for the root itself.
    pub relative_path: PathBuf,
    /// Whether the entry is (or resolves to) a directory.
    pub is_dir: bool,
}

impl Entry {
    pub fn new(
        absolute_path: impl Into<PathBuf>,
        relative_path: impl Into<PathBuf>,
        is_dir: bool,
    ) -> Self {
        Self {
            absolute_path: absolute_path.into(),
            relative_path: relative_path.into(),
            is_dir,
        }
    }

    /// Whether this entry is the walk root.
    pub fn is_walk_root(&self) -> bool {
        self.relative_path.as_os_str().is_empty()
    }

    /// Handle string for the absolute path.
    pub fn handle(&self) -> String {
        path_string(&self.absolute_path)
    }

    /// Relative name string.
    pub fn relative_name(&self) -> String {
        path_string(&self.relative_path)
    }
}

/// Render a path the way it is reported to callers.
pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// A matched entry in a structured result.
///
/// Only directory nodes carry `children`; file nodes never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultNode {
    /// Path relative to the walk root.
    pub relative_name: String,
    /// Absolute path, usable as a reference in later operations.
    pub handle: String,
    /// Children in discovery order (directories only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ResultNode>>,
}

impl ResultNode {
    /// Create a leaf node.
    pub fn new_file(relative_name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            relative_name: relative_name.into(),
            handle: handle.into(),
            children: None,
        }
    }

    /// Create an empty directory node.
    pub fn new_directory(relative_name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            relative_name: relative_name.into(),
            handle: handle.into(),
            children: Some(Vec::new()),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.children.is_some()
    }

    /// Children of a directory, empty for files.
    pub fn children(&self) -> &[ResultNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(ResultNode::node_count).sum::<usize>()
    }

    /// Find a direct child by relative name.
    pub fn child(&self, relative_name: &str) -> Option<&ResultNode> {
        self.children()
            .iter()
            .find(|c| c.relative_name == relative_name)
    }
}

/// Final output of a listing: flat handles or a nested tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultTree {
    /// Handles in traversal order.
    Flat(Vec<String>),
    /// Direct children of the walked roots.
    Nested(Vec<ResultNode>),
}

impl ResultTree {
    /// Number of top-level items.
    pub fn len(&self) -> usize {
        match self {
            ResultTree::Flat(handles) => handles.len(),
            ResultTree::Nested(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every handle in the result, pre-order for nested trees.
    pub fn handles(&self) -> Vec<&str> {
        fn collect<'a>(nodes: &'a [ResultNode], out: &mut Vec<&'a str>) {
            for node in nodes {
                out.push(&node.handle);
                collect(node.children(), out);
            }
        }

        match self {
            ResultTree::Flat(handles) => handles.iter().map(String::as_str).collect(),
            ResultTree::Nested(nodes) => {
                let mut out = Vec::new();
                collect(nodes, &mut out);
                out
            }
        }
    }

    /// Top-level nodes of a structured result.
    pub fn nodes(&self) -> Option<&[ResultNode]> {
        match self {
            ResultTree::Nested(nodes) => Some(nodes),
            ResultTree::Flat(_) => None,
        }
    }
}

/// Per-entry notification payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub handle: String,
    /// Omitted in flat mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_name: Option<String>,
}

impl Notification {
    /// Build the payload for an accepted entry.
    pub fn for_entry(entry: &Entry, flat: bool) -> Self {
        Self {
            handle: entry.handle(),
            relative_name: (!flat).then(|| entry.relative_name()),
        }
    }
}
