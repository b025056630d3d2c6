//! Incremental reconstruction of a directory tree from visited entries.
//!
//! Entries arrive one at a time in walk order, each carrying its absolute
//! path and its path relative to the walk root. The only ordering guarantee
//! is that a directory is delivered before anything below it, which every
//! depth-first walk provides. The builder never touches the filesystem.
//!
//! Nodes live in an arena and refer to their children by index. The path
//! index maps a relative directory path to the arena slot of the node that
//! owns the children for that path, so a later descendant finds its parent
//! in O(depth) lookups.

use std::collections::HashMap;
use std::mem;
use std::path::{Path, PathBuf};

use crate::node::{Entry, ResultNode, ResultTree, path_string};

type NodeIdx = usize;

#[derive(Debug)]
struct ArenaNode {
    relative_name: String,
    handle: String,
    children: Option<Vec<NodeIdx>>,
}

/// Builds a [`ResultTree`] from a stream of accepted entries.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    flat: bool,
    handles: Vec<String>,
    nodes: Vec<ArenaNode>,
    roots: Vec<NodeIdx>,
    index: HashMap<PathBuf, NodeIdx>,
}

impl TreeBuilder {
    /// Create a builder producing either flat handles or a nested tree.
    pub fn new(flat: bool) -> Self {
        Self {
            flat,
            ..Self::default()
        }
    }

    pub fn is_flat(&self) -> bool {
        self.flat
    }

    /// Number of nodes currently held, including synthesized ancestors.
    pub fn len(&self) -> usize {
        if self.flat {
            self.handles.len()
        } else {
            self.nodes.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget directory lookups from the previous walk root.
    ///
    /// Relative paths are only unique within one root, so two roots that
    /// both contain `b/` must not share the node for `b`.
    pub fn start_root(&mut self) {
        self.index.clear();
    }

    /// Add an accepted entry.
    ///
    /// Entries with an empty absolute or relative path are ignored; the
    /// walk root is never a child of itself.
    pub fn add(&mut self, entry: &Entry) {
        if entry.absolute_path.as_os_str().is_empty() || entry.is_walk_root() {
            return;
        }

        if self.flat {
            self.handles.push(entry.handle());
            return;
        }

        let parent = entry
            .relative_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|rel_parent| self.resolve_parent(&entry.absolute_path, rel_parent));

        let idx = self.push_node(ArenaNode {
            relative_name: entry.relative_name(),
            handle: entry.handle(),
            children: entry.is_dir.then(Vec::new),
        });
        self.attach(parent, idx);

        if entry.is_dir {
            self.index.insert(entry.relative_path.clone(), idx);
        }
    }

    /// Take the finished tree, leaving an empty builder in the same mode.
    pub fn adopt_tree(&mut self) -> ResultTree {
        self.index.clear();

        if self.flat {
            return ResultTree::Flat(mem::take(&mut self.handles));
        }

        let nodes = mem::take(&mut self.nodes);
        let roots = mem::take(&mut self.roots);

        // Children always sit at higher indices than their parent, so a
        // reverse sweep sees every child before the node that owns it.
        let mut built: Vec<Option<ResultNode>> = Vec::with_capacity(nodes.len());
        built.resize_with(nodes.len(), || None);

        for (idx, node) in nodes.into_iter().enumerate().rev() {
            let children = node.children.map(|kids| {
                kids.into_iter()
                    .filter_map(|kid| built[kid].take())
                    .collect::<Vec<_>>()
            });
            built[idx] = Some(ResultNode {
                relative_name: node.relative_name,
                handle: node.handle,
                children,
            });
        }

        ResultTree::Nested(
            roots
                .into_iter()
                .filter_map(|idx| built[idx].take())
                .collect(),
        )
    }

    /// Find the node owning `rel_parent`, creating any missing ancestors.
    ///
    /// Ancestor handles come from walking up `absolute` by as many steps as
    /// `rel_parent` has components, then back down one component at a time.
    fn resolve_parent(&mut self, absolute: &Path, rel_parent: &Path) -> NodeIdx {
        let depth = rel_parent.components().count();
        let mut full = absolute
            .ancestors()
            .nth(depth + 1)
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut key = PathBuf::new();
        let mut parent: Option<NodeIdx> = None;

        for component in rel_parent.components() {
            key.push(component);
            full.push(component);

            let idx = match self.index.get(&key) {
                Some(&idx) => idx,
                None => {
                    tracing::trace!(dir = %key.display(), "synthesizing ancestor node");
                    let idx = self.push_node(ArenaNode {
                        relative_name: path_string(&key),
                        handle: path_string(&full),
                        children: Some(Vec::new()),
                    });
                    self.index.insert(key.clone(), idx);
                    self.attach(parent, idx);
                    idx
                }
            };
            parent = Some(idx);
        }

        // rel_parent is non-empty, so the loop ran at least once.
        parent.unwrap_or_default()
    }

    fn push_node(&mut self, node: ArenaNode) -> NodeIdx {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn attach(&mut self, parent: Option<NodeIdx>, idx: NodeIdx) {
        match parent {
            None => self.roots.push(idx),
            Some(p) => self.nodes[p].children.get_or_insert_with(Vec::new).push(idx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(abs: &str, rel: &str) -> Entry {
        Entry::new(abs, rel, false)
    }

    fn dir(abs: &str, rel: &str) -> Entry {
        Entry::new(abs, rel, true)
    }

    #[test]
    fn test_flat_appends_handles() {
        let mut builder = TreeBuilder::new(true);
        builder.add(&dir("/a", ""));
        builder.add(&file("/a/x.txt", "x.txt"));
        builder.add(&dir("/a/b", "b"));
        builder.add(&file("/a/b/y.txt", "b/y.txt"));

        assert_eq!(
            builder.adopt_tree(),
            ResultTree::Flat(vec![
                "/a/x.txt".into(),
                "/a/b".into(),
                "/a/b/y.txt".into()
            ])
        );
    }

    #[test]
    fn test_nested_scenario() {
        let mut builder = TreeBuilder::new(false);
        builder.add(&file("/a/x.txt", "x.txt"));
        builder.add(&dir("/a/b", "b"));
        builder.add(&file("/a/b/y.txt", "b/y.txt"));

        let mut b = ResultNode::new_directory("b", "/a/b");
        b.children = Some(vec![ResultNode::new_file("b/y.txt", "/a/b/y.txt")]);
        let expected = ResultTree::Nested(vec![ResultNode::new_file("x.txt", "/a/x.txt"), b]);

        assert_eq!(builder.adopt_tree(), expected);
    }

    #[test]
    fn test_synthesizes_missing_ancestors() {
        let mut builder = TreeBuilder::new(false);
        builder.add(&file("/r/p/q/z.jpg", "p/q/z.jpg"));

        let tree = builder.adopt_tree();
        let nodes = tree.nodes().unwrap();
        assert_eq!(nodes.len(), 1);

        let p = &nodes[0];
        assert_eq!(p.relative_name, "p");
        assert_eq!(p.handle, "/r/p");
        assert!(p.is_dir());

        let q = p.child("p/q").unwrap();
        assert_eq!(q.handle, "/r/p/q");
        let z = q.child("p/q/z.jpg").unwrap();
        assert_eq!(z.handle, "/r/p/q/z.jpg");
        assert!(!z.is_dir());
    }

    #[test]
    fn test_shared_prefix_not_duplicated() {
        let mut builder = TreeBuilder::new(false);
        builder.add(&file("/r/p/q/one", "p/q/one"));
        builder.add(&file("/r/p/two", "p/two"));
        builder.add(&file("/r/p/q/three", "p/q/three"));

        let tree = builder.adopt_tree();
        let nodes = tree.nodes().unwrap();
        assert_eq!(nodes.len(), 1);
        let p = &nodes[0];
        let names: Vec<_> = p.children().iter().map(|c| c.relative_name.as_str()).collect();
        assert_eq!(names, vec!["p/q", "p/two"]);
        assert_eq!(p.child("p/q").unwrap().children().len(), 2);
    }

    #[test]
    fn test_ignores_empty_paths() {
        let mut builder = TreeBuilder::new(false);
        builder.add(&dir("/a", ""));
        builder.add(&file("", "x"));
        assert!(builder.is_empty());
        assert!(builder.adopt_tree().is_empty());
    }

    #[test]
    fn test_adopt_resets_builder() {
        let mut builder = TreeBuilder::new(false);
        builder.add(&dir("/a/b", "b"));
        assert_eq!(builder.adopt_tree().len(), 1);

        assert!(builder.is_empty());
        builder.add(&file("/a/b/y", "b/y"));
        // The old index is gone, so `b` is synthesized again in the new tree.
        let tree = builder.adopt_tree();
        assert_eq!(tree.handles(), vec!["/a/b", "/a/b/y"]);
    }

    #[test]
    fn test_start_root_separates_roots() {
        let mut builder = TreeBuilder::new(false);
        builder.add(&dir("/r1/b", "b"));
        builder.start_root();
        builder.add(&file("/r2/b/y", "b/y"));

        let tree = builder.adopt_tree();
        let nodes = tree.nodes().unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].children().is_empty());
        assert_eq!(nodes[1].handle, "/r2/b");
        assert_eq!(nodes[1].children()[0].handle, "/r2/b/y");
    }

    #[test]
    fn test_empty_directory_keeps_children_field() {
        let mut builder = TreeBuilder::new(false);
        builder.add(&dir("/a/empty", "empty"));
        let tree = builder.adopt_tree();
        assert_eq!(tree.nodes().unwrap()[0].children, Some(Vec::new()));
    }
}
