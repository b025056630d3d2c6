//! Listing configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Default number of entries examined per listing.
pub const DEFAULT_LIMIT: usize = 1000;

/// Configuration shared by every root of one listing operation.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct ListConfig {
    /// Follow symbolic links while walking.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub follow_links: bool,

    /// MIME patterns an entry must match (empty = accept everything).
    #[builder(default)]
    #[serde(default, rename = "mimetypes")]
    pub mime_filters: Vec<String>,

    /// Maximum number of entries examined across all roots.
    #[builder(default = "DEFAULT_LIMIT")]
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_true() -> bool {
    true
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl ListConfig {
    /// Create a new config builder.
    pub fn builder() -> ListConfigBuilder {
        ListConfigBuilder::default()
    }

    /// Whether any MIME filtering applies.
    pub fn has_filters(&self) -> bool {
        !self.mime_filters.is_empty()
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            follow_links: true,
            mime_filters: Vec::new(),
            limit: DEFAULT_LIMIT,
        }
    }
}

/// The three listing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListMode {
    /// Direct children of each root, flat handles.
    #[serde(rename = "list")]
    List,
    /// Full depth-first walk, flat handles.
    #[serde(rename = "recursiveList")]
    RecursiveList,
    /// Full depth-first walk, nested tree.
    #[serde(rename = "recursiveListWithStructure")]
    RecursiveListWithStructure,
}

impl ListMode {
    /// All modes, in the order they are published.
    pub const ALL: [ListMode; 3] = [
        ListMode::List,
        ListMode::RecursiveList,
        ListMode::RecursiveListWithStructure,
    ];

    pub fn is_recursive(self) -> bool {
        !matches!(self, ListMode::List)
    }

    pub fn is_flat(self) -> bool {
        !matches!(self, ListMode::RecursiveListWithStructure)
    }

    /// External method name.
    pub fn method_name(self) -> &'static str {
        match self {
            ListMode::List => "list",
            ListMode::RecursiveList => "recursiveList",
            ListMode::RecursiveListWithStructure => "recursiveListWithStructure",
        }
    }

    pub fn from_method_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.method_name() == name)
    }

    /// One-line description of what the method returns.
    pub fn description(self) -> &'static str {
        match self {
            ListMode::List => {
                "Returns a list in \"files\" of filehandles resulting from a \
                 non-recursive traversal of the arguments."
            }
            ListMode::RecursiveList => {
                "Returns a list in \"files\" of filehandles resulting from a \
                 recursive traversal of the arguments."
            }
            ListMode::RecursiveListWithStructure => {
                "Returns a nested list in \"files\" of objects with \"relativeName\", \
                 \"handle\" and, for directories, \"children\"."
            }
        }
    }
}
