//! Directory traversal and listing service for dirlist.
//!
//! This crate walks one or more root paths, filters what it sees by MIME
//! type, stops after a fixed number of examined entries, and returns either
//! a flat list of handles or a nested tree mirroring the directories.
//!
//! # Overview
//!
//! - **Walking** via jwalk, serial and name-sorted, parents before children
//! - **Filtering** by MIME pattern (`text/plain`, `image/*`)
//! - **Budget**: `limit` bounds the entries examined across the whole call
//! - **Notifications** for every accepted entry, delivered synchronously
//!
//! # Example
//!
//! ```rust,no_run
//! use dirlist_scan::{DirectoryService, ListConfig, ListRequest};
//!
//! let service = DirectoryService::new();
//! let request = ListRequest::new(["/path/to/list"], ListConfig::default());
//! let tree = service.recursive_list_with_structure(&request, None).unwrap();
//!
//! println!("{} top-level entries", tree.len());
//! ```
//!
//! # Notifications
//!
//! Any `FnMut(&Notification)` works as a sink:
//!
//! ```rust,no_run
//! use dirlist_scan::{DirectoryService, ListConfig, ListRequest, Notification};
//!
//! let service = DirectoryService::new();
//! let request = ListRequest::new(["/path/to/list"], ListConfig::default());
//! let mut print = |n: &Notification| println!("found {}", n.handle);
//! service.recursive_list(&request, Some(&mut print)).unwrap();
//! ```

mod classifier;
mod notify;
mod policy;
mod request;
mod response;
mod service;
mod walker;

pub use classifier::{
    DIRECTORY_MIME, FALLBACK_MIME, MimeClassifier, MimeFilter, PathClassifier, mime_from_extension,
};
pub use notify::{Notify, notification_channel};
pub use policy::VisitPolicy;
pub use request::{ListRequest, path_from_reference};
pub use response::{ListFailure, ListSuccess, ServiceResponse};
pub use service::{DirectoryService, MethodDescription, SERVICE_NAME, SERVICE_VERSION};
pub use walker::{JwalkWalker, TraversalWalker, VisitOutcome, Visitor, WalkOptions};

// Re-export core types for convenience
pub use dirlist_core::{
    DEFAULT_LIMIT, DIRECTORY_ERROR, Entry, ErrorKind, ListConfig, ListError, ListMode,
    Notification, ResultNode, ResultTree, TreeBuilder,
};
