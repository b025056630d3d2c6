//! Core types for dirlist.
//!
//! This crate provides the data structures shared by the listing service:
//! visited entries, result nodes, the incremental tree builder, listing
//! configuration and errors.

mod config;
mod error;
mod node;
mod tree;

pub use config::{DEFAULT_LIMIT, ListConfig, ListConfigBuilder, ListMode};
pub use error::{DIRECTORY_ERROR, ErrorKind, ListError};
pub use node::{Entry, Notification, ResultNode, ResultTree, path_string};
pub use tree::TreeBuilder;
