//! File-backed stores for reader annotations.
//!
//! Each store owns one JSON file, keeps the full contents in memory, and
//! rewrites the file on every mutation before reporting success.

pub mod comments;
pub mod json_file;
pub mod metadata;

pub use comments::CommentStore;
pub use metadata::MetadataStore;

use std::fmt;
use std::path::{Path, PathBuf};

/// A durable read or write against a store file failed.
#[derive(Debug, Clone)]
pub struct StoreError {
    pub path: PathBuf,
    pub message: String,
}

impl StoreError {
    pub fn new(path: &Path, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

impl std::error::Error for StoreError {}
