//! Request-scoped scratch directories.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Scratch directory the engine provisions for one request.
///
/// Ownership is exclusive to the worker handling the request; the engine
/// removes the directory once the job reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A fresh, uniquely named file path under the workspace root.
    pub fn temp_file(&self, prefix: &str) -> PathBuf {
        self.root
            .join(format!("{}_{}", prefix, Uuid::new_v4().simple()))
    }
}
