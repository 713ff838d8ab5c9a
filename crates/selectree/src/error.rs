//! Error types for the selection tree.

use std::path::PathBuf;

use crate::path::Path;

/// Result type alias for selection tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the selection tree.
///
/// The path variants are invariant violations on the caller's side; none of
/// them are worth retrying.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The path does not resolve to a node.
    #[error("no node at path {path}")]
    PathNotFound { path: Path },

    /// The node at the path, or an ancestor of it, has been deleted.
    #[error("node at path {path} has been deleted")]
    Deleted { path: Path },

    /// An observer attempted a structural mutation on a path whose
    /// notifications are still being delivered.
    #[error("re-entrant mutation of {path} while its notifications are being delivered")]
    ReentrantMutation { path: Path },

    /// Configuration parse error.
    #[error("invalid selection config: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file I/O error.
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a not-found error.
    pub fn not_found(path: impl Into<Path>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    /// Create a deleted-node error.
    pub fn deleted(path: impl Into<Path>) -> Self {
        Self::Deleted { path: path.into() }
    }

    /// Create a re-entrant mutation error.
    pub fn reentrant(path: impl Into<Path>) -> Self {
        Self::ReentrantMutation { path: path.into() }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The tree path this error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::PathNotFound { path } | Self::Deleted { path } | Self::ReentrantMutation { path } => {
                Some(path)
            }
            Self::Config(_) | Self::Io { .. } => None,
        }
    }

    /// Whether this error is a [`Error::PathNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PathNotFound { .. })
    }

    /// Whether this error is a [`Error::Deleted`].
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted { .. })
    }
}
