//! Errors raised at the fallible edges of the engine

use std::path::PathBuf;

/// Errors from loading icons.
///
/// Css generation itself never fails, it only produces less output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured icon directory does not exist.
    #[error("icon directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    /// Reading from the file system failed.
    #[error("failed to read {}", path.display())]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Result alias using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
