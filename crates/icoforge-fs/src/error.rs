//! Error types for filesystem collaborators

use std::path::PathBuf;

/// Errors scanning directories or writing icons
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Path given for scanning is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Output path has no extension
    #[error("output file has no extension, it should be .ico: {0}")]
    MissingExtension(PathBuf),

    /// IO error on a path
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Create IO error for path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for filesystem operations
pub type FsResult<T> = Result<T, FsError>;
