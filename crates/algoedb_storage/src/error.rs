//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Reading the destination file failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// Creating or writing the temporary file failed.
    #[error("failed to write temporary file {}: {source}", path.display())]
    TempWrite {
        /// The temporary file path.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// Renaming the temporary file onto the destination failed.
    #[error("failed to rename {} to {}: {source}", from.display(), to.display())]
    Rename {
        /// The temporary file path.
        from: PathBuf,
        /// The destination path.
        to: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// Syncing the parent directory after the rename failed.
    ///
    /// The rename already happened: the destination holds the new content,
    /// but the rename may not survive a crash.
    #[error("failed to sync directory {}: {source}", path.display())]
    DirectorySync {
        /// The directory holding the destination.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The destination path has no file name component.
    #[error("invalid storage path: {}", path.display())]
    InvalidPath {
        /// The rejected path.
        path: PathBuf,
    },

    /// A simulated failure from a test backend.
    #[error("injected failure: {0}")]
    Injected(String),
}

impl StorageError {
    /// Returns true if the destination was replaced despite the error.
    #[must_use]
    pub fn destination_replaced(&self) -> bool {
        matches!(self, Self::DirectorySync { .. })
    }
}
