//! Storage backend trait definition.

use crate::error::StorageResult;

/// A whole-content storage backend for AlgoeDB.
///
/// Storage backends are **opaque byte stores** holding exactly one blob:
/// the serialized collection. AlgoeDB owns the format; backends only read
/// and replace bytes.
///
/// # Invariants
///
/// - `read` returns exactly the bytes of the last successful `replace`
/// - A failed `replace` leaves the previous content readable and unchanged,
///   unless the error reports [`destination_replaced`]
/// - Backends must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
///
/// [`destination_replaced`]: crate::StorageError::destination_replaced
pub trait StorageBackend: Send + Sync {
    /// Reads the stored content.
    ///
    /// Returns `None` if nothing has been stored yet (for a file backend,
    /// the destination file does not exist).
    ///
    /// # Errors
    ///
    /// Returns an error if the content exists but cannot be read.
    fn read(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Atomically replaces the stored content with `data`.
    ///
    /// After this returns successfully the new content is durable. If it
    /// fails, the previous content is untouched, except when the error's
    /// [`destination_replaced`] is true: the new content is then readable
    /// but may not survive a crash.
    ///
    /// # Errors
    ///
    /// Returns an error if the content could not be replaced.
    fn replace(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Returns true if content has been stored.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self) -> StorageResult<bool>;

    /// Returns a human-readable location for logs and errors.
    fn describe(&self) -> String;
}
