//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
struct State {
    data: Option<Vec<u8>>,
    fail_replace: bool,
    replace_count: u64,
}

/// An in-memory storage backend.
///
/// Clones share the same content, so a test can hand one clone to a
/// database and keep another to inspect what was persisted or to make the
/// next writes fail.
///
/// # Example
///
/// ```rust
/// use algoedb_storage::{InMemoryBackend, StorageBackend};
///
/// let backend = InMemoryBackend::new();
/// let mut handle = backend.clone();
/// handle.replace(b"[]").unwrap();
/// assert_eq!(backend.data(), Some(b"[]".to_vec()));
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackend {
    state: Arc<RwLock<State>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with pre-existing content.
    ///
    /// Useful for testing load scenarios.
    #[must_use]
    pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
        let backend = Self::new();
        backend.state.write().data = Some(data.into());
        backend
    }

    /// Returns a copy of the stored content.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.state.read().data.clone()
    }

    /// Makes subsequent `replace` calls fail (or succeed again).
    pub fn set_fail_replace(&self, fail: bool) {
        self.state.write().fail_replace = fail;
    }

    /// Number of successful `replace` calls.
    #[must_use]
    pub fn replace_count(&self) -> u64 {
        self.state.read().replace_count
    }
}

impl StorageBackend for InMemoryBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.state.read().data.clone())
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        let mut state = self.state.write();
        if state.fail_replace {
            return Err(StorageError::Injected("replace disabled".to_string()));
        }
        state.data = Some(data.to_vec());
        state.replace_count += 1;
        Ok(())
    }

    fn exists(&self) -> StorageResult<bool> {
        Ok(self.state.read().data.is_some())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
