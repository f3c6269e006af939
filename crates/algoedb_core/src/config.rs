//! Database configuration.

use crate::error::{CoreError, CoreResult};
use algoedb_codec::Record;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Pluggable schema check applied to every inserted record.
///
/// Any `Fn(&Record) -> bool + Send + Sync` closure is a validator.
pub trait SchemaValidator: Send + Sync {
    /// Returns true if `record` may be stored.
    fn validate(&self, record: &Record) -> bool;
}

impl<F> SchemaValidator for F
where
    F: Fn(&Record) -> bool + Send + Sync,
{
    fn validate(&self, record: &Record) -> bool {
        self(record)
    }
}

/// Where a database keeps its records, as derived from a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    /// Records live only in memory; nothing is read or written.
    Memory,
    /// Records are loaded from the file (when autoload is on) but
    /// mutations are never written back.
    ReadOnlySeed(PathBuf),
    /// Records are loaded from and persisted to the file.
    Persistent(PathBuf),
}

/// Configuration for opening a database.
#[derive(Clone)]
pub struct Config {
    /// Backing file. `None` or an empty path means no file.
    pub path: Option<PathBuf>,

    /// Explicit memory-only request. `None` means "decide from `path`".
    pub only_in_memory: Option<bool>,

    /// Whether to load existing file content when opening.
    pub autoload: bool,

    /// Optional schema check for inserts.
    pub schema_validator: Option<Arc<dyn SchemaValidator>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            only_in_memory: None,
            autoload: true,
            schema_validator: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("path", &self.path)
            .field("only_in_memory", &self.only_in_memory)
            .field("autoload", &self.autoload)
            .field("schema_validator", &self.schema_validator.is_some())
            .finish()
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration for a memory-only database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new().only_in_memory(true)
    }

    /// Sets the backing file path.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the memory-only flag explicitly.
    #[must_use]
    pub const fn only_in_memory(mut self, value: bool) -> Self {
        self.only_in_memory = Some(value);
        self
    }

    /// Sets whether existing file content is loaded on open.
    #[must_use]
    pub const fn autoload(mut self, value: bool) -> Self {
        self.autoload = value;
        self
    }

    /// Sets the schema validator.
    #[must_use]
    pub fn schema_validator(mut self, validator: impl SchemaValidator + 'static) -> Self {
        self.schema_validator = Some(Arc::new(validator));
        self
    }

    /// Returns the configured path, treating an empty path as none.
    #[must_use]
    pub fn effective_path(&self) -> Option<&Path> {
        self.path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Validates the combination of settings and returns the storage mode.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if persistence was explicitly requested
    /// (`only_in_memory(false)`) without a path.
    pub fn resolve(&self) -> CoreResult<StorageMode> {
        match (self.effective_path(), self.only_in_memory) {
            (None, Some(false)) => Err(CoreError::configuration(
                "only_in_memory cannot be disabled without a path",
            )),
            (None, _) => Ok(StorageMode::Memory),
            (Some(path), Some(true)) => Ok(StorageMode::ReadOnlySeed(path.to_path_buf())),
            (Some(path), _) => Ok(StorageMode::Persistent(path.to_path_buf())),
        }
    }
}
