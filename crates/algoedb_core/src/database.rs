//! Database facade: the document collection.

use crate::config::{Config, SchemaValidator, StorageMode};
use crate::error::{CoreError, CoreResult};
use crate::query::Query;
use crate::stats::{DatabaseStats, StatsSnapshot};
use algoedb_codec::{check_record, from_json, to_json, Record};
use algoedb_storage::{FileBackend, StorageBackend};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// State guarded by the database lock.
struct Inner {
    /// The collection, in insertion order.
    records: Vec<Record>,
    /// Storage for load and persist. `None` for pure in-memory databases.
    backend: Option<Box<dyn StorageBackend>>,
}

/// The main database handle: one ordered collection of records.
///
/// `Database` is the entry point for AlgoeDB. It provides:
/// - Record insertion with an optional schema check
/// - Query-based find, update and delete
/// - Durable persistence of the whole collection after every mutation
///
/// Every operation, reads included, takes a single exclusive lock for its
/// full duration: scan, mutate and persist happen as one step, so callers
/// never observe memory and storage out of step after a successful call.
/// `Database` is `Send + Sync`; share it with an `Arc`.
///
/// # Opening a Database
///
/// ```rust,no_run
/// use algoedb_core::{record, Database, Query};
/// use algoedb_core::predicate::more_than;
/// use std::path::Path;
///
/// let db = Database::open(Path::new("people.json"))?;
/// db.insert_one(record! { "name" => "a", "age" => 20 })?;
/// db.insert_one(record! { "name" => "b", "age" => 30 })?;
///
/// let older = db.find_many(&Query::new().with("age", more_than(25)))?;
/// assert_eq!(older.len(), 1);
/// # Ok::<(), algoedb_core::CoreError>(())
/// ```
///
/// # In-Memory Databases
///
/// ```rust
/// use algoedb_core::Database;
///
/// let db = Database::open_in_memory().unwrap();
/// assert!(db.is_in_memory());
/// ```
pub struct Database {
    /// Records and backend, behind the one lock.
    inner: Mutex<Inner>,
    /// Whether mutations are written to the backend.
    persist: bool,
    /// Backing file, if any.
    path: Option<PathBuf>,
    /// Backend description for logs and errors.
    location: String,
    /// Optional insert check.
    validator: Option<Arc<dyn SchemaValidator>>,
    /// Operation counters.
    stats: DatabaseStats,
}

impl Database {
    /// Opens a database persisted to the JSON file at `path`.
    ///
    /// Existing content is loaded; a missing file is created holding an
    /// empty collection.
    ///
    /// # Errors
    ///
    /// Returns `CorruptStore` if the file content is not a JSON array of
    /// objects, or `Persistence` if the file cannot be read or created.
    pub fn open(path: &Path) -> CoreResult<Self> {
        Self::open_with_config(Config::new().path(path))
    }

    /// Opens a fresh memory-only database.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches the other constructors.
    pub fn open_in_memory() -> CoreResult<Self> {
        Self::open_with_config(Config::in_memory())
    }

    /// Opens a database with custom configuration.
    ///
    /// ```rust
    /// use algoedb_core::{Config, Database, Record};
    ///
    /// let config = Config::in_memory()
    ///     .schema_validator(|r: &Record| r.contains_field("name"));
    /// let db = Database::open_with_config(config).unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for an invalid combination of settings, and
    /// the same errors as [`Database::open`] when a file is involved.
    pub fn open_with_config(config: Config) -> CoreResult<Self> {
        match config.resolve()? {
            StorageMode::Memory => Self::assemble(config, None, false),
            StorageMode::ReadOnlySeed(path) => {
                let backend = FileBackend::open(&path)?;
                Self::assemble(config, Some(Box::new(backend)), false)
            }
            StorageMode::Persistent(path) => {
                let backend = FileBackend::open_with_create_dirs(&path)?;
                Self::assemble(config, Some(Box::new(backend)), true)
            }
        }
    }

    /// Opens a database on a pre-configured backend.
    ///
    /// This is a lower-level constructor, mainly for tests. The config's
    /// `path` is informational only; `only_in_memory(true)` makes the
    /// backend read-only.
    ///
    /// # Errors
    ///
    /// Same as [`Database::open`].
    pub fn open_with_backend(config: Config, backend: Box<dyn StorageBackend>) -> CoreResult<Self> {
        let persist = config.only_in_memory != Some(true);
        Self::assemble(config, Some(backend), persist)
    }

    fn assemble(
        config: Config,
        mut backend: Option<Box<dyn StorageBackend>>,
        persist: bool,
    ) -> CoreResult<Self> {
        let location = backend
            .as_ref()
            .map_or_else(|| "memory".to_string(), |b| b.describe());

        let records = match backend.as_mut() {
            Some(backend) if config.autoload => Self::load(backend.as_mut(), persist)?,
            _ => Vec::new(),
        };

        info!(
            location = %location,
            records = records.len(),
            persist,
            "opened database"
        );

        Ok(Self {
            inner: Mutex::new(Inner { records, backend }),
            persist,
            path: config.effective_path().map(Path::to_path_buf),
            location,
            validator: config.schema_validator,
            stats: DatabaseStats::new(),
        })
    }

    /// Reads the persisted collection.
    ///
    /// Absent content is an empty collection; when persisting, the empty
    /// collection is written immediately so later writes target an
    /// existing file.
    fn load(backend: &mut dyn StorageBackend, persist: bool) -> CoreResult<Vec<Record>> {
        match backend.read()? {
            Some(bytes) => {
                let records = from_json(&bytes)
                    .map_err(|e| CoreError::corrupt_store(backend.describe(), e.to_string()))?;
                debug!(
                    location = %backend.describe(),
                    bytes = bytes.len(),
                    records = records.len(),
                    "loaded collection"
                );
                Ok(records)
            }
            None => {
                if persist {
                    backend.replace(&to_json(&[])?)?;
                    debug!(location = %backend.describe(), "created empty collection");
                }
                Ok(Vec::new())
            }
        }
    }

    /// Writes the whole collection to the backend. Caller holds the lock.
    fn persist(&self, inner: &mut Inner) -> CoreResult<()> {
        if !self.persist {
            return Ok(());
        }
        let Some(backend) = inner.backend.as_mut() else {
            return Ok(());
        };

        let bytes = to_json(&inner.records)?;
        match backend.replace(&bytes) {
            Ok(()) => {
                self.stats.record_persist(bytes.len() as u64);
                debug!(
                    location = %self.location,
                    bytes = bytes.len(),
                    records = inner.records.len(),
                    "persisted collection"
                );
                Ok(())
            }
            Err(e) => {
                self.stats.record_persist_failure();
                if e.destination_replaced() {
                    warn!(
                        location = %self.location,
                        error = %e,
                        "collection written but not yet durable"
                    );
                } else {
                    warn!(
                        location = %self.location,
                        error = %e,
                        "persist failed, in-memory state is ahead of storage"
                    );
                }
                Err(e.into())
            }
        }
    }

    /// Checks that `record` can be persisted, then runs the schema validator.
    fn validate(&self, record: &Record) -> CoreResult<()> {
        check_record(record)?;
        match &self.validator {
            Some(validator) if !validator.validate(record) => Err(CoreError::Validation {
                record: record.to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn first_match(&self, records: &[Record], query: &Query) -> Option<usize> {
        self.stats.record_scan();
        records.iter().position(|r| query.matches(r))
    }

    fn all_matches(&self, records: &[Record], query: &Query) -> Vec<usize> {
        self.stats.record_scan();
        records
            .iter()
            .enumerate()
            .filter(|(_, r)| query.matches(r))
            .map(|(i, _)| i)
            .collect()
    }

    fn miss(&self, operation: &'static str) -> CoreError {
        self.stats.record_miss();
        CoreError::not_found(operation)
    }

    /// Inserts one record and returns the stored copy.
    ///
    /// # Errors
    ///
    /// Returns `Codec` if the record holds a NaN or infinite float or nests
    /// too deeply to be read back, `Validation` if the schema validator
    /// rejects it, or `Persistence` if it was appended in memory but could
    /// not be written. Nothing is appended on the first two.
    pub fn insert_one(&self, record: Record) -> CoreResult<Record> {
        let mut inner = self.inner.lock();
        self.validate(&record)?;

        inner.records.push(record.clone());
        self.stats.record_inserts(1);
        self.persist(&mut inner)?;
        Ok(record)
    }

    /// Inserts several records, all or nothing.
    ///
    /// Every record is validated before any is appended. The collection is
    /// persisted once. Returns the number of records inserted.
    ///
    /// # Errors
    ///
    /// Returns `Codec` or `Validation` for the first rejected record
    /// (nothing is inserted), or `Persistence` if the write failed.
    pub fn insert_many(&self, records: Vec<Record>) -> CoreResult<usize> {
        let mut inner = self.inner.lock();
        for record in &records {
            self.validate(record)?;
        }

        let count = records.len();
        inner.records.extend(records);
        self.stats.record_inserts(count as u64);
        self.persist(&mut inner)?;
        Ok(count)
    }

    /// Returns the first record matching `query`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing matches.
    pub fn find_one(&self, query: &Query) -> CoreResult<Record> {
        let inner = self.inner.lock();
        match self.first_match(&inner.records, query) {
            Some(index) => Ok(inner.records[index].clone()),
            None => Err(self.miss("find_one")),
        }
    }

    /// Returns every record matching `query`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing matches; a successful result is never
    /// empty.
    pub fn find_many(&self, query: &Query) -> CoreResult<Vec<Record>> {
        let inner = self.inner.lock();
        let found = self.all_matches(&inner.records, query);
        if found.is_empty() {
            return Err(self.miss("find_many"));
        }
        Ok(found.into_iter().map(|i| inner.records[i].clone()).collect())
    }

    /// Merges `patch` into the first record matching `query`.
    ///
    /// The merge is shallow: each field of `patch` replaces the whole field
    /// value; other fields are untouched. Returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns `Codec` if the patch could not be persisted (nothing is
    /// changed), `NotFound` if nothing matches, or `Persistence` if the
    /// update could not be written.
    pub fn update_one(&self, query: &Query, patch: &Record) -> CoreResult<Record> {
        check_record(patch)?;
        let mut inner = self.inner.lock();
        let index = self
            .first_match(&inner.records, query)
            .ok_or_else(|| self.miss("update_one"))?;

        inner.records[index].merge(patch);
        let updated = inner.records[index].clone();
        self.stats.record_updates(1);
        self.persist(&mut inner)?;
        Ok(updated)
    }

    /// Merges `patch` into every record matching `query`, persisting once.
    ///
    /// Returns the number of records updated.
    ///
    /// # Errors
    ///
    /// Same as [`Database::update_one`].
    pub fn update_many(&self, query: &Query, patch: &Record) -> CoreResult<usize> {
        check_record(patch)?;
        let mut inner = self.inner.lock();
        let found = self.all_matches(&inner.records, query);
        if found.is_empty() {
            return Err(self.miss("update_many"));
        }

        for &index in &found {
            inner.records[index].merge(patch);
        }
        self.stats.record_updates(found.len() as u64);
        self.persist(&mut inner)?;
        Ok(found.len())
    }

    /// Removes and returns the first record matching `query`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing matches, or `Persistence` if the
    /// removal could not be written.
    pub fn delete_one(&self, query: &Query) -> CoreResult<Record> {
        let mut inner = self.inner.lock();
        let index = self
            .first_match(&inner.records, query)
            .ok_or_else(|| self.miss("delete_one"))?;

        let removed = inner.records.remove(index);
        self.stats.record_deletes(1);
        self.persist(&mut inner)?;
        Ok(removed)
    }

    /// Removes every record matching `query`, keeping the others in order.
    ///
    /// Returns the number of records removed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing matches, or `Persistence` if the
    /// removal could not be written.
    pub fn delete_many(&self, query: &Query) -> CoreResult<usize> {
        let mut inner = self.inner.lock();
        let before = inner.records.len();

        self.stats.record_scan();
        inner.records.retain(|r| !query.matches(r));

        let removed = before - inner.records.len();
        if removed == 0 {
            return Err(self.miss("delete_many"));
        }
        self.stats.record_deletes(removed as u64);
        self.persist(&mut inner)?;
        Ok(removed)
    }

    /// Counts records matching `query`. Zero is a valid answer.
    pub fn count(&self, query: &Query) -> usize {
        let inner = self.inner.lock();
        self.stats.record_scan();
        inner.records.iter().filter(|r| query.matches(r)).count()
    }

    /// Returns a snapshot of every record in insertion order.
    pub fn all(&self) -> Vec<Record> {
        self.inner.lock().records.clone()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    /// Returns true if the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().records.is_empty()
    }

    /// Writes the current in-memory collection to storage.
    ///
    /// Mutations already persist on their own; this is the retry path
    /// after one of them returned `Persistence`. A no-op when nothing is
    /// persisted.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the write fails again.
    pub fn save(&self) -> CoreResult<()> {
        let mut inner = self.inner.lock();
        self.persist(&mut inner)
    }

    /// Returns true if mutations are not written to storage.
    pub fn is_in_memory(&self) -> bool {
        !self.persist
    }

    /// The backing file, if one is configured.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns a snapshot of the operation counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("location", &self.location)
            .field("persist", &self.persist)
            .field("records", &self.len())
            .finish()
    }
}
