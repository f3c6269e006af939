//! Test fixtures and database helpers.
//!
//! Provides convenience functions for setting up test databases
//! and common test scenarios.

use algoedb_core::{Config, Database};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name used for file-backed test databases.
pub const TEST_FILE_NAME: &str = "test.json";

/// A test database with automatic cleanup.
pub struct TestDatabase {
    /// The database instance.
    pub db: Database,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: Option<TempDir>,
}

impl TestDatabase {
    /// Creates a new in-memory test database.
    pub fn memory() -> Self {
        Self {
            db: Database::open_in_memory().expect("Failed to open in-memory database"),
            temp_dir: None,
        }
    }

    /// Creates a new file-based test database in a fresh temp directory.
    pub fn file() -> Self {
        Self::file_with_config(Config::new())
    }

    /// Creates a file-based test database with extra configuration.
    ///
    /// The config's path is replaced by the temp file.
    pub fn file_with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(TEST_FILE_NAME);
        let db = Database::open_with_config(config.path(&path))
            .expect("Failed to open file database");

        Self {
            db,
            temp_dir: Some(temp_dir),
        }
    }

    /// Returns the database file if file-based, None if in-memory.
    pub fn path(&self) -> Option<PathBuf> {
        self.temp_dir.as_ref().map(|d| d.path().join(TEST_FILE_NAME))
    }

    /// Closes and reopens a file-based database from disk.
    ///
    /// # Panics
    ///
    /// Panics for in-memory databases.
    pub fn reopen(self) -> Self {
        let path = self.path().expect("Only file databases can be reopened");
        drop(self.db);
        Self {
            db: Database::open(&path).expect("Failed to reopen database"),
            temp_dir: self.temp_dir,
        }
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test with a temporary in-memory database.
///
/// # Example
///
/// ```rust
/// use algoedb_testkit::with_temp_db;
///
/// with_temp_db(|db| {
///     assert!(db.is_empty());
/// });
/// ```
pub fn with_temp_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let test_db = TestDatabase::memory();
    f(&test_db.db)
}

/// Runs a test with a temporary file-based database.
pub fn with_file_db<F, R>(f: F) -> R
where
    F: FnOnce(&Database, &Path) -> R,
{
    let test_db = TestDatabase::file();
    let path = test_db.path().expect("File database should have a path");
    f(&test_db.db, &path)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use algoedb_core::record;

    /// Inserts `count` records shaped `{"index": i, "name": "user_i", "even": bool}`.
    pub fn populate(db: &Database, count: usize) {
        let records = (0..count)
            .map(|i| {
                record! {
                    "index" => i,
                    "name" => format!("user_{i}"),
                    "even" => i % 2 == 0,
                }
            })
            .collect();
        db.insert_many(records).expect("Failed to populate database");
    }

    /// Creates an in-memory database with pre-populated data.
    pub fn populated_database(count: usize) -> TestDatabase {
        let test_db = TestDatabase::memory();
        populate(&test_db, count);
        test_db
    }

    /// Creates a file-backed database holding the two-person example:
    /// `{"name": "a", "age": 20}` and `{"name": "b", "age": 30}`.
    pub fn people_database() -> TestDatabase {
        let test_db = TestDatabase::file();
        test_db
            .insert_one(record! { "name" => "a", "age" => 20 })
            .expect("Failed to insert");
        test_db
            .insert_one(record! { "name" => "b", "age" => 30 })
            .expect("Failed to insert");
        test_db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoedb_core::{record, Query};

    #[test]
    fn test_memory_database() {
        let test_db = TestDatabase::memory();
        assert!(test_db.is_in_memory());
        assert!(test_db.path().is_none());
    }

    #[test]
    fn test_with_temp_db() {
        with_temp_db(|db| {
            db.insert_one(record! { "a" => 1 }).unwrap();
            assert_eq!(db.len(), 1);
        });
    }

    #[test]
    fn test_with_file_db() {
        with_file_db(|db, path| {
            assert!(path.exists());
            assert_eq!(db.path(), Some(path));
        });
    }

    #[test]
    fn test_reopen() {
        let test_db = scenarios::people_database();
        let test_db = test_db.reopen();
        assert_eq!(test_db.len(), 2);
    }

    #[test]
    fn test_populated_scenario() {
        let test_db = scenarios::populated_database(10);
        assert_eq!(test_db.len(), 10);
        assert_eq!(test_db.count(&Query::new().eq("even", true)), 5);
    }
}
