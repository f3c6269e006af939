//! # AlgoeDB Core
//!
//! Core engine for AlgoeDB, an embedded document store that keeps one
//! ordered collection of JSON records in memory and mirrors it to a single
//! file.
//!
//! This crate provides:
//! - [`Database`], the collection with insert, find, update and delete
//! - [`Query`] and the [`predicate`] catalog for selecting records
//! - [`Config`] for choosing between file-backed and memory-only storage
//! - [`DatabaseStats`] operation counters
//!
//! ## Example
//!
//! ```rust
//! use algoedb_core::predicate::more_than;
//! use algoedb_core::{record, Database, Query};
//!
//! let db = Database::open_in_memory().unwrap();
//! db.insert_one(record! { "name" => "a", "age" => 20 }).unwrap();
//! db.insert_one(record! { "name" => "b", "age" => 30 }).unwrap();
//!
//! let found = db.find_many(&Query::new().with("age", more_than(25))).unwrap();
//! assert_eq!(found, vec![record! { "name" => "b", "age" => 30 }]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
pub mod predicate;
mod query;
mod stats;

pub use config::{Config, SchemaValidator, StorageMode};
pub use database::Database;
pub use error::{CoreError, CoreResult};
pub use predicate::{Predicate, PredicateExt};
pub use query::{Criterion, Query};
pub use stats::{DatabaseStats, StatsSnapshot};

pub use algoedb_codec::{record, Number, Record, Value};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
