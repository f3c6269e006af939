//! # AlgoeDB Testkit
//!
//! Test utilities for AlgoeDB.
//!
//! This crate provides:
//! - Test fixtures and database helpers
//! - Property-based test generators using proptest
//! - A crash-consistency harness for the file backend
//!
//! ## Usage
//!
//! ```rust
//! use algoedb_testkit::prelude::*;
//! use algoedb_core::{record, Query};
//!
//! with_temp_db(|db| {
//!     db.insert_one(record! { "name" => "a" }).unwrap();
//!     assert_eq!(db.count(&Query::new()), 1);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod crash;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::crash::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use crash::*;
pub use fixtures::*;
pub use generators::*;
