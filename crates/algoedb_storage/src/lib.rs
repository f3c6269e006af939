//! # AlgoeDB Storage
//!
//! Storage backends for AlgoeDB.
//!
//! Backends are **opaque byte stores** holding one serialized collection.
//! They never interpret the bytes they store; encoding belongs to
//! `algoedb_codec`.
//!
//! ## Design Principles
//!
//! - A backend reads the whole content or replaces the whole content
//! - Replacement is all-or-nothing: readers see either the old bytes or
//!   the new bytes, never a mix
//! - No internal write queue; callers serialize writes
//! - Must be `Send + Sync` so a database can be shared across threads
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing
//! - [`FileBackend`] - Temp-file-then-rename persistence to a single file
//!
//! ## Example
//!
//! ```rust
//! use algoedb_storage::{InMemoryBackend, StorageBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! assert!(backend.read().unwrap().is_none());
//!
//! backend.replace(b"[]").unwrap();
//! assert_eq!(backend.read().unwrap().as_deref(), Some(&b"[]"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::{temp_path_for, FileBackend, TEMP_SUFFIX};
pub use memory::InMemoryBackend;
