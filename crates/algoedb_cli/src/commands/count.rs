//! Count command implementation.

use algoedb_core::{Database, Query};

/// Runs the count command.
pub fn run(db: &Database, query: &Query) {
    println!("{}", db.count(query));
}
