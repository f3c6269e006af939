//! Delete command implementation.

use algoedb_core::{Database, Query};

/// Runs the delete command.
pub fn run(db: &Database, query: &Query, one: bool) -> Result<(), Box<dyn std::error::Error>> {
    let count = if one {
        db.delete_one(query)?;
        1
    } else {
        db.delete_many(query)?
    };
    println!("Deleted {count} record(s)");
    Ok(())
}
