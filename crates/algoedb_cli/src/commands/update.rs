//! Update command implementation.

use algoedb_codec::parse_record;
use algoedb_core::{Database, Query};

/// Runs the update command.
pub fn run(
    db: &Database,
    query: &Query,
    set: &str,
    one: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let patch = parse_record(set)?;
    if one {
        let updated = db.update_one(query, &patch)?;
        println!("{updated}");
    } else {
        let count = db.update_many(query, &patch)?;
        println!("Updated {count} record(s)");
    }
    Ok(())
}
