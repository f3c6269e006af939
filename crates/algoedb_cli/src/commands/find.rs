//! Find command implementation.

use super::{print_records, Format};
use algoedb_core::{Database, Query};

/// Runs the find command.
pub fn run(
    db: &Database,
    query: &Query,
    one: bool,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = if one {
        vec![db.find_one(query)?]
    } else {
        db.find_many(query)?
    };
    print_records(&records, format)
}
