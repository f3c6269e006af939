//! CLI command implementations.

pub mod count;
pub mod delete;
pub mod find;
pub mod insert;
pub mod inspect;
pub mod update;

use algoedb_codec::Record;

/// Output format for commands that print records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// One compact JSON object per line.
    Text,
    /// A single pretty-printed JSON array.
    Json,
}

/// Prints records in the requested format.
pub fn print_records(records: &[Record], format: Format) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(records)?),
        Format::Text => {
            for record in records {
                println!("{record}");
            }
        }
    }
    Ok(())
}
