//! Inspect command implementation.

use super::Format;
use algoedb_codec::from_json;
use algoedb_storage::{FileBackend, StorageBackend};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Collection inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Collection file path.
    pub path: String,
    /// File size in bytes.
    pub file_size: u64,
    /// Number of records.
    pub record_count: usize,
    /// Field usage across records, sorted by name.
    pub fields: Vec<FieldStats>,
}

/// Usage of one field name.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FieldStats {
    /// Field name.
    pub name: String,
    /// Number of records carrying the field.
    pub records: usize,
}

/// Reads the collection file without opening a database, so inspection
/// never creates or rewrites it.
pub fn inspect(path: &Path) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let backend = FileBackend::open(path)?;
    let bytes = backend
        .read()?
        .ok_or_else(|| format!("No database found at {}", path.display()))?;
    let records = from_json(&bytes)?;

    let mut usage: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &records {
        for name in record.field_names() {
            *usage.entry(name).or_default() += 1;
        }
    }

    Ok(InspectResult {
        path: path.display().to_string(),
        file_size: bytes.len() as u64,
        record_count: records.len(),
        fields: usage
            .into_iter()
            .map(|(name, records)| FieldStats {
                name: name.to_string(),
                records,
            })
            .collect(),
    })
}

/// Runs the inspect command.
pub fn run(path: &Path, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    debug!("Inspecting collection file {:?}", path);
    let result = inspect(path)?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        Format::Text => print_text_output(&result),
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("AlgoeDB Collection Inspection");
    println!("=============================");
    println!();
    println!("Path:    {}", result.path);
    println!("Size:    {}", format_size(result.file_size));
    println!("Records: {}", result.record_count);

    if !result.fields.is_empty() {
        println!();
        println!("Fields:");
        let width = result.fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
        for field in &result.fields {
            println!("  {:<width$}  {} record(s)", field.name, field.records);
        }
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoedb_core::{record, Database};
    use tempfile::tempdir;

    #[test]
    fn summarizes_collection() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        let db = Database::open(&path).unwrap();
        db.insert_many(vec![
            record! { "name" => "a", "age" => 1 },
            record! { "name" => "b" },
        ])
        .unwrap();

        let result = inspect(&path).unwrap();
        assert_eq!(result.record_count, 2);
        assert_eq!(result.file_size, std::fs::metadata(&path).unwrap().len());
        assert_eq!(
            result.fields,
            vec![
                FieldStats { name: "age".into(), records: 1 },
                FieldStats { name: "name".into(), records: 2 },
            ]
        );
    }

    #[test]
    fn missing_file_is_an_error_and_is_not_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(inspect(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(12), "12 bytes");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
