//! Insert command implementation.

use algoedb_codec::{parse_value, Record, Value};
use algoedb_core::Database;

/// Parses the command argument into records.
///
/// Accepts a single JSON object or an array of objects.
pub fn parse_records(json: &str) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    match parse_value(json)? {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(record) => Ok(record),
                other => Err(Box::<dyn std::error::Error>::from(format!(
                    "element {i} is {}, expected an object",
                    other.type_name()
                ))),
            })
            .collect(),
        other => Err(format!("expected a JSON object or array, got {}", other.type_name()).into()),
    }
}

/// Runs the insert command.
pub fn run(db: &Database, json: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut records = parse_records(json)?;
    let count = if records.len() == 1 {
        db.insert_one(records.remove(0))?;
        1
    } else {
        db.insert_many(records)?
    };
    println!("Inserted {count} record(s)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoedb_codec::record;

    #[test]
    fn parses_object_and_array() {
        assert_eq!(parse_records(r#"{"a": 1}"#).unwrap(), vec![record! { "a" => 1 }]);
        assert_eq!(
            parse_records(r#"[{"a": 1}, {"b": "x"}]"#).unwrap(),
            vec![record! { "a" => 1 }, record! { "b" => "x" }]
        );
        assert!(parse_records("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_objects() {
        assert!(parse_records("1").is_err());
        assert!(parse_records(r#"[{"a": 1}, 2]"#).unwrap_err().to_string().contains("element 1"));
        assert!(parse_records("{").is_err());
    }

    #[test]
    fn inserts_into_database() {
        let db = Database::open_in_memory().unwrap();
        run(&db, r#"[{"a": 1}, {"a": 2}]"#).unwrap();
        run(&db, r#"{"a": 3}"#).unwrap();
        assert_eq!(db.len(), 3);
    }
}
