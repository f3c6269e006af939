//! # AlgoeDB Codec
//!
//! Dynamic value model and JSON file codec for AlgoeDB.
//!
//! This crate provides:
//! - [`Value`], the tagged union every record field holds
//! - [`Number`], which keeps signed, unsigned and floating representations
//!   apart while comparing them numerically
//! - [`Record`], one schema-less document
//! - [`to_json`] / [`from_json`], the on-disk format (a JSON array of objects)
//! - [`check_record`], which rejects records that would not read back
//!
//! ## Usage
//!
//! ```
//! use algoedb_codec::{from_json, record, to_json};
//!
//! let records = vec![record! { "name" => "Alice", "age" => 30 }];
//! let bytes = to_json(&records).unwrap();
//!
//! let decoded = from_json(&bytes).unwrap();
//! assert_eq!(records, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod json;
mod limits;
mod record;
mod value;

pub use error::{CodecError, CodecResult};
pub use json::{from_json, parse_record, parse_value, to_json};
pub use limits::{check_record, MAX_DEPTH};
pub use record::Record;
pub use value::{Number, Value};

/// Builds a [`Record`] from `field => value` pairs.
///
/// Values go through [`Value::from`], so any type with a `From` conversion
/// can be used directly.
///
/// ```
/// use algoedb_codec::{record, Value};
///
/// let r = record! { "name" => "Alice", "age" => 30 };
/// assert_eq!(r.get("age"), Some(&Value::from(30)));
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($field:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert($field, $crate::Value::from($value));
        )+
        record
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_macro_builds_fields() {
        let r = record! { "name" => "Alice", "age" => 30, "admin" => false };
        assert_eq!(r.len(), 3);
        assert_eq!(r.get("name"), Some(&Value::String("Alice".to_string())));
        assert_eq!(r.get("admin"), Some(&Value::Bool(false)));
    }

    #[test]
    fn record_macro_empty() {
        let r = record! {};
        assert!(r.is_empty());
    }

    #[test]
    fn roundtrip_nested() {
        let records = vec![
            record! {
                "name" => "Alice",
                "tags" => vec!["admin", "ops"],
                "address" => record! { "city" => "Oslo", "zip" => 150u32 },
            },
            record! { "name" => "Bob", "score" => 7.5, "manager" => Value::Null },
        ];

        let bytes = to_json(&records).unwrap();
        let decoded = from_json(&bytes).unwrap();
        assert_eq!(records, decoded);
    }
}
