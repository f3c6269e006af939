//! Checks that a record can be written and read back unchanged.
//!
//! JSON has no spelling for NaN or the infinities, and the reader refuses
//! input nested deeper than 128 containers. The collection array and the
//! record object count towards that, so records are capped well below it.

use crate::error::{CodecError, CodecResult};
use crate::record::Record;
use crate::value::{Number, Value};

/// Maximum nesting depth of a record. The record object itself is level 1.
pub const MAX_DEPTH: usize = 100;

/// Verifies that `record` holds only finite floats and nests no deeper
/// than [`MAX_DEPTH`].
///
/// # Errors
///
/// Returns `NonFiniteFloat` or `NestingTooDeep` naming the offending
/// location, e.g. `tags[2].score`.
pub fn check_record(record: &Record) -> CodecResult<()> {
    check_fields(record, "", 1)
}

fn check_fields(record: &Record, prefix: &str, depth: usize) -> CodecResult<()> {
    for (field, value) in record.iter() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        check_value(value, &path, depth)?;
    }
    Ok(())
}

fn check_value(value: &Value, path: &str, depth: usize) -> CodecResult<()> {
    match value {
        Value::Number(Number::Float(f)) if !f.is_finite() => Err(CodecError::NonFiniteFloat {
            path: path.to_string(),
        }),
        Value::Array(_) | Value::Object(_) if depth >= MAX_DEPTH => Err(CodecError::NestingTooDeep {
            path: path.to_string(),
            limit: MAX_DEPTH,
        }),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| check_value(item, &format!("{path}[{i}]"), depth + 1)),
        Value::Object(record) => check_fields(record, path, depth + 1),
        _ => Ok(()),
    }
}
