//! `--where` filter parsing.
//!
//! | Syntax          | Meaning                          |
//! |-----------------|----------------------------------|
//! | `field=lit`     | equal to a JSON literal          |
//! | `field!=lit`    | not equal                        |
//! | `field>n`       | numeric comparison (`>=`, `<`, `<=` too) |
//! | `field~regex`   | string matches the pattern       |
//! | `field?`        | field exists                     |
//! | `field!?`       | field is missing                 |
//!
//! Literals that are not valid JSON are taken as bare strings, so
//! `name=alice` and `name="alice"` are the same filter.

use algoedb_codec::{parse_value, Value};
use algoedb_core::predicate::{
    equals, exists, less_than, less_than_or_equal, more_than, more_than_or_equal, not,
    try_matches,
};
use algoedb_core::{Criterion, PredicateExt, Query};
use thiserror::Error;

/// Errors from parsing a filter expression.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// No operator was found.
    #[error("filter {0:?} has no operator (expected one of = != > >= < <= ~ ? !?)")]
    MissingOperator(String),

    /// The field name is empty.
    #[error("filter {0:?} has no field name")]
    MissingField(String),

    /// A comparison operand is not a number.
    #[error("filter {filter:?}: {operand:?} is not a number")]
    InvalidNumber {
        /// The whole filter.
        filter: String,
        /// The rejected operand.
        operand: String,
    },

    /// A `~` pattern does not compile.
    #[error("filter {filter:?}: {message}")]
    InvalidPattern {
        /// The whole filter.
        filter: String,
        /// Compiler diagnostic.
        message: String,
    },
}

const OPERATORS: [&str; 7] = ["!=", ">=", "<=", "=", ">", "<", "~"];

/// Parses one filter into a field and criterion.
pub fn parse_filter(filter: &str) -> Result<(String, Criterion), FilterError> {
    let filter = filter.trim();

    if let Some(field) = filter.strip_suffix("!?") {
        let field = require_field(field, filter)?;
        return Ok((field, Criterion::Predicate(not(exists()).boxed())));
    }
    if let Some(field) = filter.strip_suffix('?') {
        if !field.contains(|c| "=<>~!".contains(c)) {
            let field = require_field(field, filter)?;
            return Ok((field, Criterion::Predicate(exists().boxed())));
        }
    }

    let (index, op) = find_operator(filter)
        .ok_or_else(|| FilterError::MissingOperator(filter.to_string()))?;
    let field = require_field(&filter[..index], filter)?;
    let operand = filter[index + op.len()..].trim();

    let criterion = match op {
        "=" => Criterion::Equals(literal(operand)),
        "!=" => Criterion::Predicate(not(equals(literal(operand))).boxed()),
        "~" => {
            let pattern = try_matches(operand).map_err(|e| FilterError::InvalidPattern {
                filter: filter.to_string(),
                message: e.to_string(),
            })?;
            Criterion::Predicate(pattern.boxed())
        }
        _ => {
            let bound: f64 = operand.parse().map_err(|_| FilterError::InvalidNumber {
                filter: filter.to_string(),
                operand: operand.to_string(),
            })?;
            let predicate = match op {
                ">" => more_than(bound).boxed(),
                ">=" => more_than_or_equal(bound).boxed(),
                "<" => less_than(bound).boxed(),
                _ => less_than_or_equal(bound).boxed(),
            };
            Criterion::Predicate(predicate)
        }
    };

    Ok((field, criterion))
}

/// Parses every filter and combines them into one query.
pub fn build_query(filters: &[String]) -> Result<Query, FilterError> {
    filters.iter().map(|f| parse_filter(f)).collect()
}

/// Finds the leftmost operator, preferring two-character operators at the
/// same position.
fn find_operator(filter: &str) -> Option<(usize, &'static str)> {
    filter
        .char_indices()
        .find_map(|(i, _)| {
            OPERATORS
                .iter()
                .find(|op| filter[i..].starts_with(**op))
                .map(|op| (i, *op))
        })
}

fn require_field(field: &str, filter: &str) -> Result<String, FilterError> {
    let field = field.trim();
    if field.is_empty() {
        return Err(FilterError::MissingField(filter.to_string()));
    }
    Ok(field.to_string())
}

fn literal(operand: &str) -> Value {
    parse_value(operand).unwrap_or_else(|_| Value::from(operand))
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoedb_codec::record;

    fn query(filters: &[&str]) -> Query {
        let filters: Vec<String> = filters.iter().map(ToString::to_string).collect();
        build_query(&filters).unwrap()
    }

    #[test]
    fn equality_with_json_literals() {
        let r = record! { "name" => "alice", "age" => 30, "admin" => true, "boss" => Value::Null };
        assert!(query(&["name=alice"]).matches(&r));
        assert!(query(&["name=\"alice\""]).matches(&r));
        assert!(query(&["age=30"]).matches(&r));
        assert!(query(&["admin=true"]).matches(&r));
        assert!(query(&["boss=null"]).matches(&r));
        assert!(!query(&["age=\"30\""]).matches(&r));
    }

    #[test]
    fn inequality() {
        let r = record! { "name" => "alice" };
        assert!(query(&["name!=bob"]).matches(&r));
        assert!(!query(&["name!=alice"]).matches(&r));
    }

    #[test]
    fn numeric_comparisons() {
        let r = record! { "age" => 30 };
        assert!(query(&["age>25"]).matches(&r));
        assert!(query(&["age>=30"]).matches(&r));
        assert!(!query(&["age<30"]).matches(&r));
        assert!(query(&["age<=30"]).matches(&r));
        assert!(query(&["age>29.5", "age<30.5"]).matches(&r));
    }

    #[test]
    fn pattern_and_presence() {
        let r = record! { "email" => "a@example.com" };
        assert!(query(&["email~@example\\.com$"]).matches(&r));
        assert!(query(&["email?"]).matches(&r));
        assert!(!query(&["email!?"]).matches(&r));
        assert!(query(&["phone!?"]).matches(&r));
    }

    #[test]
    fn operand_may_contain_operators() {
        let r = record! { "expr" => "a=b" };
        assert!(query(&["expr=a=b"]).matches(&r));
        assert!(query(&["expr~^a=b?$"]).matches(&r));
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert!(query(&[" age > 1 "]).matches(&record! { "age" => 2 }));
    }

    #[test]
    fn errors() {
        assert_eq!(
            parse_filter("name").unwrap_err(),
            FilterError::MissingOperator("name".into())
        );
        assert_eq!(
            parse_filter("=1").unwrap_err(),
            FilterError::MissingField("=1".into())
        );
        assert!(matches!(
            parse_filter("age>old").unwrap_err(),
            FilterError::InvalidNumber { .. }
        ));
        assert!(matches!(
            parse_filter("name~(").unwrap_err(),
            FilterError::InvalidPattern { .. }
        ));
        assert!(matches!(parse_filter("?").unwrap_err(), FilterError::MissingField(_)));
    }
}
