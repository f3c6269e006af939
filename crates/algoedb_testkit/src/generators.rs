//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random records. Generated values
//! can always be persisted: floats are any finite `f64`, nesting stays far
//! below the record depth limit, and field names never start with `_`,
//! leaving that prefix free for fields a test adds itself.

use algoedb_codec::{Record, Value};
use proptest::prelude::*;

/// Strategy for generating field names.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,11}").expect("Invalid regex")
}

/// Strategy for generating scalar values.
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        finite_float_strategy().prop_map(Value::from),
        "\\PC{0,16}".prop_map(Value::from),
    ]
}

/// Strategy for generating any finite float, subnormals included.
pub fn finite_float_strategy() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |f| f.is_finite())
}

/// Strategy for generating NaN and the infinities.
pub fn non_finite_float_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)]
}

/// Strategy for generating values, nested up to three levels deep.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(field_name_strategy(), inner, 0..6)
                .prop_map(|fields| Value::Object(Record::from(fields))),
        ]
    })
}

/// Strategy for generating records.
pub fn record_strategy() -> impl Strategy<Value = Record> {
    prop::collection::btree_map(field_name_strategy(), value_strategy(), 0..8).prop_map(Record::from)
}

/// Strategy for generating collections of up to `max` records.
pub fn records_strategy(max: usize) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(record_strategy(), 0..=max)
}

/// Strategy for generating `{"name": String, "age": Int}` records, useful
/// for queries with predictable selectivity.
pub fn person_strategy() -> impl Strategy<Value = Record> {
    ("[a-e]", 0i64..100).prop_map(|(name, age)| {
        let mut record = Record::new();
        record.insert("name", name);
        record.insert("age", age);
        record
    })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoedb_codec::{from_json, to_json};

    fn depth(value: &Value) -> usize {
        match value {
            Value::Array(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
            Value::Object(record) => 1 + record.iter().map(|(_, v)| depth(v)).max().unwrap_or(0),
            _ => 0,
        }
    }

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn field_names_are_lowercase(name in field_name_strategy()) {
            let first = name.chars().next();
            prop_assert!(first.is_some_and(|c| c.is_ascii_lowercase()));
        }

        #[test]
        fn values_are_bounded(value in value_strategy()) {
            prop_assert!(depth(&value) <= 3);
        }

        #[test]
        fn records_survive_json(records in records_strategy(4)) {
            let decoded = from_json(&to_json(&records).unwrap()).unwrap();
            prop_assert_eq!(decoded, records);
        }

        #[test]
        fn floats_survive_json_bit_for_bit(f in finite_float_strategy()) {
            let records = vec![Record::from_iter([("f", Value::from(f))])];
            let decoded = from_json(&to_json(&records).unwrap()).unwrap();
            let back = decoded[0].get("f").and_then(Value::as_f64);
            prop_assert_eq!(back.map(f64::to_bits), Some(f.to_bits()));
        }

        #[test]
        fn people_have_name_and_age(person in person_strategy()) {
            prop_assert!(person.get("name").and_then(Value::as_str).is_some());
            prop_assert!(person.get("age").and_then(Value::as_number).is_some());
        }
    }
}
