//! Query evaluation.
//!
//! A [`Query`] is an ordered list of `(field, criterion)` pairs combined
//! with AND. Each criterion is either a literal value compared for
//! equality or a [`Predicate`]. An empty query matches every record.
//!
//! There is no index: every query is a linear scan over the collection,
//! evaluating pairs in the order they were added and stopping at the first
//! one that fails.

use crate::predicate::{literal_matches, Predicate};
use algoedb_codec::{Record, Value};
use std::fmt;

/// How one field is tested.
pub enum Criterion {
    /// Exact equality with a literal.
    Equals(Value),
    /// An arbitrary predicate.
    Predicate(Box<dyn Predicate>),
}

impl Criterion {
    /// Evaluates the criterion against a field value (`None` if absent).
    pub fn evaluate(&self, value: Option<&Value>) -> bool {
        match self {
            Criterion::Equals(expected) => literal_matches(expected, value),
            Criterion::Predicate(predicate) => predicate.evaluate(value),
        }
    }
}

impl fmt::Debug for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Equals(value) => f.debug_tuple("Equals").field(value).finish(),
            Criterion::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A conjunction of field criteria.
///
/// ```rust
/// use algoedb_core::predicate::more_than;
/// use algoedb_core::Query;
/// use algoedb_codec::record;
///
/// let query = Query::new().eq("name", "b").with("age", more_than(25));
/// assert!(query.matches(&record! { "name" => "b", "age" => 30 }));
/// assert!(!query.matches(&record! { "name" => "b", "age" => 20 }));
/// ```
#[derive(Debug, Default)]
pub struct Query {
    criteria: Vec<(String, Criterion)>,
}

impl Query {
    /// Creates an empty query, which matches every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias for [`Query::new`]; reads better at call sites that want
    /// every record.
    #[must_use]
    pub fn all() -> Self {
        Self::new()
    }

    /// Builds a query requiring every field of `record` to be equal.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        Self {
            criteria: record
                .iter()
                .map(|(field, value)| (field.to_string(), Criterion::Equals(value.clone())))
                .collect(),
        }
    }

    /// Requires `field` to equal `value`.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.criteria
            .push((field.into(), Criterion::Equals(value.into())));
        self
    }

    /// Requires `predicate` to hold for `field`.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, predicate: impl Predicate + 'static) -> Self {
        self.criteria
            .push((field.into(), Criterion::Predicate(Box::new(predicate))));
        self
    }

    /// Adds a prebuilt criterion for `field`.
    #[must_use]
    pub fn criterion(mut self, field: impl Into<String>, criterion: Criterion) -> Self {
        self.criteria.push((field.into(), criterion));
        self
    }

    /// Number of field criteria.
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Returns true if the query has no criteria (matches everything).
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Field names referenced by the query, in evaluation order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.criteria.iter().map(|(field, _)| field.as_str())
    }

    /// Returns true if `record` satisfies every criterion.
    pub fn matches(&self, record: &Record) -> bool {
        self.criteria
            .iter()
            .all(|(field, criterion)| criterion.evaluate(record.get(field)))
    }
}

impl<K: Into<String>> FromIterator<(K, Criterion)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, Criterion)>>(iter: I) -> Self {
        Self {
            criteria: iter.into_iter().map(|(k, c)| (k.into(), c)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{exists, matches, more_than, not};
    use algoedb_codec::record;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn empty_query_matches_everything() {
        let q = Query::new();
        assert!(q.is_empty());
        assert!(q.matches(&record! {}));
        assert!(q.matches(&record! { "a" => 1 }));
    }

    #[test]
    fn literal_equality() {
        let q = Query::new().eq("name", "a");
        assert!(q.matches(&record! { "name" => "a", "age" => 20 }));
        assert!(!q.matches(&record! { "name" => "b" }));
        assert!(!q.matches(&record! { "age" => 20 }));
    }

    #[test]
    fn literal_type_mismatch_is_false() {
        let q = Query::new().eq("age", "20");
        assert!(!q.matches(&record! { "age" => 20 }));
    }

    #[test]
    fn null_literal_matches_absent_field() {
        let q = Query::new().eq("manager", Value::Null);
        assert!(q.matches(&record! { "name" => "a" }));
        assert!(q.matches(&record! { "manager" => Value::Null }));
        assert!(!q.matches(&record! { "manager" => "b" }));
    }

    #[test]
    fn nested_literals_compare_structurally() {
        let q = Query::new().eq("tags", vec!["a", "b"]);
        assert!(q.matches(&record! { "tags" => vec!["a", "b"] }));
        assert!(!q.matches(&record! { "tags" => vec!["b", "a"] }));

        let q = Query::new().eq("address", record! { "city" => "Oslo" });
        assert!(q.matches(&record! { "address" => record! { "city" => "Oslo" } }));
    }

    #[test]
    fn criteria_are_anded() {
        let q = Query::new()
            .eq("name", "b")
            .with("age", more_than(25))
            .with("email", exists());

        assert!(q.matches(&record! { "name" => "b", "age" => 30, "email" => "b@x" }));
        assert!(!q.matches(&record! { "name" => "b", "age" => 30 }));
        assert!(!q.matches(&record! { "name" => "b", "age" => 25, "email" => "b@x" }));
        assert_eq!(q.len(), 3);
        assert_eq!(q.fields().collect::<Vec<_>>(), vec!["name", "age", "email"]);
    }

    #[test]
    fn evaluation_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let q = Query::new().eq("name", "nobody").with("age", move |_: Option<&Value>| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        assert!(!q.matches(&record! { "name" => "a", "age" => 1 }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn predicates_see_absent_fields() {
        let q = Query::new().with("deleted_at", not(exists()));
        assert!(q.matches(&record! { "name" => "a" }));
        assert!(!q.matches(&record! { "deleted_at" => "2024-01-01" }));
    }

    #[test]
    fn from_record_requires_all_fields() {
        let q = Query::from_record(&record! { "name" => "a", "age" => 20 });
        assert!(q.matches(&record! { "name" => "a", "age" => 20, "x" => true }));
        assert!(!q.matches(&record! { "name" => "a" }));
    }

    #[test]
    fn from_iterator() {
        let q: Query = vec![
            ("name", Criterion::Predicate(Box::new(matches("^a")))),
            ("age", Criterion::Equals(Value::from(1))),
        ]
        .into_iter()
        .collect();
        assert!(q.matches(&record! { "name" => "alice", "age" => 1 }));
        assert!(format!("{:?}", Query::new().eq("a", 1)).contains("Equals"));
    }
}
