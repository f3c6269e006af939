//! Field-level predicates.
//!
//! A predicate tests the value of a single field. The value is `None` when
//! the field is absent from the record. Predicates never fail: an operand
//! of the wrong type simply evaluates to `false`.
//!
//! Numeric predicates convert every numeric representation (signed,
//! unsigned, floating) to `f64` before comparing.
//!
//! ```rust
//! use algoedb_core::predicate::{and, between, exists, more_than, not, Predicate, PredicateExt};
//! use algoedb_codec::{Number, Value};
//!
//! let adult = more_than(17);
//! assert!(adult.evaluate(Some(&Value::from(30u8))));
//! assert!(!adult.evaluate(Some(&Value::from("30"))));
//! assert!(!adult.evaluate(None));
//!
//! let teen = and(vec![exists().boxed(), between(12, 20).boxed()]);
//! assert!(teen.evaluate(Some(&Value::from(15))));
//! assert!(not(teen).evaluate(Some(&Value::from(25))));
//! ```

use crate::error::{CoreError, CoreResult};
use algoedb_codec::{Number, Value};
use regex::Regex;
use tracing::warn;

/// A boolean test over one field's value.
///
/// Implementations must be pure: they may not mutate the value and should
/// return the same answer for the same input. Any
/// `Fn(Option<&Value>) -> bool + Send + Sync` closure is a predicate.
pub trait Predicate: Send + Sync {
    /// Evaluates the predicate. `value` is `None` when the field is absent.
    fn evaluate(&self, value: Option<&Value>) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(Option<&Value>) -> bool + Send + Sync,
{
    fn evaluate(&self, value: Option<&Value>) -> bool {
        self(value)
    }
}

/// Combinator helpers available on every predicate.
pub trait PredicateExt: Predicate + Sized + 'static {
    /// Boxes the predicate for use in [`and`] / [`or`] lists.
    fn boxed(self) -> Box<dyn Predicate> {
        Box::new(self)
    }

    /// Conjunction of `self` and `other`.
    fn and<P: Predicate + 'static>(self, other: P) -> And {
        and(vec![self.boxed(), other.boxed()])
    }

    /// Disjunction of `self` and `other`.
    fn or<P: Predicate + 'static>(self, other: P) -> Or {
        or(vec![self.boxed(), other.boxed()])
    }

    /// Negation of `self`.
    fn negate(self) -> Not {
        not(self)
    }
}

impl<P: Predicate + Sized + 'static> PredicateExt for P {}

fn numeric(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

/// `target > bound`.
#[derive(Debug, Clone, Copy)]
pub struct MoreThan {
    bound: f64,
}

impl Predicate for MoreThan {
    fn evaluate(&self, value: Option<&Value>) -> bool {
        numeric(value).is_some_and(|n| n > self.bound)
    }
}

/// `target >= bound`.
#[derive(Debug, Clone, Copy)]
pub struct MoreThanOrEqual {
    bound: f64,
}

impl Predicate for MoreThanOrEqual {
    fn evaluate(&self, value: Option<&Value>) -> bool {
        numeric(value).is_some_and(|n| n >= self.bound)
    }
}

/// `target < bound`.
#[derive(Debug, Clone, Copy)]
pub struct LessThan {
    bound: f64,
}

impl Predicate for LessThan {
    fn evaluate(&self, value: Option<&Value>) -> bool {
        numeric(value).is_some_and(|n| n < self.bound)
    }
}

/// `target <= bound`.
#[derive(Debug, Clone, Copy)]
pub struct LessThanOrEqual {
    bound: f64,
}

impl Predicate for LessThanOrEqual {
    fn evaluate(&self, value: Option<&Value>) -> bool {
        numeric(value).is_some_and(|n| n <= self.bound)
    }
}

/// `low < target < high`.
#[derive(Debug, Clone, Copy)]
pub struct Between {
    low: f64,
    high: f64,
}

impl Predicate for Between {
    fn evaluate(&self, value: Option<&Value>) -> bool {
        numeric(value).is_some_and(|n| self.low < n && n < self.high)
    }
}

/// `low <= target <= high`.
#[derive(Debug, Clone, Copy)]
pub struct BetweenOrEqual {
    low: f64,
    high: f64,
}

impl Predicate for BetweenOrEqual {
    fn evaluate(&self, value: Option<&Value>) -> bool {
        numeric(value).is_some_and(|n| self.low <= n && n <= self.high)
    }
}

/// Field is present and not null.
#[derive(Debug, Clone, Copy)]
pub struct Exists;

impl Predicate for Exists {
    fn evaluate(&self, value: Option<&Value>) -> bool {
        value.is_some_and(|v| !v.is_null())
    }
}

/// Field is a string matching a regular expression.
#[derive(Debug, Clone)]
pub struct Matches {
    pattern: String,
    regex: Option<Regex>,
}

impl Matches {
    /// The source pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns false if the pattern failed to compile; such a predicate
    /// never matches.
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }
}

impl Predicate for Matches {
    fn evaluate(&self, value: Option<&Value>) -> bool {
        match (&self.regex, value) {
            (Some(regex), Some(Value::String(s))) => regex.is_match(s),
            _ => false,
        }
    }
}

/// Field equals a literal value.
#[derive(Debug, Clone)]
pub struct Equals {
    expected: Value,
}

impl Predicate for Equals {
    fn evaluate(&self, value: Option<&Value>) -> bool {
        literal_matches(&self.expected, value)
    }
}

/// All sub-predicates hold. Empty means true.
pub struct And {
    predicates: Vec<Box<dyn Predicate>>,
}

impl Predicate for And {
    fn evaluate(&self, value: Option<&Value>) -> bool {
        self.predicates.iter().all(|p| p.evaluate(value))
    }
}

/// Any sub-predicate holds. Empty means false.
pub struct Or {
    predicates: Vec<Box<dyn Predicate>>,
}

impl Predicate for Or {
    fn evaluate(&self, value: Option<&Value>) -> bool {
        self.predicates.iter().any(|p| p.evaluate(value))
    }
}

/// Negation of a predicate.
pub struct Not {
    inner: Box<dyn Predicate>,
}

impl Predicate for Not {
    fn evaluate(&self, value: Option<&Value>) -> bool {
        !self.inner.evaluate(value)
    }
}

/// Literal equality on the dynamic value.
///
/// A `Null` literal also matches an absent field; any other literal
/// requires the field to be present with an equal value of the same type.
pub(crate) fn literal_matches(expected: &Value, actual: Option<&Value>) -> bool {
    match actual {
        Some(value) => value == expected,
        None => expected.is_null(),
    }
}

/// A number usable as a comparison bound.
///
/// Bounds are compared as `f64`, like the target values they are checked
/// against. Implemented for every primitive numeric type and [`Number`].
pub trait NumericBound {
    /// Converts the bound to `f64`.
    fn into_bound(self) -> f64;
}

macro_rules! impl_numeric_bound {
    ($($t:ty),*) => {
        $(
            impl NumericBound for $t {
                #[allow(
                    clippy::cast_precision_loss,
                    clippy::cast_lossless,
                    clippy::unnecessary_cast
                )]
                fn into_bound(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_numeric_bound!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl NumericBound for Number {
    fn into_bound(self) -> f64 {
        self.as_f64()
    }
}

/// True iff the target is numeric and greater than `bound`.
pub fn more_than(bound: impl NumericBound) -> MoreThan {
    MoreThan {
        bound: bound.into_bound(),
    }
}

/// True iff the target is numeric and at least `bound`.
pub fn more_than_or_equal(bound: impl NumericBound) -> MoreThanOrEqual {
    MoreThanOrEqual {
        bound: bound.into_bound(),
    }
}

/// True iff the target is numeric and less than `bound`.
pub fn less_than(bound: impl NumericBound) -> LessThan {
    LessThan {
        bound: bound.into_bound(),
    }
}

/// True iff the target is numeric and at most `bound`.
pub fn less_than_or_equal(bound: impl NumericBound) -> LessThanOrEqual {
    LessThanOrEqual {
        bound: bound.into_bound(),
    }
}

/// True iff the target is numeric and strictly between `low` and `high`.
pub fn between(low: impl NumericBound, high: impl NumericBound) -> Between {
    Between {
        low: low.into_bound(),
        high: high.into_bound(),
    }
}

/// True iff the target is numeric and within `low..=high`.
pub fn between_or_equal(low: impl NumericBound, high: impl NumericBound) -> BetweenOrEqual {
    BetweenOrEqual {
        low: low.into_bound(),
        high: high.into_bound(),
    }
}

/// True iff the field is present and not null.
pub fn exists() -> Exists {
    Exists
}

/// True iff the target is a string in which `pattern` finds a match.
///
/// An invalid pattern produces a predicate that never matches; use
/// [`try_matches`] to surface the compile error instead.
pub fn matches(pattern: &str) -> Matches {
    let regex = match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            warn!(pattern, error = %e, "invalid pattern, predicate will never match");
            None
        }
    };
    Matches {
        pattern: pattern.to_string(),
        regex,
    }
}

/// Like [`matches`], but fails on a pattern that does not compile.
///
/// # Errors
///
/// Returns `InvalidPattern` with the compiler diagnostic.
pub fn try_matches(pattern: &str) -> CoreResult<Matches> {
    let regex = Regex::new(pattern).map_err(|e| CoreError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    Ok(Matches {
        pattern: pattern.to_string(),
        regex: Some(regex),
    })
}

/// True iff the target equals `expected` (see the query rules for literals).
pub fn equals(expected: impl Into<Value>) -> Equals {
    Equals {
        expected: expected.into(),
    }
}

/// True iff every predicate holds.
pub fn and(predicates: impl IntoIterator<Item = Box<dyn Predicate>>) -> And {
    And {
        predicates: predicates.into_iter().collect(),
    }
}

/// True iff at least one predicate holds.
pub fn or(predicates: impl IntoIterator<Item = Box<dyn Predicate>>) -> Or {
    Or {
        predicates: predicates.into_iter().collect(),
    }
}

/// Logical negation.
pub fn not(predicate: impl Predicate + 'static) -> Not {
    Not {
        inner: Box::new(predicate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoedb_codec::record;

    fn num(n: i64) -> Value {
        Value::from(n)
    }

    #[test]
    fn bounds_accept_any_numeric_type() {
        let big = Some(Value::from(10u64));
        assert!(more_than(5i64).evaluate(big.as_ref()));
        assert!(more_than(5u64).evaluate(big.as_ref()));
        assert!(less_than(11usize).evaluate(big.as_ref()));
        assert!(more_than_or_equal(10u8).evaluate(big.as_ref()));
        assert!(less_than_or_equal(10.0f32).evaluate(big.as_ref()));
        assert!(between(9isize, 11i16).evaluate(big.as_ref()));
        assert!(between_or_equal(Number::Int(10), Number::Float(10.0)).evaluate(big.as_ref()));

        let count: usize = 3;
        assert!(!more_than(count).evaluate(Some(&num(3))));
    }

    #[test]
    fn between_is_exclusive() {
        let p = between(2, 5);
        assert!(!p.evaluate(Some(&num(2))));
        assert!(p.evaluate(Some(&num(3))));
        assert!(!p.evaluate(Some(&num(5))));
    }

    #[test]
    fn between_or_equal_is_inclusive() {
        let p = between_or_equal(2, 5);
        assert!(p.evaluate(Some(&num(2))));
        assert!(p.evaluate(Some(&num(5))));
        assert!(!p.evaluate(Some(&num(6))));
        assert!(!p.evaluate(Some(&Value::from(1.999))));
    }

    #[test]
    fn comparisons() {
        assert!(more_than(10).evaluate(Some(&num(11))));
        assert!(!more_than(10).evaluate(Some(&num(10))));
        assert!(more_than_or_equal(10).evaluate(Some(&num(10))));
        assert!(less_than(10).evaluate(Some(&num(9))));
        assert!(!less_than(10).evaluate(Some(&num(10))));
        assert!(less_than_or_equal(10).evaluate(Some(&num(10))));
    }

    #[test]
    fn numeric_representations_are_interchangeable() {
        let p = more_than(2.5);
        assert!(p.evaluate(Some(&Value::from(3u8))));
        assert!(p.evaluate(Some(&Value::from(3i16))));
        assert!(p.evaluate(Some(&Value::from(3u64))));
        assert!(p.evaluate(Some(&Value::from(2.6f32))));
        assert!(!p.evaluate(Some(&Value::from(-3i64))));
    }

    #[test]
    fn non_numeric_targets_are_false() {
        let p = more_than(10);
        assert!(!p.evaluate(Some(&Value::from("100"))));
        assert!(!p.evaluate(Some(&Value::Bool(true))));
        assert!(!p.evaluate(Some(&Value::Null)));
        assert!(!p.evaluate(Some(&Value::from(vec![100]))));
        assert!(!p.evaluate(None));
        assert!(!less_than(10).evaluate(Some(&Value::Object(record! {}))));
    }

    #[test]
    fn nan_bound_never_matches() {
        let p = more_than(f64::NAN);
        assert!(!p.evaluate(Some(&num(1))));
        assert!(!less_than(f64::NAN).evaluate(Some(&num(1))));
    }

    #[test]
    fn exists_checks_presence_and_null() {
        assert!(exists().evaluate(Some(&num(0))));
        assert!(exists().evaluate(Some(&Value::from(""))));
        assert!(exists().evaluate(Some(&Value::Bool(false))));
        assert!(!exists().evaluate(Some(&Value::Null)));
        assert!(!exists().evaluate(None));
    }

    #[test]
    fn matches_is_unanchored_search() {
        let p = matches("^al");
        assert!(p.evaluate(Some(&Value::from("alice"))));
        assert!(!p.evaluate(Some(&Value::from("sal"))));

        let p = matches("li");
        assert!(p.evaluate(Some(&Value::from("alice"))));
    }

    #[test]
    fn matches_non_string_is_false() {
        let p = matches("1");
        assert!(!p.evaluate(Some(&num(1))));
        assert!(!p.evaluate(None));
        assert!(!p.evaluate(Some(&Value::Null)));
    }

    #[test]
    fn invalid_pattern_never_matches() {
        let p = matches("(unclosed");
        assert!(!p.is_valid());
        assert_eq!(p.pattern(), "(unclosed");
        assert!(!p.evaluate(Some(&Value::from("(unclosed"))));
    }

    #[test]
    fn try_matches_reports_invalid_pattern() {
        let err = try_matches("[").unwrap_err();
        assert!(matches!(err, CoreError::InvalidPattern { .. }));
        assert!(try_matches("a+").unwrap().is_valid());
    }

    #[test]
    fn and_or_identities() {
        assert!(and(Vec::new()).evaluate(None));
        assert!(!or(Vec::new()).evaluate(None));
    }

    #[test]
    fn combinators() {
        let in_range = and(vec![more_than(1).boxed(), less_than(4).boxed()]);
        assert!(in_range.evaluate(Some(&num(2))));
        assert!(!in_range.evaluate(Some(&num(4))));

        let either = or(vec![equals("x").boxed(), more_than(100).boxed()]);
        assert!(either.evaluate(Some(&Value::from("x"))));
        assert!(either.evaluate(Some(&num(101))));
        assert!(!either.evaluate(Some(&num(5))));

        assert!(not(exists()).evaluate(None));
        assert!(!not(exists()).evaluate(Some(&num(1))));
    }

    #[test]
    fn ext_methods_compose() {
        let p = more_than(0).and(less_than(10)).or(equals(100)).negate();
        assert!(!p.evaluate(Some(&num(5))));
        assert!(!p.evaluate(Some(&num(100))));
        assert!(p.evaluate(Some(&num(50))));
    }

    #[test]
    fn closures_are_predicates() {
        let even = |v: Option<&Value>| {
            v.and_then(Value::as_number)
                .and_then(|n| n.as_i64())
                .is_some_and(|n| n % 2 == 0)
        };
        assert!(even.evaluate(Some(&num(4))));
        assert!(!even.evaluate(Some(&num(3))));
        assert!(and(vec![even.boxed(), more_than(2).boxed()]).evaluate(Some(&num(4))));
    }

    #[test]
    fn equals_rules() {
        assert!(equals(20).evaluate(Some(&Value::from(20u64))));
        assert!(!equals(20).evaluate(Some(&Value::from("20"))));
        assert!(!equals(20).evaluate(None));
        assert!(equals(Value::Null).evaluate(None));
        assert!(equals(Value::Null).evaluate(Some(&Value::Null)));
        assert!(!equals(Value::Null).evaluate(Some(&num(0))));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn between_is_two_strict_bounds(lo in -1e6f64..1e6, hi in -1e6f64..1e6, x in -1e6f64..1e6) {
                let v = Value::from(x);
                let expected = more_than(lo).evaluate(Some(&v)) && less_than(hi).evaluate(Some(&v));
                prop_assert_eq!(between(lo, hi).evaluate(Some(&v)), expected);
            }

            #[test]
            fn inclusive_bounds_contain_exclusive(lo in -1000i64..1000, x in -1000i64..1000) {
                let v = Value::from(x);
                if more_than(lo as f64).evaluate(Some(&v)) {
                    prop_assert!(more_than_or_equal(lo as f64).evaluate(Some(&v)));
                }
                prop_assert_eq!(
                    less_than_or_equal(lo as f64).evaluate(Some(&v)),
                    !more_than(lo as f64).evaluate(Some(&v))
                );
            }

            #[test]
            fn negation_inverts(x in any::<i32>(), bound in any::<i32>()) {
                let v = Value::from(x);
                prop_assert_eq!(
                    more_than(bound).negate().evaluate(Some(&v)),
                    !more_than(bound).evaluate(Some(&v))
                );
            }
        }
    }
}
