//! Kind-dispatch evaluation of a single value.
//!
//! Both checks are total. Values the engine cannot introspect
//! ([`Value::Other`]) are never default and never out of range.

use crate::constraint::Bounds;
use crate::inspect::{Inspect, Kind, Value};
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nesting depth followed by [`is_default`] when called outside a validator.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// The quantity a bound is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Magnitude {
    /// Numeric value of an integer.
    Integer(i128),
    /// Numeric value of a float.
    Float(f64),
    /// Byte length of text or element count of a sequence.
    Length(usize),
}

impl Magnitude {
    fn below(&self, bound: i64) -> bool {
        match *self {
            Magnitude::Integer(n) => n < i128::from(bound),
            Magnitude::Float(n) => n < bound as f64,
            Magnitude::Length(n) => (n as i128) < i128::from(bound),
        }
    }

    fn above(&self, bound: i64) -> bool {
        match *self {
            Magnitude::Integer(n) => n > i128::from(bound),
            Magnitude::Float(n) => n > bound as f64,
            Magnitude::Length(n) => (n as i128) > i128::from(bound),
        }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Magnitude::Integer(n) => write!(f, "{n}"),
            Magnitude::Float(n) => write!(f, "{n}"),
            Magnitude::Length(n) => write!(f, "length {n}"),
        }
    }
}

/// A value whose magnitude lies outside its declared bounds.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[error("{kind} {magnitude} violates {bounds}")]
pub struct RangeViolation {
    pub kind: Kind,
    pub magnitude: Magnitude,
    pub bounds: Bounds,
}

/// Whether `value` holds the default of its kind.
///
/// ```
/// use required::is_default;
///
/// assert!(is_default(&String::new()));
/// assert!(is_default(&0u32));
/// assert!(is_default(&None::<u8>));
/// assert!(!is_default(&vec![1]));
/// assert!(!is_default(&false)); // unsupported kinds are never default
/// ```
pub fn is_default(value: &dyn Inspect) -> bool {
    value_is_default(value.inspect(), DEFAULT_MAX_DEPTH)
}

/// Check `value` against `bounds` using its kind's magnitude.
///
/// ```
/// use required::{check_range, Bounds};
///
/// let bounds = Bounds::new(Some(3), Some(7));
/// assert!(check_range(&vec![1, 2, 3, 4], bounds).is_ok());
/// assert!(check_range(&"hi", bounds).is_err());
/// ```
pub fn check_range(value: &dyn Inspect, bounds: Bounds) -> Result<(), RangeViolation> {
    value_in_range(value.inspect(), bounds)
}

pub(crate) fn value_is_default(value: Value<'_>, depth_left: usize) -> bool {
    match value {
        Value::Text(s) => s.is_empty(),
        Value::Signed(n) => n == 0,
        Value::Unsigned(n) => n == 0,
        Value::Float(n) => n == 0.0,
        Value::Sequence(len) => len == 0,
        Value::Optional(inner) => inner.is_none(),
        Value::Record(record) => record_is_default(record, depth_left),
        Value::Other => false,
    }
}

/// A nested record is default when it has tagged fields and all of them are.
fn record_is_default(record: &dyn Record, depth_left: usize) -> bool {
    let Some(depth_left) = depth_left.checked_sub(1) else {
        return false;
    };
    let fields = record.fields();
    let mut tagged = fields.tagged().peekable();
    if tagged.peek().is_none() {
        return false;
    }
    tagged.all(|field| value_is_default(field.value.inspect(), depth_left))
}

pub(crate) fn value_in_range(value: Value<'_>, bounds: Bounds) -> Result<(), RangeViolation> {
    if bounds.is_unbounded() {
        return Ok(());
    }

    let magnitude = match value {
        Value::Text(s) => Magnitude::Length(s.len()),
        Value::Signed(n) => Magnitude::Integer(i128::from(n)),
        Value::Unsigned(n) => Magnitude::Integer(i128::from(n)),
        Value::Float(n) => Magnitude::Float(n),
        Value::Sequence(len) => Magnitude::Length(len),
        Value::Optional(Some(inner)) => return value_in_range(inner.inspect(), bounds),
        Value::Optional(None) | Value::Record(_) | Value::Other => return Ok(()),
    };

    let too_small = bounds.min.is_some_and(|min| magnitude.below(min));
    let too_large = bounds.max.is_some_and(|max| magnitude.above(max));
    if too_small || too_large {
        return Err(RangeViolation {
            kind: value.kind(),
            magnitude,
            bounds,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min: i64, max: i64) -> Bounds {
        Bounds::new(Some(min), Some(max))
    }

    #[test]
    fn defaults_per_kind() {
        assert!(is_default(&""));
        assert!(is_default(&0i16));
        assert!(is_default(&0u64));
        assert!(is_default(&0.0f32));
        assert!(is_default(&Vec::<u8>::new()));
        assert!(is_default(&None::<String>));

        assert!(!is_default(&"a"));
        assert!(!is_default(&-1i64));
        assert!(!is_default(&0.5f64));
        assert!(!is_default(&f64::NAN));
        assert!(!is_default(&[0u8]));
        assert!(!is_default(&Some(String::new())));
        assert!(!is_default(&true));
        assert!(!is_default(&false));
    }

    #[test]
    fn range_table() {
        let cases: Vec<(Box<dyn Inspect>, Bounds, bool)> = vec![
            (Box::new(32i32), bounds(4, 32), true),
            (Box::new(32u32), bounds(4, 30), false),
            (Box::new("KonstantinGasser"), bounds(12, 25), true),
            (Box::new("Gasser"), bounds(12, 25), false),
            (Box::new(Vec::<i32>::new()), Bounds::new(Some(1), None), false),
            (Box::new(vec![1, 2, 3]), bounds(3, 10), true),
            (Box::new(12.6f32), bounds(2, 20), true),
            (Box::new(20.5f64), bounds(2, 20), false),
            (Box::new(-5i8), bounds(-10, -1), true),
            (Box::new(u64::MAX), Bounds::new(Some(-1), None), true),
            (Box::new(u64::MAX), Bounds::new(None, Some(i64::MAX)), false),
        ];

        for (value, bounds, ok) in cases {
            let result = check_range(&*value, bounds);
            assert_eq!(result.is_ok(), ok, "{:?} against {bounds}", value.inspect());
        }
    }

    #[test]
    fn text_length_counts_bytes() {
        assert!(check_range(&"ßüç", bounds(6, 6)).is_ok());
        assert!(check_range(&"ßüç", bounds(1, 3)).is_err());
    }

    #[test]
    fn present_optional_checks_inner_value() {
        assert!(check_range(&Some(5u8), bounds(1, 4)).is_err());
        assert!(check_range(&Some("abc"), bounds(1, 4)).is_ok());
        assert!(check_range(&None::<u8>, bounds(1, 4)).is_ok());
    }

    #[test]
    fn unsupported_kinds_always_pass() {
        assert!(check_range(&true, bounds(5, 6)).is_ok());
        assert!(check_range(&'c', bounds(5, 6)).is_ok());
    }

    #[test]
    fn nan_never_violates() {
        assert!(check_range(&f64::NAN, bounds(1, 2)).is_ok());
    }

    #[test]
    fn violation_describes_the_failure() {
        let err = check_range(&vec![1; 8], bounds(3, 7)).unwrap_err();
        assert_eq!(err.kind, Kind::Sequence);
        assert_eq!(err.magnitude, Magnitude::Length(8));
        assert_eq!(err.to_string(), "sequence length 8 violates min=3, max=7");
    }

    #[test]
    fn range_check_is_idempotent() {
        let value = 14i32;
        let first = check_range(&value, bounds(6, 12));
        let second = check_range(&value, bounds(6, 12));
        assert_eq!(first, second);
    }
}
