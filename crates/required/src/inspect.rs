//! Field value introspection.
//!
//! The engine never looks at a field's concrete type. Every field is reached
//! through [`Inspect`], which projects the value onto one of the [`Kind`]s the
//! evaluator understands.

use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Category of a field value.
///
/// The kind decides what "default" means for a value and which magnitude a
/// `min`/`max` bound is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Text,
    Signed,
    Unsigned,
    Float,
    Sequence,
    Optional,
    Record,
    Other,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Text => "text",
            Kind::Signed => "signed integer",
            Kind::Unsigned => "unsigned integer",
            Kind::Float => "floating point",
            Kind::Sequence => "sequence",
            Kind::Optional => "optional",
            Kind::Record => "record",
            Kind::Other => "other",
        };
        f.write_str(name)
    }
}

/// A borrowed view of a field value.
#[derive(Clone, Copy)]
pub enum Value<'a> {
    /// Text; its magnitude is its length in bytes.
    Text(&'a str),
    /// Any signed integer, widened to 64 bits.
    Signed(i64),
    /// Any unsigned integer, widened to 64 bits.
    Unsigned(u64),
    /// Any floating point number.
    Float(f64),
    /// An ordered or unordered collection, reduced to its element count.
    Sequence(usize),
    /// A value that may be absent (`None` is the absent state).
    Optional(Option<&'a dyn Inspect>),
    /// A nested record with its own annotated fields.
    Record(&'a dyn Record),
    /// A value the engine cannot introspect. Never default, never out of range.
    Other,
}

impl Value<'_> {
    /// The kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Text(_) => Kind::Text,
            Value::Signed(_) => Kind::Signed,
            Value::Unsigned(_) => Kind::Unsigned,
            Value::Float(_) => Kind::Float,
            Value::Sequence(_) => Kind::Sequence,
            Value::Optional(_) => Kind::Optional,
            Value::Record(_) => Kind::Record,
            Value::Other => Kind::Other,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Value::Signed(n) => f.debug_tuple("Signed").field(n).finish(),
            Value::Unsigned(n) => f.debug_tuple("Unsigned").field(n).finish(),
            Value::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Value::Sequence(len) => f.debug_tuple("Sequence").field(len).finish(),
            Value::Optional(inner) => f
                .debug_tuple("Optional")
                .field(&inner.map(|v| v.inspect()))
                .finish(),
            Value::Record(r) => f.debug_tuple("Record").field(&r.type_name()).finish(),
            Value::Other => f.write_str("Other"),
        }
    }
}

/// Projects a value onto a [`Value`] the engine can judge.
///
/// Implementations must be total: a type that cannot describe itself returns
/// [`Value::Other`] instead of panicking.
///
/// `#[derive(Record)]` implements this trait for the deriving struct, so
/// records nest inside other records without extra work. Manual [`Record`]
/// implementors add:
///
/// ```rust,ignore
/// impl Inspect for Account {
///     fn inspect(&self) -> Value<'_> {
///         Value::Record(self)
///     }
/// }
/// ```
pub trait Inspect {
    fn inspect(&self) -> Value<'_>;
}

macro_rules! inspect_as {
    ($variant:ident($wide:ty): $($ty:ty),+ $(,)?) => {
        $(
            impl Inspect for $ty {
                #[inline]
                fn inspect(&self) -> Value<'_> {
                    Value::$variant(*self as $wide)
                }
            }
        )+
    };
}

inspect_as!(Signed(i64): i8, i16, i32, i64, isize);
inspect_as!(Unsigned(u64): u8, u16, u32, u64, usize);
inspect_as!(Float(f64): f32, f64);

impl Inspect for i128 {
    fn inspect(&self) -> Value<'_> {
        Value::Signed((*self).clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

impl Inspect for u128 {
    fn inspect(&self) -> Value<'_> {
        Value::Unsigned((*self).min(u64::MAX as u128) as u64)
    }
}

impl Inspect for str {
    #[inline]
    fn inspect(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl Inspect for String {
    #[inline]
    fn inspect(&self) -> Value<'_> {
        Value::Text(self.as_str())
    }
}

macro_rules! inspect_other {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Inspect for $ty {
                #[inline]
                fn inspect(&self) -> Value<'_> {
                    Value::Other
                }
            }
        )+
    };
}

inspect_other!(bool, char, ());

impl<T> Inspect for [T] {
    #[inline]
    fn inspect(&self) -> Value<'_> {
        Value::Sequence(self.len())
    }
}

impl<T, const N: usize> Inspect for [T; N] {
    #[inline]
    fn inspect(&self) -> Value<'_> {
        Value::Sequence(N)
    }
}

impl<T> Inspect for Vec<T> {
    #[inline]
    fn inspect(&self) -> Value<'_> {
        Value::Sequence(self.len())
    }
}

impl<T> Inspect for VecDeque<T> {
    fn inspect(&self) -> Value<'_> {
        Value::Sequence(self.len())
    }
}

impl<K, V, S> Inspect for HashMap<K, V, S> {
    fn inspect(&self) -> Value<'_> {
        Value::Sequence(self.len())
    }
}

impl<T, S> Inspect for HashSet<T, S> {
    fn inspect(&self) -> Value<'_> {
        Value::Sequence(self.len())
    }
}

impl<K, V> Inspect for BTreeMap<K, V> {
    fn inspect(&self) -> Value<'_> {
        Value::Sequence(self.len())
    }
}

impl<T> Inspect for BTreeSet<T> {
    fn inspect(&self) -> Value<'_> {
        Value::Sequence(self.len())
    }
}

impl<T: Inspect> Inspect for Option<T> {
    #[inline]
    fn inspect(&self) -> Value<'_> {
        Value::Optional(self.as_ref().map(|v| v as &dyn Inspect))
    }
}

// Owning pointers cannot be null, so they are transparent.

impl<T: Inspect + ?Sized> Inspect for &T {
    #[inline]
    fn inspect(&self) -> Value<'_> {
        (**self).inspect()
    }
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    #[inline]
    fn inspect(&self) -> Value<'_> {
        (**self).inspect()
    }
}

impl<T: Inspect + ?Sized> Inspect for Rc<T> {
    fn inspect(&self) -> Value<'_> {
        (**self).inspect()
    }
}

impl<T: Inspect + ?Sized> Inspect for Arc<T> {
    fn inspect(&self) -> Value<'_> {
        (**self).inspect()
    }
}

impl<B> Inspect for Cow<'_, B>
where
    B: Inspect + ToOwned + ?Sized,
{
    fn inspect(&self) -> Value<'_> {
        (**self).inspect()
    }
}
