//! Records and their field descriptors.
//!
//! A record describes itself by returning an ordered [`Fields`] list. Each
//! entry borrows the field's value and carries the metadata its author
//! attached. `#[derive(Record)]` writes this list for you; a manual
//! implementation looks like:
//!
//! ```rust,ignore
//! use required::{Fields, Inspect, Record, Value};
//!
//! struct Account {
//!     owner: String,
//!     balance: i64,
//!     note: String,
//! }
//!
//! impl Record for Account {
//!     fn type_name(&self) -> &'static str {
//!         "Account"
//!     }
//!
//!     fn fields(&self) -> Fields<'_> {
//!         Fields::with_capacity(3)
//!             .tag("owner", &self.owner, "yes, min=2, max=64")
//!             .options("balance", &self.balance, Some("1"), None)
//!             .untagged("note", &self.note)
//!     }
//! }
//!
//! impl Inspect for Account {
//!     fn inspect(&self) -> Value<'_> {
//!         Value::Record(self)
//!     }
//! }
//! ```

use crate::inspect::Inspect;

/// A caller-owned aggregate of named fields.
///
/// The engine only borrows records for the duration of one validation call
/// and never mutates them.
pub trait Record {
    /// Name reported in violations.
    fn type_name(&self) -> &'static str;

    /// Field descriptors in declaration order.
    fn fields(&self) -> Fields<'_>;
}

/// Validation metadata attached to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metadata<'a> {
    /// Tag string of the shape `"<presence>[, min=<int>][, max=<int>]"`.
    Tag(&'a str),
    /// Presence marker with independent `min` / `max` entries.
    Options {
        min: Option<&'a str>,
        max: Option<&'a str>,
    },
}

impl Metadata<'_> {
    /// Whether the metadata declares anything beyond the presence marker.
    pub fn has_range_options(&self) -> bool {
        match self {
            Metadata::Tag(tag) => tag.contains(','),
            Metadata::Options { min, max } => min.is_some() || max.is_some(),
        }
    }
}

/// One field descriptor.
#[derive(Clone, Copy)]
pub struct Field<'a> {
    pub name: &'a str,
    /// `None` for fields that do not take part in validation.
    pub metadata: Option<Metadata<'a>>,
    pub value: &'a dyn Inspect,
}

impl std::fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .field("value", &self.value.inspect())
            .finish()
    }
}

/// Ordered list of a record's field descriptors.
#[derive(Debug, Clone, Default)]
pub struct Fields<'a> {
    fields: Vec<Field<'a>>,
}

impl<'a> Fields<'a> {
    /// Create an empty field list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty field list with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Register a field annotated with a tag string.
    pub fn tag(self, name: &'a str, value: &'a dyn Inspect, tag: &'a str) -> Self {
        self.push(Field {
            name,
            metadata: Some(Metadata::Tag(tag)),
            value,
        })
    }

    /// Register a field annotated with separate `min` / `max` entries.
    pub fn options(
        self,
        name: &'a str,
        value: &'a dyn Inspect,
        min: Option<&'a str>,
        max: Option<&'a str>,
    ) -> Self {
        self.push(Field {
            name,
            metadata: Some(Metadata::Options { min, max }),
            value,
        })
    }

    /// Register a field that carries no validation metadata.
    pub fn untagged(self, name: &'a str, value: &'a dyn Inspect) -> Self {
        self.push(Field {
            name,
            metadata: None,
            value,
        })
    }

    /// Append a prepared descriptor.
    pub fn push(mut self, field: Field<'a>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field<'a>> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate only over fields that carry metadata.
    pub fn tagged(&self) -> impl Iterator<Item = &Field<'a>> {
        self.fields.iter().filter(|f| f.metadata.is_some())
    }
}

impl<'a> IntoIterator for Fields<'a> {
    type Item = Field<'a>;
    type IntoIter = std::vec::IntoIter<Field<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a, 'b> IntoIterator for &'b Fields<'a> {
    type Item = &'b Field<'a>;
    type IntoIter = std::slice::Iter<'b, Field<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_declaration_order() {
        let a = String::from("x");
        let b = 3u8;
        let c = vec![1];
        let fields = Fields::new()
            .tag("a", &a, "yes")
            .untagged("b", &b)
            .options("c", &c, Some("1"), None);

        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.tagged().count(), 2);
    }

    #[test]
    fn range_options_detection() {
        assert!(!Metadata::Tag("yes").has_range_options());
        assert!(Metadata::Tag("yes, min=2").has_range_options());
        assert!(!Metadata::Tag("min=3").has_range_options());
        assert!(!Metadata::Options {
            min: None,
            max: None
        }
        .has_range_options());
        assert!(Metadata::Options {
            min: None,
            max: Some("4")
        }
        .has_range_options());
    }
}
