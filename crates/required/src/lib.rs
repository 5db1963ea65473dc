//! # required
//!
//! Struct-field validation driven by declarative per-field metadata. Every
//! annotated field must hold a non-default value and may additionally have to
//! fall within a closed `min`/`max` interval.
//!
//! ## Example
//!
//! ```rust,ignore
//! use required::prelude::*;
//!
//! #[derive(Record)]
//! struct CreateUser {
//!     #[required("yes, min=3, max=50")]
//!     username: String,
//!
//!     #[required(min = 18, max = 120)]
//!     age: u8,
//!
//!     #[required]
//!     roles: Vec<String>,
//!
//!     nickname: Option<String>,
//! }
//!
//! let user = CreateUser {
//!     username: "ab".into(),
//!     age: 0,
//!     roles: vec![],
//!     nickname: None,
//! };
//!
//! // Stops at the first problem.
//! let err = validate_fail_fast(inputs![user]).unwrap_err();
//! assert_eq!(err.kind, ViolationKind::ConstraintRangeFailed);
//!
//! // Reports every problem, grouped by input.
//! let report = validate_collect_all(inputs![user]);
//! assert_eq!(report.total(), 3);
//! println!("{report}");
//! ```
//!
//! ## Metadata
//!
//! - `#[required]` - the field must not hold its default value
//! - `#[required("yes, min=X, max=Y")]` - tag string, parsed on every call
//! - `#[required(min = X, max = Y)]` - separate `min` / `max` entries
//!
//! Bounds compare against the numeric value of numbers and the length of text
//! and collections. A declared `0` means "no bound" unless the validator is
//! configured with [`ZeroBound::Literal`].
//!
//! `#[derive(Record)]` only accepts structs with named fields:
//!
//! ```compile_fail
//! use required::Record;
//!
//! #[derive(Record)]
//! struct Pair(#[required] String, u32);
//! ```
//!
//! A field takes either a tag string or `min`/`max` entries, never both:
//!
//! ```compile_fail
//! use required::Record;
//!
//! #[derive(Record)]
//! struct Mixed {
//!     #[required("yes, min=2", max = 4)]
//!     name: String,
//! }
//! ```
//!
//! Unknown options are rejected at compile time too:
//!
//! ```compile_fail
//! use required::Record;
//!
//! #[derive(Record)]
//! struct Unknown {
//!     #[required(between = 4)]
//!     name: String,
//! }
//! ```
//!
//! ## Run modes
//!
//! - [`Validator::fail_fast`] returns the first [`Violation`] across all inputs
//! - [`Validator::collect_all`] returns a [`Report`] with every violation per input

// Lets `#[derive(Record)]` output refer to `::required` inside this crate too.
extern crate self as required;

#[macro_use]
mod tracing_macros;

mod config;
mod constraint;
mod evaluate;
mod inspect;
mod record;
mod report;
mod validator;
mod walk;

pub use config::Config;
pub use constraint::{parse, parse_tag, parse_with, Bounds, Constraint, ConstraintError, ZeroBound};
pub use evaluate::{check_range, is_default, Magnitude, RangeViolation, DEFAULT_MAX_DEPTH};
pub use inspect::{Inspect, Kind, Value};
pub use record::{Field, Fields, Metadata, Record};
pub use report::{Report, Violation, ViolationKind};
pub use validator::{validate_collect_all, validate_fail_fast, Validator, ValidatorBuilder};

#[cfg(feature = "derive")]
pub use required_macros::Record;

/// Build a `&[&dyn Inspect]` input list from heterogeneous values.
///
/// ```rust,ignore
/// let report = validate_collect_all(inputs![user, order, maybe_invoice]);
/// ```
#[macro_export]
macro_rules! inputs {
    ($($input:expr),* $(,)?) => {
        &[$(&$input as &dyn $crate::Inspect),*] as &[&dyn $crate::Inspect]
    };
}

/// Prelude module for validation
pub mod prelude {
    pub use crate::inputs;
    pub use crate::{
        validate_collect_all, validate_fail_fast, Config, Inspect, Record, Report, Validator,
        Violation, ViolationKind, ZeroBound,
    };
}
