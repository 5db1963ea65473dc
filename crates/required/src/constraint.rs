//! Field metadata parsing.
//!
//! Turns the metadata an author attached to a field into a [`Constraint`].
//! Parsing is pure: metadata is re-read on every validation call and nothing
//! survives between calls.

use crate::record::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a declared bound of `0` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroBound {
    /// `min=0` / `max=0` mean "no bound", matching records written for the
    /// tag format before explicit zero bounds existed.
    #[default]
    Unset,
    /// `0` is an ordinary bound.
    Literal,
}

/// Closed interval a field's magnitude must fall within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl Bounds {
    pub const UNBOUNDED: Bounds = Bounds {
        min: None,
        max: None,
    };

    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    /// True when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "min={min}, max={max}"),
            (Some(min), None) => write!(f, "min={min}"),
            (None, Some(max)) => write!(f, "max={max}"),
            (None, None) => f.write_str("no bounds"),
        }
    }
}

/// Parsed form of a field's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Constraint {
    pub requires_non_default: bool,
    pub bounds: Bounds,
}

impl Constraint {
    /// Parse either metadata shape.
    pub fn from_metadata(
        metadata: &Metadata<'_>,
        policy: ZeroBound,
    ) -> Result<Self, ConstraintError> {
        match metadata {
            Metadata::Tag(tag) => parse_tag(tag, policy),
            Metadata::Options { min, max } => {
                let min = min.map(|v| parse_bound("min", v)).transpose()?;
                let max = max.map(|v| parse_bound("max", v)).transpose()?;
                Ok(Constraint {
                    requires_non_default: true,
                    bounds: finish(min, max, policy)?,
                })
            }
        }
    }
}

/// Metadata authoring errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintError {
    #[error("malformed field metadata: {detail}")]
    Syntax { detail: String },

    #[error("option `{option}` is not a number: {value:?}")]
    NotANumber { option: String, value: String },

    #[error("max ({max}) must not be lower than min ({min})")]
    MaxLowerThanMin { min: i64, max: i64 },
}

impl ConstraintError {
    fn syntax(detail: impl Into<String>) -> Self {
        ConstraintError::Syntax {
            detail: detail.into(),
        }
    }
}

/// Parse `key=value` option tokens using the default [`ZeroBound`] policy.
///
/// ```
/// use required::{parse, Bounds};
///
/// assert_eq!(parse(&["min=4", "max=6"]), Ok(Bounds::new(Some(4), Some(6))));
/// assert!(parse(&["min=12", "max=6"]).is_err());
/// ```
pub fn parse(options: &[&str]) -> Result<Bounds, ConstraintError> {
    parse_with(options, ZeroBound::default())
}

/// Parse `key=value` option tokens with an explicit [`ZeroBound`] policy.
pub fn parse_with(options: &[&str], policy: ZeroBound) -> Result<Bounds, ConstraintError> {
    parse_tokens(options.iter().copied(), policy)
}

/// Parse a complete tag string, e.g. `"yes, min=4, max=20"`.
pub fn parse_tag(tag: &str, policy: ZeroBound) -> Result<Constraint, ConstraintError> {
    let mut tokens = tag.split(',');
    let marker = tokens.next().unwrap_or_default().trim();
    if marker.is_empty() {
        return Err(ConstraintError::syntax("missing presence marker"));
    }
    if marker.contains('=') {
        return Err(ConstraintError::syntax(format!(
            "expected a presence marker before `{marker}`"
        )));
    }

    Ok(Constraint {
        requires_non_default: true,
        bounds: parse_tokens(tokens, policy)?,
    })
}

fn parse_tokens<'t>(
    tokens: impl IntoIterator<Item = &'t str>,
    policy: ZeroBound,
) -> Result<Bounds, ConstraintError> {
    let mut min = None;
    let mut max = None;

    for raw in tokens {
        let token = raw.trim();
        if token.is_empty() {
            return Err(ConstraintError::syntax("empty option"));
        }
        let Some((key, value)) = token.split_once('=') else {
            return Err(ConstraintError::syntax(format!(
                "option `{token}` is not of the form key=value"
            )));
        };

        let key = key.trim();
        let slot = match key {
            "min" => &mut min,
            "max" => &mut max,
            other => {
                return Err(ConstraintError::syntax(format!("unknown option `{other}`")));
            }
        };
        if slot.is_some() {
            return Err(ConstraintError::syntax(format!("option `{key}` given twice")));
        }
        *slot = Some(parse_bound(key, value)?);
    }

    finish(min, max, policy)
}

fn parse_bound(option: &str, value: &str) -> Result<i64, ConstraintError> {
    let value = value.trim();
    value
        .parse::<i64>()
        .map_err(|_| ConstraintError::NotANumber {
            option: option.to_string(),
            value: value.to_string(),
        })
}

fn finish(
    min: Option<i64>,
    max: Option<i64>,
    policy: ZeroBound,
) -> Result<Bounds, ConstraintError> {
    let (min, max) = match policy {
        ZeroBound::Unset => (min.filter(|&v| v != 0), max.filter(|&v| v != 0)),
        ZeroBound::Literal => (min, max),
    };

    if let (Some(min), Some(max)) = (min, max) {
        if max < min {
            return Err(ConstraintError::MaxLowerThanMin { min, max });
        }
    }

    Ok(Bounds { min, max })
}
