//! Violations and the collect-all report.

use crate::constraint::ConstraintError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a [`Violation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The input is not a reference to a record.
    InvalidInputShape,
    /// The field's metadata string is malformed.
    SyntaxError,
    /// A `min` / `max` option is not an integer.
    NotANumber,
    /// Declared `max` is lower than declared `min`.
    MaxLowerThanMin,
    /// An annotated field holds the default value of its kind.
    DefaultValueFound,
    /// A field's magnitude lies outside its declared bounds.
    ConstraintRangeFailed,
}

impl ViolationKind {
    /// Authoring or usage defects the caller has to fix in code.
    pub fn is_metadata_error(&self) -> bool {
        matches!(
            self,
            ViolationKind::InvalidInputShape
                | ViolationKind::SyntaxError
                | ViolationKind::NotANumber
                | ViolationKind::MaxLowerThanMin
        )
    }

    /// Problems with the record's contents.
    pub fn is_data_error(&self) -> bool {
        !self.is_metadata_error()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::InvalidInputShape => "invalid input shape",
            ViolationKind::SyntaxError => "syntax error",
            ViolationKind::NotANumber => "not a number",
            ViolationKind::MaxLowerThanMin => "max lower than min",
            ViolationKind::DefaultValueFound => "default value found",
            ViolationKind::ConstraintRangeFailed => "constraint range failed",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&ConstraintError> for ViolationKind {
    fn from(err: &ConstraintError) -> Self {
        match err {
            ConstraintError::Syntax { .. } => ViolationKind::SyntaxError,
            ConstraintError::NotANumber { .. } => ViolationKind::NotANumber,
            ConstraintError::MaxLowerThanMin { .. } => ViolationKind::MaxLowerThanMin,
        }
    }
}

/// A single validation failure, attributed to an input and a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Position of the input in the validated list.
    pub index: usize,
    /// Type name of the input record.
    pub record: String,
    /// Field name; nested fields use a dotted path. Empty for shape errors.
    pub field: String,
    pub kind: ViolationKind,
    pub detail: String,
}

impl Violation {
    pub(crate) fn invalid_input(index: usize, detail: impl Into<String>) -> Self {
        Self {
            index,
            record: String::new(),
            field: String::new(),
            kind: ViolationKind::InvalidInputShape,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == ViolationKind::InvalidInputShape {
            return write!(f, "required: input {}: {}: {}", self.index, self.kind, self.detail);
        }
        write!(
            f,
            "required: {}.{} (input {}): {}: {}",
            self.record, self.field, self.index, self.kind, self.detail
        )
    }
}

impl std::error::Error for Violation {}

/// Result of a collect-all run: one violation list per input, in input order.
///
/// An empty list means the input passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    records: Vec<Vec<Violation>>,
}

impl Report {
    pub(crate) fn with_inputs(count: usize) -> Self {
        Self {
            records: Vec::with_capacity(count),
        }
    }

    pub(crate) fn push_record(&mut self, violations: Vec<Violation>) {
        self.records.push(violations);
    }

    /// Violations recorded for input `index`.
    pub fn get(&self, index: usize) -> Option<&[Violation]> {
        self.records.get(index).map(Vec::as_slice)
    }

    /// Whether input `index` exists and passed.
    pub fn passed(&self, index: usize) -> bool {
        self.get(index).is_some_and(<[Violation]>::is_empty)
    }

    /// Number of inputs covered by the report.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the report covers no inputs at all.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when no input produced a violation.
    pub fn is_clean(&self) -> bool {
        self.records.iter().all(Vec::is_empty)
    }

    /// Total number of violations across all inputs.
    pub fn total(&self) -> usize {
        self.records.iter().map(Vec::len).sum()
    }

    /// Per-input violation lists.
    pub fn iter(&self) -> impl Iterator<Item = &[Violation]> {
        self.records.iter().map(Vec::as_slice)
    }

    /// All violations in input order.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.records.iter().flatten()
    }

    /// `Ok` when clean, otherwise the first violation.
    pub fn into_result(self) -> Result<(), Violation> {
        match self.records.into_iter().flatten().next() {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }

    /// JSON form of the report: an array with one array of violations per input.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Human-readable listing of all violations grouped by input.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "required: no issues found in {} input(s)", self.len());
        }

        let failing = self.records.iter().filter(|v| !v.is_empty()).count();
        writeln!(
            f,
            "required: {} issue(s) in {} of {} input(s)",
            self.total(),
            failing,
            self.len()
        )?;

        for (index, violations) in self.records.iter().enumerate() {
            let Some(first) = violations.first() else {
                continue;
            };
            if first.record.is_empty() {
                writeln!(f, "[{index}]")?;
            } else {
                writeln!(f, "[{index}] {}", first.record)?;
            }
            for violation in violations {
                if violation.field.is_empty() {
                    writeln!(f, "    - {}: {}", violation.kind, violation.detail)?;
                } else {
                    writeln!(
                        f,
                        "    - {}: {}: {}",
                        violation.field, violation.kind, violation.detail
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(index: usize, field: &str, kind: ViolationKind) -> Violation {
        Violation {
            index,
            record: "User".into(),
            field: field.into(),
            kind,
            detail: "detail".into(),
        }
    }

    fn sample() -> Report {
        let mut report = Report::with_inputs(3);
        report.push_record(vec![
            violation(0, "name", ViolationKind::DefaultValueFound),
            violation(0, "age", ViolationKind::ConstraintRangeFailed),
        ]);
        report.push_record(vec![]);
        report.push_record(vec![Violation::invalid_input(2, "not a record")]);
        report
    }

    #[test]
    fn accessors() {
        let report = sample();
        assert_eq!(report.len(), 3);
        assert_eq!(report.total(), 3);
        assert!(!report.is_clean());
        assert!(report.passed(1));
        assert!(!report.passed(0));
        assert!(!report.passed(7));
        assert_eq!(report.get(0).map(<[Violation]>::len), Some(2));
        assert_eq!(report.violations().count(), 3);
    }

    #[test]
    fn into_result_returns_first_violation() {
        let err = sample().into_result().unwrap_err();
        assert_eq!(err.field, "name");
        assert!(Report::default().into_result().is_ok());
    }

    #[test]
    fn render_groups_by_input() {
        let text = sample().render();
        assert!(text.starts_with("required: 3 issue(s) in 2 of 3 input(s)"));
        assert!(text.contains("[0] User\n    - name: default value found: detail"));
        assert!(text.contains("    - age: constraint range failed: detail"));
        assert!(text.contains("[2]\n    - invalid input shape: not a record"));
        assert!(!text.contains("[1]"));
    }

    #[test]
    fn render_clean_report() {
        let mut report = Report::with_inputs(2);
        report.push_record(vec![]);
        report.push_record(vec![]);
        assert_eq!(report.render(), "required: no issues found in 2 input(s)");
    }

    #[test]
    fn json_shape() {
        let json = sample().to_json().unwrap();
        assert_eq!(json[0][0]["field"], "name");
        assert_eq!(json[0][0]["kind"], "default_value_found");
        assert_eq!(json[1].as_array().map(Vec::len), Some(0));
        assert_eq!(json[2][0]["kind"], "invalid_input_shape");

        let back: Report = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn violation_display() {
        let v = violation(0, "name", ViolationKind::DefaultValueFound);
        assert_eq!(
            v.to_string(),
            "required: User.name (input 0): default value found: detail"
        );
    }

    #[test]
    fn shape_violation_display() {
        let v = Violation::invalid_input(3, "expected a record, found unsigned integer");
        assert_eq!(
            v.to_string(),
            "required: input 3: invalid input shape: expected a record, found unsigned integer"
        );
    }

    #[test]
    fn kind_taxonomy() {
        assert!(ViolationKind::NotANumber.is_metadata_error());
        assert!(ViolationKind::InvalidInputShape.is_metadata_error());
        assert!(ViolationKind::DefaultValueFound.is_data_error());
        assert!(ViolationKind::ConstraintRangeFailed.is_data_error());
    }
}
