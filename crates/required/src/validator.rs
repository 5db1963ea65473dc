//! Run modes: fail-fast and collect-all.

use crate::config::Config;
use crate::constraint::ZeroBound;
use crate::inspect::{Inspect, Value};
use crate::record::Record;
use crate::report::{Report, Violation};
use crate::walk::Walk;
use std::ops::ControlFlow;

/// Validates records against their field metadata.
///
/// A validator holds only its [`Config`]; it keeps no state between calls
/// and can be shared freely across threads.
///
/// ```rust,ignore
/// use required::{inputs, Record, Validator};
///
/// #[derive(Record)]
/// struct Signup {
///     #[required("yes, min=3, max=32")]
///     username: String,
///     #[required(min = 18)]
///     age: u8,
/// }
///
/// let signup = Signup { username: "ab".into(), age: 30 };
/// let validator = Validator::default();
///
/// assert!(validator.fail_fast(inputs![signup]).is_err());
/// println!("{}", validator.collect_all(inputs![signup]));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Validator {
    config: Config,
}

impl Validator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate `inputs` in order and stop at the first violation.
    ///
    /// Returns `Ok(())` when every input is a record and passes. Inputs after
    /// the failing one are never looked at.
    pub fn fail_fast(&self, inputs: &[&dyn Inspect]) -> Result<(), Violation> {
        for (index, input) in inputs.iter().enumerate() {
            let record = as_record(index, input.inspect())?;
            let walk = self.walk(index, record);

            let mut first = None;
            let _ = walk.run(record, &mut |violation: Violation| {
                first = Some(violation);
                ControlFlow::Break(())
            });

            if let Some(violation) = first {
                trace_debug!(
                    index,
                    record = walk.record,
                    field = %violation.field,
                    kind = %violation.kind,
                    "fail-fast validation stopped"
                );
                return Err(violation);
            }
        }

        trace_debug!(inputs = inputs.len(), "fail-fast validation passed");
        Ok(())
    }

    /// Validate every field of every input and report all violations.
    ///
    /// An input that is not a record gets a single shape violation; the
    /// remaining inputs are still validated.
    pub fn collect_all(&self, inputs: &[&dyn Inspect]) -> Report {
        let mut report = Report::with_inputs(inputs.len());

        for (index, input) in inputs.iter().enumerate() {
            let record = match as_record(index, input.inspect()) {
                Ok(record) => record,
                Err(violation) => {
                    report.push_record(vec![violation]);
                    continue;
                }
            };

            let mut violations = Vec::new();
            let _ = self.walk(index, record).run(record, &mut |violation: Violation| {
                violations.push(violation);
                ControlFlow::Continue(())
            });
            report.push_record(violations);
        }

        trace_debug!(
            inputs = report.len(),
            violations = report.total(),
            "collect-all validation finished"
        );
        report
    }

    /// Fail-fast validation of a single typed record.
    pub fn check<R: Record>(&self, record: &R) -> Result<(), Violation> {
        let mut first = None;
        let _ = self.walk(0, record).run(record, &mut |violation: Violation| {
            first = Some(violation);
            ControlFlow::Break(())
        });
        first.map_or(Ok(()), Err)
    }

    /// Collect-all validation of a single typed record.
    pub fn diagnose<R: Record>(&self, record: &R) -> Vec<Violation> {
        let mut violations = Vec::new();
        let _ = self.walk(0, record).run(record, &mut |violation: Violation| {
            violations.push(violation);
            ControlFlow::Continue(())
        });
        violations
    }

    fn walk(&self, index: usize, record: &dyn Record) -> Walk<'_> {
        Walk {
            config: &self.config,
            index,
            record: record.type_name(),
        }
    }
}

impl From<Config> for Validator {
    fn from(config: Config) -> Self {
        Self::new(config)
    }
}

/// Builder for a [`Validator`].
#[derive(Debug, Clone, Default)]
pub struct ValidatorBuilder {
    config: Config,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how declared zero bounds are read.
    pub fn zero_bound(mut self, zero_bound: ZeroBound) -> Self {
        self.config.zero_bound = zero_bound;
        self
    }

    /// Set how many levels of nested records are followed.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Start from an existing configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Validator {
        Validator::new(self.config)
    }
}

/// Fail-fast validation with the default configuration.
pub fn validate_fail_fast(inputs: &[&dyn Inspect]) -> Result<(), Violation> {
    Validator::default().fail_fast(inputs)
}

/// Collect-all validation with the default configuration.
pub fn validate_collect_all(inputs: &[&dyn Inspect]) -> Report {
    Validator::default().collect_all(inputs)
}

/// Resolve an input to the record it refers to.
fn as_record(index: usize, value: Value<'_>) -> Result<&dyn Record, Violation> {
    match value {
        Value::Record(record) => Ok(record),
        Value::Optional(Some(inner)) => as_record(index, inner.inspect()),
        Value::Optional(None) => Err(Violation::invalid_input(
            index,
            "expected a record, found an absent value",
        )),
        other => Err(Violation::invalid_input(
            index,
            format!("expected a record, found {}", other.kind()),
        )),
    }
}
