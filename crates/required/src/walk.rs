//! Field-by-field traversal of a record.

use crate::config::Config;
use crate::constraint::{Bounds, Constraint};
use crate::evaluate::{value_in_range, value_is_default};
use crate::inspect::Value;
use crate::record::Record;
use crate::report::{Violation, ViolationKind};
use std::ops::ControlFlow;

/// State shared by every field of one input.
pub(crate) struct Walk<'c> {
    pub config: &'c Config,
    pub index: usize,
    /// Type name of the top-level record; nested violations report it too.
    pub record: &'static str,
}

impl Walk<'_> {
    fn violation(&self, field: String, kind: ViolationKind, detail: String) -> Violation {
        trace_debug!(index = self.index, record = self.record, field = %field, %kind, "violation");
        Violation {
            index: self.index,
            record: self.record.to_string(),
            field,
            kind,
            detail,
        }
    }

    /// Visit every violation of `record` in declaration order.
    ///
    /// Stops as soon as `visit` breaks. A field stops being evaluated at its
    /// first violation; its siblings are still visited.
    pub fn run<F>(&self, record: &dyn Record, visit: &mut F) -> ControlFlow<()>
    where
        F: FnMut(Violation) -> ControlFlow<()>,
    {
        self.walk_fields(record, "", 0, visit)
    }

    fn walk_fields<F>(
        &self,
        record: &dyn Record,
        prefix: &str,
        depth: usize,
        visit: &mut F,
    ) -> ControlFlow<()>
    where
        F: FnMut(Violation) -> ControlFlow<()>,
    {
        let depth_left = self.config.max_depth.saturating_sub(depth);

        for field in record.fields().iter() {
            let Some(metadata) = field.metadata else {
                continue;
            };
            let path = if prefix.is_empty() {
                field.name.to_string()
            } else {
                format!("{prefix}.{}", field.name)
            };
            let value = field.value.inspect();
            trace_trace!(record = self.record, field = %path, kind = %value.kind(), "evaluating field");

            if value_is_default(value, depth_left) {
                let detail = format!("{} field holds its default value", value.kind());
                visit(self.violation(path, ViolationKind::DefaultValueFound, detail))?;
                continue;
            }

            // Presence-only metadata carries no options to parse.
            let bounds = if metadata.has_range_options() {
                match Constraint::from_metadata(&metadata, self.config.zero_bound) {
                    Ok(constraint) => constraint.bounds,
                    Err(err) => {
                        let kind = ViolationKind::from(&err);
                        visit(self.violation(path, kind, err.to_string()))?;
                        continue;
                    }
                }
            } else {
                Bounds::UNBOUNDED
            };

            if let Err(range) = value_in_range(value, bounds) {
                visit(self.violation(path, ViolationKind::ConstraintRangeFailed, range.to_string()))?;
                continue;
            }

            if let Some(nested) = nested_record(value) {
                if depth >= self.config.max_depth {
                    trace_warn!(
                        record = self.record,
                        field = %path,
                        max_depth = self.config.max_depth,
                        "nesting limit reached, nested record not validated"
                    );
                    continue;
                }
                self.walk_fields(nested, &path, depth + 1, visit)?;
            }
        }

        ControlFlow::Continue(())
    }
}

/// The record behind `value`, looking through present optionals.
pub(crate) fn nested_record(value: Value<'_>) -> Option<&dyn Record> {
    match value {
        Value::Record(record) => Some(record),
        Value::Optional(Some(inner)) => nested_record(inner.inspect()),
        _ => None,
    }
}
