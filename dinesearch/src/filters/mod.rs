//! In-memory execution of filter descriptors.
//!
//! Evaluates the same [`FilterCondition`] tree the builder renders for a hosted
//! backend, against any record implementing [`Filterable`].

pub mod restaurant;

pub use restaurant::*;

use log::debug;

use crate::search::{FieldMap, FilterCondition, FilterDescriptor};

/// Column access for records that can be filtered in memory.
pub trait Filterable {
    /// Text column value, or `None` when the record has no such column.
    fn text_field(&self, field: &str) -> Option<&str>;

    /// Boolean column value. Missing flags are treated as `false`.
    fn flag_field(&self, field: &str) -> Option<bool>;

    /// Numeric column value. Missing numbers fail every comparison.
    fn numeric_field(&self, field: &str) -> Option<f64>;
}

impl FilterCondition {
    /// Evaluate against a record. Empty `And`/`Or` groups match everything.
    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        match self {
            Self::TextContains { field, value } => record
                .text_field(field)
                .is_some_and(|text| text.to_lowercase().contains(&value.to_lowercase())),
            Self::BooleanEquals { field, value } => record.flag_field(field).unwrap_or(false) == *value,
            Self::NumericEquals { field, value } => record.numeric_field(field).is_some_and(|number| number == *value),
            Self::NumericAtLeast { field, min } => record.numeric_field(field).is_some_and(|number| number >= *min),
            Self::And(conditions) => conditions.iter().all(|condition| condition.matches(record)),
            Self::Or(conditions) => conditions.is_empty() || conditions.iter().any(|condition| condition.matches(record)),
        }
    }
}

/// Records matching the descriptor, in input order.
pub fn apply<'a, R: Filterable>(records: &'a [R], descriptor: &FilterDescriptor, fields: &FieldMap) -> Vec<&'a R> {
    let condition = descriptor.to_condition(fields);
    let matched: Vec<&R> = records.iter().filter(|record| condition.matches(*record)).collect();
    debug!("in-memory filter kept {} of {} records", matched.len(), records.len());
    matched
}
