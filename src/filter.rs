use serde::{Deserialize, Serialize};

use crate::error::RuleBodyError;

/// Maximum number of values accepted by the string-list operations.
pub const MAX_OPERAND_VALUES: usize = 10;

/// Filtering operation together with its operand.
///
/// The operand's type is fixed by the operation that was chosen, so the two
/// are carried as one variant: a filter either has a complete
/// operation/operand pair or none at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "operand", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperation {
    /// Matches when the field equals one of the given values.
    In(Vec<String>),
    /// Matches when the field equals none of the given values.
    NotIn(Vec<String>),
    /// Matches when the field starts with one of the given prefixes.
    StartsWith(Vec<String>),
    /// Matches when the numeric field exceeds the given value.
    GreaterThan(f64),
    /// Matches when the numeric field is below the given value.
    LessThan(f64),
    /// Matches when the numeric field equals the given value.
    EqualTo(f64),
    /// Matches when the numeric field differs from the given value.
    NotEqualTo(f64),
    /// Matches on the presence (or absence) of the field.
    IsPresent(bool),
}

impl FilterOperation {
    fn operand_list(&self) -> Option<(&'static str, usize)> {
        match self {
            FilterOperation::In(values) => Some(("IN", values.len())),
            FilterOperation::NotIn(values) => Some(("NOT_IN", values.len())),
            FilterOperation::StartsWith(values) => Some(("STARTS_WITH", values.len())),
            _ => None,
        }
    }

    pub(crate) fn check_operand(&self) -> Result<(), RuleBodyError> {
        if let Some((operation, len)) = self.operand_list() {
            if len == 0 || len > MAX_OPERAND_VALUES {
                return Err(RuleBodyError::OperandCardinality { operation, len });
            }
        }
        Ok(())
    }
}

/// How to aggregate a field that occurs multiple times in one log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Statistic {
    Sum,
    Count,
    Average,
}

/// Predicate applied to one named log field.
///
/// Filters attached to a rule body are AND-combined to narrow which log
/// events count towards a contributor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Log field path the filter inspects.
    pub match_field: String,
    /// Operation/operand pair applied to the field.
    #[serde(flatten)]
    pub operation: FilterOperation,
    /// Case-insensitive matching. Only meaningful for string-list operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_case: Option<bool>,
    /// Statistic used when the field occurs more than once per entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistic: Option<Statistic>,
}

impl Filter {
    pub fn new(match_field: impl Into<String>, operation: FilterOperation) -> Self {
        Self {
            match_field: match_field.into(),
            operation,
            ignore_case: None,
            statistic: None,
        }
    }

    /// Starts a fluent builder for a filter on the given field.
    pub fn on(match_field: impl Into<String>) -> FilterBuilder {
        FilterBuilder::new(match_field)
    }
}

/// Fluent construction of a [`Filter`].
///
/// Exactly one operation-selection call is required before [`build`] will
/// produce a filter; the string-list selections enforce the operand bounds
/// at the call site.
///
/// [`build`]: FilterBuilder::build
#[derive(Debug, Clone)]
pub struct FilterBuilder {
    match_field: String,
    operation: Option<FilterOperation>,
    ignore_case: Option<bool>,
    statistic: Option<Statistic>,
}

impl FilterBuilder {
    pub fn new(match_field: impl Into<String>) -> Self {
        Self {
            match_field: match_field.into(),
            operation: None,
            ignore_case: None,
            statistic: None,
        }
    }

    fn operation(mut self, operation: FilterOperation) -> Result<Self, RuleBodyError> {
        operation.check_operand()?;
        self.operation = Some(operation);
        Ok(self)
    }

    /// Matches entries whose field equals one of `values` (1 to 10 entries).
    pub fn is_in<I, S>(self, values: I) -> Result<Self, RuleBodyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operation(FilterOperation::In(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    /// Matches entries whose field equals none of `values` (1 to 10 entries).
    pub fn not_in<I, S>(self, values: I) -> Result<Self, RuleBodyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operation(FilterOperation::NotIn(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    /// Matches entries whose field starts with one of `values` (1 to 10 entries).
    pub fn starts_with<I, S>(self, values: I) -> Result<Self, RuleBodyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operation(FilterOperation::StartsWith(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn greater_than(mut self, value: f64) -> Self {
        self.operation = Some(FilterOperation::GreaterThan(value));
        self
    }

    pub fn less_than(mut self, value: f64) -> Self {
        self.operation = Some(FilterOperation::LessThan(value));
        self
    }

    pub fn equal_to(mut self, value: f64) -> Self {
        self.operation = Some(FilterOperation::EqualTo(value));
        self
    }

    pub fn not_equal_to(mut self, value: f64) -> Self {
        self.operation = Some(FilterOperation::NotEqualTo(value));
        self
    }

    pub fn is_present(mut self, present: bool) -> Self {
        self.operation = Some(FilterOperation::IsPresent(present));
        self
    }

    /// Requests case-insensitive matching. Settable independent of the operation.
    pub fn ignore_case(mut self, ignore: bool) -> Self {
        self.ignore_case = Some(ignore);
        self
    }

    /// Sets the per-entry statistic. Settable independent of the operation.
    pub fn statistic(mut self, statistic: Statistic) -> Self {
        self.statistic = Some(statistic);
        self
    }

    /// Finalizes the filter. Fails if no operation was selected.
    pub fn build(self) -> Result<Filter, RuleBodyError> {
        let operation = self
            .operation
            .ok_or(RuleBodyError::IncompleteFilter {
                match_field: self.match_field.clone(),
            })?;

        Ok(Filter {
            match_field: self.match_field,
            operation,
            ignore_case: self.ignore_case,
            statistic: self.statistic,
        })
    }
}
