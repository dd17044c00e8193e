//! Fixed capitalized-key wire shape consumed by the monitoring control plane.
//!
//! Every description field is mapped to its wire name explicitly; nothing is
//! derived from a generic casing transform.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::filter::{Filter, FilterOperation, Statistic};
use crate::rule::{Aggregation, LogFormat, RuleBodyProps};

/// Schema name recognized for version-1 log rule bodies.
pub const SCHEMA_NAME: &str = "CloudWatchLogRule";
/// Schema version recognized for version-1 log rule bodies.
pub const SCHEMA_VERSION: u32 = 1;

/// `Schema` object identifying the body layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaId {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Version")]
    pub version: u32,
}

/// Complete version-1 log rule body in wire form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRuleSchema {
    #[serde(rename = "Schema")]
    pub schema: SchemaId,
    #[serde(rename = "LogGroupNames")]
    pub log_group_names: Vec<String>,
    #[serde(rename = "LogFormat")]
    pub log_format: LogFormat,
    #[serde(rename = "Fields", skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
    #[serde(rename = "Contribution")]
    pub contribution: ContributionSchema,
    #[serde(rename = "AggregateOn")]
    pub aggregate_on: Aggregation,
}

/// `Contribution` object describing how contributors are classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionSchema {
    #[serde(rename = "Keys")]
    pub keys: Vec<String>,
    #[serde(rename = "ValueOf", skip_serializing_if = "Option::is_none")]
    pub value_of: Option<String>,
    /// Always present on the wire, possibly empty.
    #[serde(rename = "Filters")]
    pub filters: Vec<FilterSchema>,
}

/// One filter in wire form: the match target plus a single operation key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSchema {
    #[serde(rename = "Match")]
    pub match_field: String,
    #[serde(flatten)]
    pub operation: OperationSchema,
    #[serde(rename = "IgnoreCase", skip_serializing_if = "Option::is_none")]
    pub ignore_case: Option<bool>,
    #[serde(rename = "Statistic", skip_serializing_if = "Option::is_none")]
    pub statistic: Option<Statistic>,
}

/// Wire key/operand pair for a filter operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OperationSchema {
    In(Vec<String>),
    NotIn(Vec<String>),
    StartsWith(Vec<String>),
    GreaterThan(f64),
    LessThan(f64),
    EqualTo(f64),
    NotEqualTo(f64),
    IsPresent(bool),
}

impl From<&FilterOperation> for OperationSchema {
    fn from(operation: &FilterOperation) -> Self {
        match operation {
            FilterOperation::In(values) => OperationSchema::In(values.clone()),
            FilterOperation::NotIn(values) => OperationSchema::NotIn(values.clone()),
            FilterOperation::StartsWith(values) => OperationSchema::StartsWith(values.clone()),
            FilterOperation::GreaterThan(value) => OperationSchema::GreaterThan(*value),
            FilterOperation::LessThan(value) => OperationSchema::LessThan(*value),
            FilterOperation::EqualTo(value) => OperationSchema::EqualTo(*value),
            FilterOperation::NotEqualTo(value) => OperationSchema::NotEqualTo(*value),
            FilterOperation::IsPresent(present) => OperationSchema::IsPresent(*present),
        }
    }
}

impl From<&Filter> for FilterSchema {
    fn from(filter: &Filter) -> Self {
        Self {
            match_field: filter.match_field.clone(),
            operation: OperationSchema::from(&filter.operation),
            ignore_case: filter.ignore_case,
            statistic: filter.statistic,
        }
    }
}

impl LogRuleSchema {
    /// Maps a fully-defaulted description onto the wire shape.
    pub(crate) fn from_resolved(props: &RuleBodyProps) -> Self {
        Self {
            schema: SchemaId {
                name: props
                    .schema_name
                    .clone()
                    .unwrap_or_else(|| SCHEMA_NAME.to_owned()),
                version: props.schema_version.unwrap_or(SCHEMA_VERSION),
            },
            log_group_names: props.log_sources.clone(),
            log_format: props.log_format.unwrap_or(LogFormat::Json),
            fields: props.field_aliases.clone(),
            contribution: ContributionSchema {
                keys: props.contribution_keys.clone(),
                value_of: props.value_field.clone(),
                filters: props
                    .contribution_filters
                    .as_deref()
                    .unwrap_or(&[])
                    .iter()
                    .map(FilterSchema::from)
                    .collect(),
            },
            aggregate_on: props.aggregation.unwrap_or(Aggregation::Count),
        }
    }
}
