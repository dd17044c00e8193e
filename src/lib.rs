//! Rule-body construction for contributor-insights monitoring rules.
//!
//! This crate builds the JSON rule bodies consumed by the cloud monitoring
//! control plane: a typed description of a rule (log sources, grouping keys,
//! filters, aggregation mode) is filled with inferred defaults, validated
//! against the fixed version-1 log schema, and serialized into its
//! capitalized-key wire form. Filters are composed directly or through a
//! fluent builder, and descriptions can also be loaded from JSON files or
//! passed through untouched for schema versions this crate does not model.

mod error;
mod filter;
mod loader;
mod rule;
mod schema;

pub use error::RuleBodyError;
pub use filter::{Filter, FilterBuilder, FilterOperation, Statistic, MAX_OPERAND_VALUES};
pub use rule::{
    Aggregation, LogFormat, RuleBody, RuleBodyProps, MAX_CONTRIBUTION_FILTERS,
    MAX_CONTRIBUTION_KEYS,
};
pub use schema::{
    ContributionSchema, FilterSchema, LogRuleSchema, OperationSchema, SchemaId, SCHEMA_NAME,
    SCHEMA_VERSION,
};
