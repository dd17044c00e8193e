use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RuleBodyError;
use crate::filter::Filter;
use crate::loader;
use crate::schema::{LogRuleSchema, SCHEMA_NAME, SCHEMA_VERSION};

/// Maximum number of fields a rule may classify contributors by.
pub const MAX_CONTRIBUTION_KEYS: usize = 4;
/// Maximum number of filters a rule may narrow log events with.
pub const MAX_CONTRIBUTION_FILTERS: usize = 4;

/// Format of the log entries read by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogFormat {
    Json,
    Clf,
}

/// How contributors are ranked against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Aggregation {
    /// Rank by the number of matching log events.
    Count,
    /// Rank by the sum of the value field across matching events.
    Sum,
}

/// Caller-facing description of a version-1 log rule body.
///
/// Optional fields left unset are filled by [`with_defaults`] before
/// validation; the description itself is never mutated.
///
/// [`with_defaults`]: RuleBodyProps::with_defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBodyProps {
    /// Body schema name. Filled with the recognized constant when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    /// Body schema version. Filled with the recognized constant when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    /// Identifiers of the log groups the rule reads.
    pub log_sources: Vec<String>,
    /// Log entry format. Inferred from `field_aliases` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_format: Option<LogFormat>,
    /// Field-index to alias mapping. Only meaningful for CLF logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_aliases: Option<BTreeMap<String, String>>,
    /// Fields used to classify contributors, at most four.
    #[serde(default)]
    pub contribution_keys: Vec<String>,
    /// Field contributors are summed over. Only meaningful for `Sum` aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_field: Option<String>,
    /// AND-combined predicates narrowing the included log events, at most four.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution_filters: Option<Vec<Filter>>,
    /// Contributor ranking mode. Inferred from `value_field` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
}

impl RuleBodyProps {
    pub fn new<I, S>(log_sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            log_sources: log_sources.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Returns a copy of the description with every inferable field filled.
    ///
    /// Idempotent: a description that already carries explicit values is
    /// returned unchanged.
    pub fn with_defaults(&self) -> RuleBodyProps {
        let log_format = self.log_format.unwrap_or(match &self.field_aliases {
            Some(aliases) if !aliases.is_empty() => LogFormat::Clf,
            _ => LogFormat::Json,
        });

        let aggregation = self.aggregation.unwrap_or(if self.value_field.is_some() {
            Aggregation::Sum
        } else {
            Aggregation::Count
        });

        RuleBodyProps {
            schema_name: Some(
                self.schema_name
                    .clone()
                    .unwrap_or_else(|| SCHEMA_NAME.to_owned()),
            ),
            schema_version: Some(self.schema_version.unwrap_or(SCHEMA_VERSION)),
            log_format: Some(log_format),
            contribution_filters: Some(self.contribution_filters.clone().unwrap_or_default()),
            aggregation: Some(aggregation),
            ..self.clone()
        }
    }

    /// Checks the description against the fixed version-1 log schema.
    pub fn validate(&self) -> Result<(), RuleBodyError> {
        if let Some(name) = &self.schema_name {
            if name != SCHEMA_NAME {
                return Err(RuleBodyError::schema_validation(format!(
                    "unrecognized schema name {name:?}, expected {SCHEMA_NAME:?}"
                )));
            }
        }

        if let Some(version) = self.schema_version {
            if version != SCHEMA_VERSION {
                return Err(RuleBodyError::schema_validation(format!(
                    "unrecognized schema version {version}, expected {SCHEMA_VERSION}"
                )));
            }
        }

        if self.contribution_keys.len() > MAX_CONTRIBUTION_KEYS {
            return Err(RuleBodyError::schema_validation(format!(
                "too many contribution keys: {} (max {MAX_CONTRIBUTION_KEYS})",
                self.contribution_keys.len()
            )));
        }

        if let Some(filters) = &self.contribution_filters {
            if filters.len() > MAX_CONTRIBUTION_FILTERS {
                return Err(RuleBodyError::schema_validation(format!(
                    "too many contribution filters: {} (max {MAX_CONTRIBUTION_FILTERS})",
                    filters.len()
                )));
            }
        }

        Ok(())
    }
}

/// A built rule body, ready to be rendered to its JSON wire string.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleBody {
    /// Version-1 log rule built from a validated description.
    Log(LogRuleSchema),
    /// Caller-supplied structure rendered without defaulting or validation.
    Custom(serde_json::Value),
    /// Caller-supplied string emitted byte-for-byte.
    Raw(String),
}

impl RuleBody {
    /// Builds a version-1 log rule body: fills defaults, validates, and
    /// prepares the wire representation.
    pub fn from_props(props: &RuleBodyProps) -> Result<Self, RuleBodyError> {
        let resolved = props.with_defaults();
        resolved.validate()?;

        debug!(
            log_sources = resolved.log_sources.len(),
            aggregation = ?resolved.aggregation,
            "rule body validated"
        );

        Ok(RuleBody::Log(LogRuleSchema::from_resolved(&resolved)))
    }

    /// Loads a JSON description from disk and builds it like [`from_props`].
    ///
    /// [`from_props`]: RuleBody::from_props
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RuleBodyError> {
        loader::load_rule_body(path.as_ref())
    }

    /// Wraps an already-built JSON structure. The downstream control plane
    /// accepts schema versions this crate does not model, so the value is
    /// rendered exactly as supplied.
    pub fn custom(value: serde_json::Value) -> Self {
        RuleBody::Custom(value)
    }

    /// Wraps a raw rule body string, emitted without re-serialization.
    pub fn custom_str(value: impl Into<String>) -> Self {
        RuleBody::Raw(value.into())
    }

    /// Serializes the body to the JSON string handed to the control plane.
    pub fn render(&self) -> Result<String, RuleBodyError> {
        match self {
            RuleBody::Log(schema) => Ok(serde_json::to_string(schema)?),
            RuleBody::Custom(value) => Ok(serde_json::to_string(value)?),
            RuleBody::Raw(raw) => Ok(raw.clone()),
        }
    }
}
