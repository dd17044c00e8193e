use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::RuleBodyError;
use crate::rule::{RuleBody, RuleBodyProps};

pub fn load_rule_body(path: &Path) -> Result<RuleBody, RuleBodyError> {
    let raw = fs::read_to_string(path).map_err(|err| RuleBodyError::from_io(path, err))?;

    let props: RuleBodyProps =
        serde_json::from_str(&raw).map_err(|err| RuleBodyError::from_parse(path, err))?;

    debug!(path = %path.display(), "loaded rule body description");
    RuleBody::from_props(&props)
}
