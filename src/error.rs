//!
//! Defines error types for the ability engine.

use crate::types::{ModelId, RuleAction};

/// Errors surfaced by registration helpers and by permission checks.
///
/// None of these is a policy outcome: a check that fails with an error has
/// neither allowed nor denied the action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbilityError {
    /// A matching rule carries a condition but the check was made against a
    /// type identifier, which has no field data to evaluate it on.
    #[error("rule `{action}` on `{model}` has a condition but the target is a type identifier, not an instance")]
    UnevaluableCondition { model: ModelId, action: RuleAction },
    /// A shape was built from something other than a JSON object.
    #[error("invalid shape: {0}")]
    InvalidShape(String),
    /// A rule document could not be parsed.
    #[error("invalid rule document: {0}")]
    Document(String),
}

impl From<serde_json::Error> for AbilityError {
    fn from(err: serde_json::Error) -> Self {
        AbilityError::Document(err.to_string())
    }
}
