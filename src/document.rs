//!
//! Declarative rule documents.
//!
//! A document is a JSON list of statements, each registering rules exactly as
//! the corresponding `allow_with`/`disallow_with` call would. Conditions in a
//! document can only be shapes.
//!
//! ```json
//! {
//!   "rules": [
//!     { "effect": "allow", "model": "User", "actions": "read", "targets": "Product",
//!       "when": { "isPublic": true } },
//!     { "effect": "allow", "model": "Admin", "actions": "$manage", "targets": "$all" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::ability::{Ability, Effect, RuleOptions};
use crate::condition::Shape;
use crate::error::AbilityError;
use crate::types::{ActionList, ModelId, ScopeList, TargetList};

/// A string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleStatement {
    pub effect: Effect,
    pub model: String,
    pub actions: OneOrMany,
    pub targets: OneOrMany,
    /// Omitted means the global scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<Shape>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDocument {
    pub rules: Vec<RuleStatement>,
}

impl RuleDocument {
    pub fn from_json(json: &str) -> Result<Self, AbilityError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, AbilityError> {
        Ok(serde_json::from_value(value)?)
    }
}

impl Ability {
    /// Registers every statement of `document`, in order. Returns the number
    /// of rules appended.
    pub fn load(&mut self, document: &RuleDocument) -> usize {
        document
            .rules
            .iter()
            .map(|statement| {
                let mut options = RuleOptions::new();
                if let Some(scopes) = &statement.scopes {
                    options = options.scopes(ScopeList::from(scopes.clone().into_vec()));
                }
                if let Some(shape) = &statement.when {
                    options = options.condition(shape.clone());
                }
                self.register(
                    statement.effect,
                    ModelId::owned(statement.model.as_str()),
                    ActionList::from(statement.actions.clone().into_vec()),
                    TargetList::from(statement.targets.clone().into_vec()),
                    options,
                )
            })
            .sum()
    }
}
