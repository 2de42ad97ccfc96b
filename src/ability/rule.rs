//!
//! Rule representation and the grant/deny rule store.

use crate::condition::Condition;
use crate::types::{ModelId, RuleAction, RuleTarget, Scope};

/// Whether a rule grants or revokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

/// One entry of a rule list.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Model the performer must satisfy.
    pub model: ModelId,
    pub action: RuleAction,
    pub target: RuleTarget,
    pub scope: Scope,
    /// `None` means the rule always holds once the tags match.
    pub condition: Option<Condition>,
}

impl Rule {
    pub fn summary(&self, effect: Effect) -> RuleSummary {
        RuleSummary {
            effect,
            model: self.model.to_string(),
            action: self.action.to_string(),
            target: self.target.to_string(),
            scope: self.scope.to_string(),
            conditional: self.condition.is_some(),
        }
    }
}

/// Serializable description of a registered rule, for inspection and logs.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RuleSummary {
    pub effect: Effect,
    pub model: String,
    pub action: String,
    pub target: String,
    pub scope: String,
    pub conditional: bool,
}

/// The two append-only rule lists, in registration order.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    /// Grants.
    pub abilities: Vec<Rule>,
    /// Revocations.
    pub inabilities: Vec<Rule>,
}

impl RuleStore {
    pub fn list(&self, effect: Effect) -> &[Rule] {
        match effect {
            Effect::Allow => &self.abilities,
            Effect::Deny => &self.inabilities,
        }
    }

    pub fn push(&mut self, effect: Effect, rule: Rule) {
        match effect {
            Effect::Allow => self.abilities.push(rule),
            Effect::Deny => self.inabilities.push(rule),
        }
    }

    pub fn len(&self) -> usize {
        self.abilities.len() + self.inabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty() && self.inabilities.is_empty()
    }

    /// Summaries of every rule, grants first.
    pub fn summaries(&self) -> Vec<RuleSummary> {
        self.abilities
            .iter()
            .map(|r| r.summary(Effect::Allow))
            .chain(self.inabilities.iter().map(|r| r.summary(Effect::Deny)))
            .collect()
    }
}
