#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! Ability-Core is an in-process authorization rule engine.
//!
//! Hosts register allow and deny rules on an [`Ability`] registry and then ask
//! whether a performer may perform an action on a target. Rules name the
//! performer's model, an action (or the `$manage` wildcard), a target model
//! (or the `$all` wildcard), a scope and an optional [`Condition`].
//!
//! Precedence when checking:
//! * a matching deny rule cancels every matching grant,
//! * except a matching `$manage` grant, which always wins,
//! * rules targeting `$all` ignore the scope of the check.

// Tags: model identifiers, actions, targets, scopes and reserved wildcards.
pub mod types;

// The view the engine has of host domain objects.
pub mod subject;

// Condition algebra and shape matching.
pub mod condition;

// Rule store and the ability registry.
pub mod ability;

// Declarative rule documents.
pub mod document;

pub mod error;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use ability::{Ability, AbilityOptions, Effect, RuleOptions, RuleSummary};
pub use condition::{and, not, or, Condition, Shape};
pub use document::{RuleDocument, RuleStatement};
pub use error::AbilityError;
pub use subject::{Field, Subject, Target};
pub use types::{ModelId, RuleAction, RuleTarget, Scope, ALL_TARGETS, GLOBAL_SCOPE, MANAGE_ACTIONS};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::{json, Value};
}
