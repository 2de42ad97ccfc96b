pub mod core;
pub mod rule;


// Re-export the primary types so `crate::ability::*` paths stay short.
pub use self::core::{Ability, AbilityOptions, InstanceOfFn, RuleOptions};
pub use rule::{Effect, Rule, RuleStore, RuleSummary};
