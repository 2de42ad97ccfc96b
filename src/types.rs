//!
//! Tags shared across the crate: model identifiers, rule actions, rule targets
//! and scopes, together with the reserved wildcard strings.

use std::borrow::Cow;
use std::fmt;

/// Reserved target tag matching every target and bypassing scope checks.
pub const ALL_TARGETS: &str = "$all";
/// Reserved action tag granting (or revoking) every action.
pub const MANAGE_ACTIONS: &str = "$manage";
/// Reserved scope tag used when no scope is supplied.
pub const GLOBAL_SCOPE: &str = "$global";

/// Identifier of a subject type (a "model").
///
/// This is a registered type-descriptor handle rather than a runtime type:
/// host applications declare one per domain type, usually as a constant.
///
/// ```
/// use ability_core::ModelId;
///
/// const USER: ModelId = ModelId::new("User");
/// assert_eq!(USER.as_str(), "User");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ModelId(Cow<'static, str>);

impl ModelId {
    /// Creates a model identifier from a static name. Usable in `const` context.
    pub const fn new(name: &'static str) -> Self {
        ModelId(Cow::Borrowed(name))
    }

    /// Creates a model identifier from an owned name, e.g. one read from a rule document.
    pub fn owned(name: impl Into<String>) -> Self {
        ModelId(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The action half of a rule: a concrete action or the `$manage` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleAction {
    /// Matches every action.
    Manage,
    Named(String),
}

impl RuleAction {
    pub fn is_manage(&self) -> bool {
        matches!(self, RuleAction::Manage)
    }

    /// Whether this rule action covers the concrete action being checked.
    pub fn covers(&self, action: &str) -> bool {
        match self {
            RuleAction::Manage => true,
            RuleAction::Named(name) => name == action,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RuleAction::Manage => MANAGE_ACTIONS,
            RuleAction::Named(name) => name,
        }
    }
}

impl From<&str> for RuleAction {
    fn from(value: &str) -> Self {
        if value == MANAGE_ACTIONS {
            RuleAction::Manage
        } else {
            RuleAction::Named(value.to_owned())
        }
    }
}

impl From<String> for RuleAction {
    fn from(value: String) -> Self {
        if value == MANAGE_ACTIONS {
            RuleAction::Manage
        } else {
            RuleAction::Named(value)
        }
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The target half of a rule: a model identifier or the `$all` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleTarget {
    /// Matches every target, whatever the scope of the check.
    All,
    Model(ModelId),
}

impl RuleTarget {
    pub fn is_all(&self) -> bool {
        matches!(self, RuleTarget::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RuleTarget::All => ALL_TARGETS,
            RuleTarget::Model(model) => model.as_str(),
        }
    }
}

impl From<ModelId> for RuleTarget {
    fn from(model: ModelId) -> Self {
        RuleTarget::Model(model)
    }
}

impl From<&ModelId> for RuleTarget {
    fn from(model: &ModelId) -> Self {
        RuleTarget::Model(model.clone())
    }
}

/// Only the `$all` wildcard is accepted as a bare string; anything else is
/// treated as a model name.
impl From<&'static str> for RuleTarget {
    fn from(value: &'static str) -> Self {
        if value == ALL_TARGETS {
            RuleTarget::All
        } else {
            RuleTarget::Model(ModelId::new(value))
        }
    }
}

impl From<String> for RuleTarget {
    fn from(value: String) -> Self {
        if value == ALL_TARGETS {
            RuleTarget::All
        } else {
            RuleTarget::Model(ModelId::owned(value))
        }
    }
}

impl fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A namespace partitioning rules (a tenant, a context...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    pub fn new(name: impl Into<String>) -> Self {
        Scope(name.into())
    }

    /// The scope used when a registration or a check does not name one.
    pub fn global() -> Self {
        Scope(GLOBAL_SCOPE.to_owned())
    }

    pub fn is_global(&self) -> bool {
        self.0 == GLOBAL_SCOPE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::global()
    }
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        Scope::new(value)
    }
}

impl From<String> for Scope {
    fn from(value: String) -> Self {
        Scope(value)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Implements the "one value or a list of values" conversions for a list newtype.
macro_rules! one_or_many {
    ($list:ident, $item:ty, [$($single:ty),*]) => {
        impl From<$item> for $list {
            fn from(value: $item) -> Self {
                $list(vec![value])
            }
        }

        $(
            impl From<$single> for $list {
                fn from(value: $single) -> Self {
                    $list(vec![<$item>::from(value)])
                }
            }

            impl From<Vec<$single>> for $list {
                fn from(values: Vec<$single>) -> Self {
                    $list(values.into_iter().map(<$item>::from).collect())
                }
            }

            impl<const N: usize> From<[$single; N]> for $list {
                fn from(values: [$single; N]) -> Self {
                    $list(values.into_iter().map(<$item>::from).collect())
                }
            }
        )*

        impl From<Vec<$item>> for $list {
            fn from(values: Vec<$item>) -> Self {
                $list(values)
            }
        }

        impl<const N: usize> From<[$item; N]> for $list {
            fn from(values: [$item; N]) -> Self {
                $list(values.into_iter().collect())
            }
        }

        impl $list {
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }
    };
}

/// One action or several, as accepted by registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionList(pub Vec<RuleAction>);

/// One target or several, as accepted by registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetList(pub Vec<RuleTarget>);

/// One scope or several, as accepted by registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeList(pub Vec<Scope>);

one_or_many!(ActionList, RuleAction, [&str, String]);
one_or_many!(TargetList, RuleTarget, [ModelId, &'static str, String]);
one_or_many!(ScopeList, Scope, [&str, String]);

impl Default for ScopeList {
    fn default() -> Self {
        ScopeList(vec![Scope::global()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_tags_parse_to_wildcards() {
        assert_eq!(RuleAction::from("$manage"), RuleAction::Manage);
        assert_eq!(RuleAction::from("read"), RuleAction::Named("read".into()));
        assert_eq!(RuleTarget::from("$all"), RuleTarget::All);
        assert!(Scope::default().is_global());
    }

    #[test]
    fn test_manage_covers_every_action() {
        assert!(RuleAction::Manage.covers("anything"));
        assert!(RuleAction::from("read").covers("read"));
        assert!(!RuleAction::from("read").covers("update"));
    }

    #[test]
    fn test_one_or_many_conversions() {
        const USER: ModelId = ModelId::new("User");
        assert_eq!(ActionList::from("read").len(), 1);
        assert_eq!(ActionList::from(["update", "delete"]).len(), 2);
        assert_eq!(TargetList::from(USER).0, vec![RuleTarget::Model(ModelId::new("User"))]);
        assert_eq!(ScopeList::default().0, vec![Scope::global()]);
        assert!(ScopeList::from(Vec::<&str>::new()).is_empty());
    }
}
