//!
//! The ability registry: rule registration and the matching pipeline.

use std::fmt;
use std::sync::Arc;

use crate::ability::rule::{Effect, Rule, RuleStore, RuleSummary};
use crate::condition::Condition;
use crate::error::AbilityError;
use crate::subject::{direct_instance_of, Subject, Target};
use crate::types::{ActionList, ModelId, RuleTarget, Scope, ScopeList, TargetList};

/// Decides whether a candidate (a performer or a target) satisfies a model.
pub type InstanceOfFn = dyn Fn(&Target<'_>, &ModelId) -> bool + Send + Sync;

/// Construction options for an [`Ability`].
#[derive(Clone)]
pub struct AbilityOptions {
    /// The host's subject taxonomy. Defaults to [`direct_instance_of`].
    pub instance_of: Arc<InstanceOfFn>,
}

impl AbilityOptions {
    /// Replaces the instance check, e.g. to let an `Admin` satisfy `User`.
    pub fn instance_of<F>(mut self, instance_of: F) -> Self
    where
        F: Fn(&Target<'_>, &ModelId) -> bool + Send + Sync + 'static,
    {
        self.instance_of = Arc::new(instance_of);
        self
    }
}

impl Default for AbilityOptions {
    fn default() -> Self {
        AbilityOptions {
            instance_of: Arc::new(direct_instance_of),
        }
    }
}

impl fmt::Debug for AbilityOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbilityOptions").finish_non_exhaustive()
    }
}

/// Scopes and condition for a registration.
///
/// Scope and condition travel in separate, named fields: a registration
/// never has to guess which of the two it was handed.
#[derive(Debug, Clone, Default)]
pub struct RuleOptions {
    /// Defaults to the global scope.
    pub scopes: ScopeList,
    pub condition: Option<Condition>,
}

impl RuleOptions {
    pub fn new() -> Self {
        RuleOptions::default()
    }

    pub fn scopes(mut self, scopes: impl Into<ScopeList>) -> Self {
        self.scopes = scopes.into();
        self
    }

    pub fn condition(mut self, condition: impl Into<Condition>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

impl From<Condition> for RuleOptions {
    fn from(condition: Condition) -> Self {
        RuleOptions::new().condition(condition)
    }
}

/// A registry of allow and deny rules answering "can this performer do this
/// action to this target".
///
/// Rules are registered during setup through `&mut self` and checked through
/// `&self`. `Ability` is `Send + Sync`; a host sharing one registry between
/// threads wraps it in a readers-writer lock.
///
/// ```
/// use ability_core::{Ability, Condition, ModelId, Subject};
///
/// const USER: ModelId = ModelId::new("User");
///
/// #[derive(Debug)]
/// struct User { name: String }
///
/// impl Subject for User {
///     fn model(&self) -> ModelId { USER }
/// }
///
/// let mut ability = Ability::new();
/// ability.allow(USER, "read", USER);
/// ability.allow_if(USER, ["update", "delete"], USER,
///     Condition::new(|p: &User, t: &User| p.name == t.name));
///
/// let a = User { name: "A".into() };
/// let b = User { name: "B".into() };
/// assert!(ability.can(&a, "update", &a).unwrap());
/// assert!(!ability.can(&a, "update", &b).unwrap());
/// assert!(ability.can(&a, "read", &b).unwrap());
/// ```
pub struct Ability {
    rules: RuleStore,
    instance_of: Arc<InstanceOfFn>,
}

impl Ability {
    /// Creates an empty registry with the default instance check.
    pub fn new() -> Self {
        Ability::with_options(AbilityOptions::default())
    }

    pub fn with_options(options: AbilityOptions) -> Self {
        Ability {
            rules: RuleStore::default(),
            instance_of: options.instance_of,
        }
    }

    /// Grants `actions` on `targets` to performers of `model`, in the global
    /// scope and without condition.
    pub fn allow(&mut self, model: ModelId, actions: impl Into<ActionList>, targets: impl Into<TargetList>) {
        self.register(Effect::Allow, model, actions.into(), targets.into(), RuleOptions::new());
    }

    /// Like [`Ability::allow`], narrowed by a condition (a closure-backed
    /// [`Condition`] or a [`Shape`](crate::Shape)).
    pub fn allow_if(
        &mut self,
        model: ModelId,
        actions: impl Into<ActionList>,
        targets: impl Into<TargetList>,
        condition: impl Into<Condition>,
    ) {
        let options = RuleOptions::new().condition(condition);
        self.register(Effect::Allow, model, actions.into(), targets.into(), options);
    }

    pub fn allow_with(
        &mut self,
        model: ModelId,
        actions: impl Into<ActionList>,
        targets: impl Into<TargetList>,
        options: RuleOptions,
    ) {
        self.register(Effect::Allow, model, actions.into(), targets.into(), options);
    }

    /// Revokes `actions` on `targets` from performers of `model`. A matching
    /// revocation wins over every grant except a `$manage` one.
    pub fn disallow(&mut self, model: ModelId, actions: impl Into<ActionList>, targets: impl Into<TargetList>) {
        self.register(Effect::Deny, model, actions.into(), targets.into(), RuleOptions::new());
    }

    pub fn disallow_if(
        &mut self,
        model: ModelId,
        actions: impl Into<ActionList>,
        targets: impl Into<TargetList>,
        condition: impl Into<Condition>,
    ) {
        let options = RuleOptions::new().condition(condition);
        self.register(Effect::Deny, model, actions.into(), targets.into(), options);
    }

    pub fn disallow_with(
        &mut self,
        model: ModelId,
        actions: impl Into<ActionList>,
        targets: impl Into<TargetList>,
        options: RuleOptions,
    ) {
        self.register(Effect::Deny, model, actions.into(), targets.into(), options);
    }

    /// Appends one rule per (action, target, scope) combination, all sharing
    /// the one condition. Returns the number of rules appended.
    ///
    /// An empty action, target or scope list registers nothing.
    pub(crate) fn register(
        &mut self,
        effect: Effect,
        model: ModelId,
        actions: ActionList,
        targets: TargetList,
        options: RuleOptions,
    ) -> usize {
        let RuleOptions { scopes, condition } = options;
        if actions.is_empty() || targets.is_empty() || scopes.is_empty() {
            tracing::warn!(
                ?effect,
                model = %model,
                actions = actions.len(),
                targets = targets.len(),
                scopes = scopes.len(),
                "empty registration list; no rules registered"
            );
            return 0;
        }

        let before = self.rules.len();
        for action in actions.iter() {
            for target in targets.iter() {
                for scope in scopes.iter() {
                    self.rules.push(
                        effect,
                        Rule {
                            model: model.clone(),
                            action: action.clone(),
                            target: target.clone(),
                            scope: scope.clone(),
                            condition: condition.clone(),
                        },
                    );
                }
            }
        }
        let appended = self.rules.len() - before;

        tracing::debug!(
            ?effect,
            model = %model,
            rules = appended,
            conditional = condition.is_some(),
            "registered rules"
        );
        appended
    }

    /// Whether `performer` may perform `action` on `target` in the global scope.
    ///
    /// `target` is an instance (`&value`) or a type identifier (`&MODEL`).
    ///
    /// # Errors
    /// [`AbilityError::UnevaluableCondition`] if a matching rule carries a
    /// condition and `target` is a type identifier.
    pub fn can<'a>(
        &self,
        performer: &dyn Subject,
        action: &str,
        target: impl Into<Target<'a>>,
    ) -> Result<bool, AbilityError> {
        self.can_in(performer, action, target, Scope::global())
    }

    /// Scoped variant of [`Ability::can`]. Rules targeting `$all` ignore the scope.
    pub fn can_in<'a>(
        &self,
        performer: &dyn Subject,
        action: &str,
        target: impl Into<Target<'a>>,
        scope: impl Into<Scope>,
    ) -> Result<bool, AbilityError> {
        let target = target.into();
        let scope = scope.into();

        let grants = self.matching(Effect::Allow, performer, action, target, &scope)?;
        let denies = self.matching(Effect::Deny, performer, action, target, &scope)?;

        // A surviving $manage grant beats any specific revocation.
        let has_manage = grants.iter().any(|rule| rule.action.is_manage());
        let allowed = has_manage || (!grants.is_empty() && denies.is_empty());

        tracing::trace!(
            performer = %performer.model(),
            action,
            target = ?target,
            scope = %scope,
            grants = grants.len(),
            denies = denies.len(),
            has_manage,
            allowed,
            "ability check"
        );
        Ok(allowed)
    }

    /// Negation of [`Ability::can`]; errors are propagated unchanged.
    pub fn cannot<'a>(
        &self,
        performer: &dyn Subject,
        action: &str,
        target: impl Into<Target<'a>>,
    ) -> Result<bool, AbilityError> {
        self.can(performer, action, target).map(|allowed| !allowed)
    }

    pub fn cannot_in<'a>(
        &self,
        performer: &dyn Subject,
        action: &str,
        target: impl Into<Target<'a>>,
        scope: impl Into<Scope>,
    ) -> Result<bool, AbilityError> {
        self.can_in(performer, action, target, scope).map(|allowed| !allowed)
    }

    /// Runs one rule list through the pipeline: performer model, target,
    /// scope, action, then condition.
    fn matching(
        &self,
        effect: Effect,
        performer: &dyn Subject,
        action: &str,
        target: Target<'_>,
        scope: &Scope,
    ) -> Result<Vec<&Rule>, AbilityError> {
        let performer_candidate = Target::Instance(performer);
        let mut matched = Vec::new();

        for rule in self.rules.list(effect) {
            if !(self.instance_of)(&performer_candidate, &rule.model) {
                continue;
            }
            if !self.target_matches(&rule.target, &target) {
                continue;
            }
            if !rule.target.is_all() && rule.scope != *scope {
                continue;
            }
            if !rule.action.covers(action) {
                continue;
            }
            if let Some(condition) = &rule.condition {
                let subject = match target.as_subject() {
                    Some(subject) => subject,
                    None => {
                        return Err(AbilityError::UnevaluableCondition {
                            model: rule.model.clone(),
                            action: rule.action.clone(),
                        })
                    }
                };
                if !condition.evaluate(performer, subject) {
                    continue;
                }
            }
            matched.push(rule);
        }

        Ok(matched)
    }

    fn target_matches(&self, rule_target: &RuleTarget, target: &Target<'_>) -> bool {
        match rule_target {
            RuleTarget::All => true,
            RuleTarget::Model(model) => {
                matches!(target, Target::Model(id) if *id == model) || (self.instance_of)(target, model)
            }
        }
    }

    /// Summaries of every registered rule, grants first, in registration order.
    pub fn rules(&self) -> Vec<RuleSummary> {
        self.rules.summaries()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for Ability {
    fn default() -> Self {
        Ability::new()
    }
}

impl fmt::Debug for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ability")
            .field("abilities", &self.rules.abilities.len())
            .field("inabilities", &self.rules.inabilities.len())
            .finish()
    }
}
