//!
//! Condition algebra.
//!
//! A [`Condition`] is a pure predicate over `(performer, target)`. Conditions
//! are built from closures or from [`Shape`]s and combined with [`and`], [`or`]
//! and [`not`] (or the `&`, `|` and `!` operators), which themselves yield
//! ordinary conditions and therefore nest freely.

pub mod shape;

pub use shape::Shape;

use std::fmt;
use std::ops;
use std::sync::Arc;

use crate::subject::Subject;

type Predicate = dyn Fn(&dyn Subject, &dyn Subject) -> bool + Send + Sync;

/// A predicate narrowing a rule to particular performer/target pairs.
///
/// Cloning is cheap: all rules registered by one call share a single
/// condition.
#[derive(Clone)]
pub struct Condition {
    predicate: Arc<Predicate>,
}

impl Condition {
    /// Builds a condition over concrete performer and target types.
    ///
    /// If either operand is not of the expected type the condition does not
    /// hold.
    ///
    /// ```
    /// use ability_core::{Condition, ModelId, Subject};
    ///
    /// #[derive(Debug)]
    /// struct User { name: String }
    ///
    /// impl Subject for User {
    ///     fn model(&self) -> ModelId { ModelId::new("User") }
    /// }
    ///
    /// let same_user = Condition::new(|p: &User, t: &User| p.name == t.name);
    /// let a = User { name: "A".into() };
    /// let b = User { name: "B".into() };
    /// assert!(same_user.evaluate(&a, &a));
    /// assert!(!same_user.evaluate(&a, &b));
    /// ```
    pub fn new<P, T, F>(predicate: F) -> Self
    where
        P: Subject,
        T: Subject,
        F: Fn(&P, &T) -> bool + Send + Sync + 'static,
    {
        Condition::from_fn(move |performer, target| {
            match (
                performer.as_any().downcast_ref::<P>(),
                target.as_any().downcast_ref::<T>(),
            ) {
                (Some(performer), Some(target)) => predicate(performer, target),
                _ => {
                    tracing::trace!(
                        performer = %performer.model(),
                        target = %target.model(),
                        "condition operands are not of the expected types"
                    );
                    false
                }
            }
        })
    }

    /// Builds a condition over type-erased subjects.
    pub fn from_fn<F>(predicate: F) -> Self
    where
        F: Fn(&dyn Subject, &dyn Subject) -> bool + Send + Sync + 'static,
    {
        Condition {
            predicate: Arc::new(predicate),
        }
    }

    /// Normalizes a shape into a condition on the target; the performer is
    /// not consulted.
    pub fn shape(shape: Shape) -> Self {
        Condition::from_fn(move |_performer, target| shape.matches(target))
    }

    pub fn evaluate(&self, performer: &dyn Subject, target: &dyn Subject) -> bool {
        (self.predicate)(performer, target)
    }

    pub fn and(self, other: impl Into<Condition>) -> Self {
        and([self, other.into()])
    }

    pub fn or(self, other: impl Into<Condition>) -> Self {
        or([self, other.into()])
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}

impl From<Shape> for Condition {
    fn from(shape: Shape) -> Self {
        Condition::shape(shape)
    }
}

/// Holds when every condition holds. `and([])` always holds.
pub fn and<I>(conditions: I) -> Condition
where
    I: IntoIterator,
    I::Item: Into<Condition>,
{
    let conditions: Vec<Condition> = conditions.into_iter().map(Into::into).collect();
    Condition::from_fn(move |performer, target| {
        conditions.iter().all(|c| c.evaluate(performer, target))
    })
}

/// Holds when at least one condition holds. `or([])` never holds.
pub fn or<I>(conditions: I) -> Condition
where
    I: IntoIterator,
    I::Item: Into<Condition>,
{
    let conditions: Vec<Condition> = conditions.into_iter().map(Into::into).collect();
    Condition::from_fn(move |performer, target| {
        conditions.iter().any(|c| c.evaluate(performer, target))
    })
}

pub fn not(condition: impl Into<Condition>) -> Condition {
    let condition = condition.into();
    Condition::from_fn(move |performer, target| !condition.evaluate(performer, target))
}

impl ops::BitAnd for Condition {
    type Output = Condition;

    fn bitand(self, rhs: Condition) -> Condition {
        self.and(rhs)
    }
}

impl ops::BitOr for Condition {
    type Output = Condition;

    fn bitor(self, rhs: Condition) -> Condition {
        self.or(rhs)
    }
}

impl ops::Not for Condition {
    type Output = Condition;

    fn not(self) -> Condition {
        not(self)
    }
}
