//!
//! The view the engine has of host domain objects.
//!
//! The engine never reflects over host types. A host type takes part in
//! authorization by implementing [`Subject`]: it names its model and exposes
//! the fields that shape conditions may read.

use std::any::Any;
use std::fmt;

use serde_json::Value;

use crate::types::ModelId;

/// Upcast helper so typed conditions can downcast `&dyn Subject` operands.
/// Implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A host domain object that can act as a performer or a target.
pub trait Subject: AsAny + fmt::Debug {
    /// The model this value is a direct instance of.
    fn model(&self) -> ModelId;

    /// Key/value view used by shape conditions. Returning `None` means the
    /// field is undefined, which never equals any shape value.
    fn field(&self, _name: &str) -> Option<Field<'_>> {
        None
    }
}

/// The value of a subject field as seen by shape matching.
pub enum Field<'a> {
    /// Plain data. JSON objects nest and are matched recursively.
    Value(Value),
    /// A nested domain object, matched recursively through its own fields.
    Subject(&'a dyn Subject),
    /// A zero-argument accessor, invoked when the field is matched.
    Computed(Box<dyn Fn() -> Field<'a> + 'a>),
}

impl<'a> Field<'a> {
    /// Invokes computed accessors until a concrete value or subject remains.
    pub fn resolve(self) -> Field<'a> {
        let mut field = self;
        while let Field::Computed(get) = field {
            field = get();
        }
        field
    }

    pub fn computed(get: impl Fn() -> Field<'a> + 'a) -> Self {
        Field::Computed(Box::new(get))
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Field::Subject(subject) => f.debug_tuple("Subject").field(subject).finish(),
            Field::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<Value> for Field<'_> {
    fn from(value: Value) -> Self {
        Field::Value(value)
    }
}

impl From<&str> for Field<'_> {
    fn from(value: &str) -> Self {
        Field::Value(Value::from(value))
    }
}

impl From<String> for Field<'_> {
    fn from(value: String) -> Self {
        Field::Value(Value::from(value))
    }
}

impl From<bool> for Field<'_> {
    fn from(value: bool) -> Self {
        Field::Value(Value::from(value))
    }
}

impl From<i64> for Field<'_> {
    fn from(value: i64) -> Self {
        Field::Value(Value::from(value))
    }
}

impl From<u64> for Field<'_> {
    fn from(value: u64) -> Self {
        Field::Value(Value::from(value))
    }
}

impl From<f64> for Field<'_> {
    fn from(value: f64) -> Self {
        Field::Value(Value::from(value))
    }
}

/// What a check is run against: a concrete instance or a type identifier.
///
/// Performers are always instances; targets may be either. Passing a model
/// identifier asks "may the performer do this to *some* value of this type",
/// which is only answerable for rules without conditions.
#[derive(Clone, Copy)]
pub enum Target<'a> {
    Instance(&'a dyn Subject),
    Model(&'a ModelId),
}

impl<'a> Target<'a> {
    pub fn instance(subject: &'a dyn Subject) -> Self {
        Target::Instance(subject)
    }

    pub fn is_model(&self) -> bool {
        matches!(self, Target::Model(_))
    }

    pub fn as_subject(&self) -> Option<&'a dyn Subject> {
        match *self {
            Target::Instance(subject) => Some(subject),
            Target::Model(_) => None,
        }
    }
}

impl fmt::Debug for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Instance(subject) => write!(f, "Instance({})", subject.model()),
            Target::Model(model) => write!(f, "Model({})", model),
        }
    }
}

impl<'a, S: Subject> From<&'a S> for Target<'a> {
    fn from(subject: &'a S) -> Self {
        Target::Instance(subject)
    }
}

impl<'a> From<&'a ModelId> for Target<'a> {
    fn from(model: &'a ModelId) -> Self {
        Target::Model(model)
    }
}

/// Default instance check: an instance satisfies exactly its own model and a
/// type identifier satisfies no model.
pub fn direct_instance_of(candidate: &Target<'_>, model: &ModelId) -> bool {
    match candidate {
        Target::Instance(subject) => subject.model() == *model,
        Target::Model(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGET: ModelId = ModelId::new("Widget");

    #[derive(Debug)]
    struct Widget {
        size: u64,
    }

    impl Subject for Widget {
        fn model(&self) -> ModelId {
            WIDGET
        }

        fn field(&self, name: &str) -> Option<Field<'_>> {
            match name {
                "size" => Some(self.size.into()),
                "double" => Some(Field::computed(move || (self.size * 2).into())),
                _ => None,
            }
        }
    }

    #[test]
    fn test_computed_fields_resolve() {
        let widget = Widget { size: 4 };
        match widget.field("double").map(Field::resolve) {
            Some(Field::Value(v)) => assert_eq!(v, Value::from(8u64)),
            other => panic!("unexpected field {:?}", other),
        }
        assert!(widget.field("missing").is_none());
    }

    #[derive(Debug)]
    struct Opaque;

    impl Subject for Opaque {
        fn model(&self) -> ModelId {
            ModelId::new("Opaque")
        }
    }

    #[test]
    fn test_default_field_view_is_empty() {
        assert!(Opaque.field("anything").is_none());
        assert!(Opaque.field("").is_none());
    }

    #[test]
    fn test_direct_instance_of() {
        let widget = Widget { size: 1 };
        assert!(direct_instance_of(&Target::from(&widget), &WIDGET));
        assert!(!direct_instance_of(&Target::from(&widget), &ModelId::new("Other")));
        // A type identifier is not an instance of anything, not even itself.
        assert!(!direct_instance_of(&Target::from(&WIDGET), &WIDGET));
    }
}
