//!
//! Deep partial matching of targets against shapes.

use serde_json::{Map, Number, Value};

use crate::error::AbilityError;
use crate::subject::{Field, Subject};

/// A deep partial pattern over a target's fields.
///
/// Every key present in the shape constrains the field of the same name;
/// absent keys are unconstrained, so the empty shape matches every target.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Shape(Map<String, Value>);

impl Shape {
    pub fn new(entries: Map<String, Value>) -> Self {
        Shape(entries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Whether `subject` matches this shape.
    pub fn matches(&self, subject: &dyn Subject) -> bool {
        matches_subject(subject, &self.0)
    }
}

impl From<Map<String, Value>> for Shape {
    fn from(entries: Map<String, Value>) -> Self {
        Shape(entries)
    }
}

impl TryFrom<Value> for Shape {
    type Error = AbilityError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(entries) => Ok(Shape(entries)),
            other => Err(AbilityError::InvalidShape(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }
}

/// Builds a [`Shape`] from a JSON object literal.
///
/// ```
/// use ability_core::shape;
///
/// let public = shape!({ "isPublic": true });
/// assert!(!public.is_empty());
/// ```
#[macro_export]
macro_rules! shape {
    ({ $($body:tt)* }) => {
        match $crate::__private::json!({ $($body)* }) {
            $crate::__private::Value::Object(entries) => $crate::Shape::new(entries),
            _ => unreachable!("an object literal always produces a JSON object"),
        }
    };
}

fn matches_subject(subject: &dyn Subject, partial: &Map<String, Value>) -> bool {
    partial.iter().all(|(key, expected)| match subject.field(key) {
        Some(field) => matches_field(field, expected),
        None => false,
    })
}

fn matches_object(object: &Map<String, Value>, partial: &Map<String, Value>) -> bool {
    partial.iter().all(|(key, expected)| match object.get(key) {
        Some(actual) => matches_value(actual, expected),
        None => false,
    })
}

fn matches_field(field: Field<'_>, expected: &Value) -> bool {
    match field.resolve() {
        Field::Value(actual) => matches_value(&actual, expected),
        Field::Subject(nested) => match expected {
            Value::Object(partial) => matches_subject(nested, partial),
            // A domain object never equals plain data.
            _ => false,
        },
        Field::Computed(_) => unreachable!("resolve() leaves no computed fields"),
    }
}

fn matches_value(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        // An empty nested shape constrains nothing, whatever the field holds.
        (_, Value::Object(partial)) if partial.is_empty() => true,
        // A null field is an explicit value; only a null shape value matches it.
        (Value::Null, _) => expected.is_null(),
        (Value::Object(object), Value::Object(partial)) => matches_object(object, partial),
        (_, Value::Object(_)) => false,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        _ => actual == expected,
    }
}

/// Numeric equality by value, so `10` and `10.0` are the same number.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
