//! context value representation
//!
//! A context is a flat, insertion-ordered mapping from key to [Value].
//! Every value extracted from a document is a string; a key that repeats
//! at one node is promoted to a sequence of strings in document order.
//!
//! [Value::Unknown] cannot originate from a document. It exists so that
//! contexts assembled through the API can carry values the loader has no
//! representation for; placeholders referencing such a value resolve to
//! the `<object>` sentinel.
use serde::{ser::SerializeSeq, Serializer};

/// A flat key→value mapping for one scope.
///
/// Insertion order is preserved and overriding a key keeps its original
/// position, so merged scopes enumerate ancestor keys first.
pub type Context = indexmap::IndexMap<String, Value>;

/// All possible context value types
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(String),
    Sequence(Vec<String>),
    Unknown,
}

impl Value {
    /// Returns the scalar text, if this value is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(text) => Some(text),
            Value::Sequence(_) | Value::Unknown => None,
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(values: Vec<String>) -> Self {
        Value::Sequence(values)
    }
}

impl From<Vec<&str>> for Value {
    fn from(values: Vec<&str>) -> Self {
        Value::Sequence(values.into_iter().map(str::to_string).collect())
    }
}

impl serde::ser::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Scalar(value) => serializer.serialize_str(value),
            Value::Sequence(values) => {
                let mut ser = serializer.serialize_seq(Some(values.len()))?;
                for element in values {
                    ser.serialize_element(element)?;
                }
                ser.end()
            }
            Value::Unknown => serializer.serialize_unit(),
        }
    }
}

/// Utility macro to create a [Context]
///
/// ```
/// # use settings_loader::context;
/// let context = context! {
///     "host" => "example.org",
///     "aliases" => vec!["www", "web"],
/// };
/// assert_eq!(context.len(), 2);
/// ```
#[macro_export]
macro_rules! context {
    {} => { $crate::context::Context::new() };
    { $($key:expr => $value:expr),+ $(,)? } => {{
        let mut context = $crate::context::Context::new();
        $( context.insert($key.to_string(), $crate::context::Value::from($value)); )+
        context
    }};
}
