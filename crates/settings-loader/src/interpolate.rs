//! placeholder interpolation
//!
//! Scalar context values may reference other keys of the same context
//! with `{{ key }}` placeholders. Resolution is recursive: the referenced
//! key is itself fully resolved before being substituted.
//!
//! Each [interpolate] call owns a memo map of already-resolved keys and a
//! stack of keys currently being resolved. The stack detects reference
//! cycles; a cycle is broken at the point of re-entry by substituting an
//! empty string, so every key still ends up with the longest prefix that
//! could be resolved from its own call site.
use crate::context::{Context, Value};
use crate::diagnostics::{Diagnostics, Warning};
use once_cell::sync::Lazy;

/// Matches things like {{whatever}}, {{ what}ever }}, {{what}e}v}e}r }}...
/// and captures the key comprised between "{{" and "}}"
static PLACEHOLDER: Lazy<fancy_regex::Regex> = Lazy::new(|| {
    fancy_regex::Regex::new(r"\{\{\s*((?:(?!\}\})\S)+)\s*\}\}")
        .expect("placeholder pattern must compile")
});

/// Interpolates string context values with values of other keys in the context.
///
/// Returns a new context with the same keys in the same order. Sequences
/// and unknown values pass through unchanged; a placeholder *referencing*
/// one of them is substituted with the `<array>` / `<object>` sentinel.
/// Every recoverable condition is recorded in `diagnostics`.
pub fn interpolate(context: &Context, diagnostics: &mut Diagnostics) -> Context {
    let mut solved = Context::new();
    let mut stack = Vec::new();

    context
        .keys()
        .map(|key| {
            let value = resolve(key, context, &mut solved, &mut stack, diagnostics);
            (key.clone(), value)
        })
        .collect()
}

/// Resolves one key, recursing into every placeholder it references.
fn resolve(
    key: &str,
    context: &Context,
    solved: &mut Context,
    stack: &mut Vec<String>,
    diagnostics: &mut Diagnostics,
) -> Value {
    if let Some(value) = solved.get(key) {
        return value.clone();
    }

    if stack.iter().any(|entered| entered == key) {
        let mut path = stack.clone();
        path.push(key.to_string());
        diagnostics.warn(Warning::CyclicRecursion(path));
        solved.insert(key.to_string(), Value::Scalar(String::new()));
        return Value::Scalar(String::new());
    }

    let Some(value) = context.get(key) else {
        diagnostics.warn(Warning::UndefinedKey(key.to_string()));
        solved.insert(key.to_string(), Value::Scalar(String::new()));
        return Value::Scalar(String::new());
    };

    let Value::Scalar(text) = value else {
        solved.insert(key.to_string(), value.clone());
        return value.clone();
    };

    stack.push(key.to_string());
    let resolved = PLACEHOLDER
        .replace_all(text, |captures: &fancy_regex::Captures| {
            let subkey = &captures[1];
            match resolve(subkey, context, solved, stack, diagnostics) {
                Value::Scalar(value) => value,
                Value::Sequence(_) => {
                    diagnostics.warn(Warning::ArrayInterpolation(subkey.to_string()));
                    "<array>".to_string()
                }
                Value::Unknown => {
                    diagnostics.warn(Warning::ObjectInterpolation(subkey.to_string()));
                    "<object>".to_string()
                }
            }
        })
        .into_owned();
    stack.pop();

    // Overwrites the empty string memoized when this key turned out to be
    // part of a cycle. Keys further up the stack already got the empty
    // substitution; this key itself keeps everything resolved so far.
    let resolved = Value::Scalar(resolved);
    solved.insert(key.to_string(), resolved.clone());
    resolved
}
