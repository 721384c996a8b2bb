//! warning collection
//!
//! Every recoverable condition found while resolving a scope is recorded
//! as a [Warning]. Warnings never abort a load; the affected placeholder
//! resolves to an empty string or a sentinel and processing continues.
//!
//! The sink is an explicit parameter of the walk and of interpolation, so
//! independent loaders never share diagnostic state.

/// Ordered collection of warnings found during one load
#[derive(derive_new::new, Debug, Default)]
pub struct Diagnostics {
    #[new(default)]
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(%warning, "interpolation warning");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A placeholder referenced a key absent from the context
    UndefinedKey(String),
    /// A placeholder chain revisited a key currently being resolved.
    ///
    /// The path holds the resolution stack at the point of re-entry,
    /// ending with the revisited key.
    CyclicRecursion(Vec<String>),
    /// A placeholder referenced a sequence value
    ArrayInterpolation(String),
    /// A placeholder referenced a value without a textual representation
    ObjectInterpolation(String),
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UndefinedKey(key) => write!(f, "Undefined key: \"{key}\""),
            Warning::CyclicRecursion(path) => {
                write!(f, "Cyclic recursion: {}", path.join(" -> "))
            }
            Warning::ArrayInterpolation(key) => write!(f, "Array interpolation: \"{key}\""),
            Warning::ObjectInterpolation(key) => write!(f, "Object interpolation: \"{key}\""),
        }
    }
}
