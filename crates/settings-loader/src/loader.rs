//! loader façade
//!
//! Owns one parsed document and the settings produced by the last load.
//! Walking and interpolation keep no state of their own, so reloading is
//! just running the walk again.
use crate::context::Context;
use crate::diagnostics::Diagnostics;
use crate::walk::walk;
use crate::xml_documents::XmlDocument;

/// Loads scoped settings from an XML document
#[derive(derive_new::new, Debug)]
pub struct XmlLoader {
    document: XmlDocument,
    #[new(default)]
    settings: Vec<Context>,
    #[new(default)]
    diagnostics: Diagnostics,
}

impl XmlLoader {
    /// Resets and repopulates the settings list.
    ///
    /// Never fails for a well-formed document tree; unresolvable
    /// placeholders are recorded in [XmlLoader::diagnostics] and the
    /// affected values resolve to a best effort.
    pub fn load(&mut self) -> bool {
        let mut diagnostics = Diagnostics::new();
        self.settings = walk(self.document.root(), &mut diagnostics);
        self.diagnostics = diagnostics;
        true
    }

    /// The settings produced by the last [XmlLoader::load], one context
    /// per concrete node in document pre-order. Empty before the first
    /// load.
    pub fn settings(&self) -> &[Context] {
        &self.settings
    }

    /// Warnings gathered during the last [XmlLoader::load]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn document(&self) -> &XmlDocument {
        &self.document
    }
}
