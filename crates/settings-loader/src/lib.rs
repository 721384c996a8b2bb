//! # settings-loader - layered settings from xml
//!
//! For CLI usage see the README.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `settings-loader` works internally.
//!
//! ### Document terms
//!
//! A settings document is plain XML. Two local names in the reserved
//! namespace [SETTINGS_XMLNS] form the scope vocabulary:
//! - `settings`: a *concrete* scope, emitted as one entry of the result
//! - `abstract`: a scope that only contributes keys to its descendants
//!
//! Any prefix may be bound to the reserved namespace, including the
//! default `xmlns=`. Everything else in the document is either a context
//! contributor or ignored.
//!
//! This is a valid settings document:
//! ```xml
//! <s:abstract xmlns:s="http://github.com/superruzafa/settings-loader">
//!     <host>example.org</host>
//!     <s:settings name="api">
//!         <url>https://{{ host }}/api</url>
//!     </s:settings>
//! </s:abstract>
//! ```
//!
//! ### Loading documents
//!
//! An `.xml` document is parsed into an element tree
//! ([xml_documents::XmlDocument]) by folding the [quick_xml] event
//! stream. Each element keeps its local name, prefix and resolved
//! namespace URI; the source path is stored so error messages can point
//! to it. At this point a document only has to be well-formed XML to be
//! accepted.
//!
//! ### Walking scopes
//!
//! see [walk::walk]
//!
//! The walk visits every `settings`/`abstract` node top-down, carrying a
//! [context::Context] (an insertion-ordered map) down the tree:
//!
//! - each node extracts its *local context*: its unprefixed attributes,
//!   then its unprefixed child elements, in document order. A key that
//!   repeats at one node becomes a [context::Value::Sequence]; a single
//!   occurrence stays a [context::Value::Scalar].
//! - the local context is merged key-wise over the inherited one; the
//!   node's own keys win and entirely replace inherited values, scalar
//!   over sequence included.
//! - a concrete node emits the interpolated merge; every node passes the
//!   *pre-interpolation* merge on to its scope children.
//!
//! ### Interpolation
//!
//! see [interpolate::interpolate]
//!
//! Scalar values may reference sibling keys with `{{ key }}`. Resolution
//! is recursive and memoized per scope; reference cycles are detected via
//! a resolution stack and broken by substituting an empty string.
//! Unresolvable references never fail a load: they are recorded as
//! [diagnostics::Warning]s and a best-effort value is produced (empty
//! string for unknown keys and cycles, `<array>`/`<object>` sentinels for
//! values without a textual representation).
//!
//! ### Output
//!
//! [loader::XmlLoader::load] stores the emitted scopes as an ordered
//! settings list which in turn gets serialized via [serde].
//!
pub mod context;
pub mod diagnostics;
pub mod interpolate;
pub mod loader;
pub mod walk;
pub mod xml_documents;

/// Namespace URI reserved for the scope vocabulary
pub const SETTINGS_XMLNS: &str = "http://github.com/superruzafa/settings-loader";
