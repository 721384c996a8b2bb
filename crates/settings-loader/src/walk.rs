//! scope walk
//!
//! Recursively walks the scope nodes of a document, accumulating context
//! top-down. Each scope node merges its own key extraction over the
//! context inherited from its ancestors; concrete nodes additionally emit
//! the interpolated result. Descendants always inherit the merged context
//! *before* interpolation, so every emitted scope resolves its
//! placeholders against its own snapshot.
use crate::context::{Context, Value};
use crate::diagnostics::Diagnostics;
use crate::interpolate::interpolate;
use crate::xml_documents::XmlElement;
use crate::SETTINGS_XMLNS;

/// Classification of a document node with respect to the walk
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScopeKind {
    /// Traversed and merged into descendants, never emitted
    Abstract,
    /// Merged and emitted as one entry of the settings list
    Concrete,
    /// Not part of the scope tree; only inspected during extraction
    Unrelated,
}

/// Classifies an element by reserved namespace and local name
pub fn classify(element: &XmlElement) -> ScopeKind {
    if element.namespace.as_deref() != Some(SETTINGS_XMLNS) {
        return ScopeKind::Unrelated;
    }

    match element.name.as_str() {
        "settings" => ScopeKind::Concrete,
        "abstract" => ScopeKind::Abstract,
        _ => ScopeKind::Unrelated,
    }
}

/// Walks the scope tree rooted at `root` and returns the settings list in
/// document pre-order.
pub fn walk(root: &XmlElement, diagnostics: &mut Diagnostics) -> Vec<Context> {
    let mut settings = Vec::new();
    if classify(root) != ScopeKind::Unrelated {
        visit(root, &Context::new(), &mut settings, diagnostics);
    }
    settings
}

/// Visits one scope node with the context inherited from its ancestors.
fn visit(
    element: &XmlElement,
    inherited: &Context,
    settings: &mut Vec<Context>,
    diagnostics: &mut Diagnostics,
) {
    let mut context = inherited.clone();
    for (key, value) in extract_context(element) {
        context.insert(key, value);
    }

    if classify(element) == ScopeKind::Concrete {
        settings.push(interpolate(&context, diagnostics));
    }

    walk_children(element, &context, settings, diagnostics);
}

/// Visits all direct scope children of `element` in document order.
fn walk_children(
    element: &XmlElement,
    context: &Context,
    settings: &mut Vec<Context>,
    diagnostics: &mut Diagnostics,
) {
    for child in element.elements() {
        if classify(child) != ScopeKind::Unrelated {
            visit(child, context, settings, diagnostics);
        }
    }
}

/// Extracts the local context defined on a scope node.
///
/// Contributors are the node's unprefixed attributes followed by its
/// unprefixed child elements, both in document order; key is the local
/// name, value the text content. A repeated key accumulates into a
/// sequence, a single occurrence stays a scalar.
pub fn extract_context(element: &XmlElement) -> Context {
    let mut context = Context::new();

    for attribute in &element.attributes {
        if attribute.prefix.is_none() {
            accumulate(&mut context, &attribute.name, attribute.value.clone());
        }
    }

    for child in element.elements() {
        if child.prefix.is_none() {
            accumulate(&mut context, &child.name, child.text_content());
        }
    }

    context
}

fn accumulate(context: &mut Context, key: &str, text: String) {
    let Some(value) = context.get_mut(key) else {
        context.insert(key.to_string(), Value::Scalar(text));
        return;
    };

    match value {
        Value::Scalar(first) => {
            let first = std::mem::take(first);
            *value = Value::Sequence(vec![first, text]);
        }
        Value::Sequence(values) => values.push(text),
        // not producible by extraction; a repeated key replaces it
        Value::Unknown => *value = Value::Scalar(text),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{context, xml_document};
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_by_namespace_and_local_name() {
        let document = xml_document! {r#"
        <s:abstract xmlns:s="http://github.com/superruzafa/settings-loader">
            <s:settings/>
            <s:other/>
            <settings/>
        </s:abstract>
        "#};

        let root = document.root();
        assert_eq!(classify(root), ScopeKind::Abstract);

        let kinds: Vec<_> = root.elements().map(classify).collect();
        assert_eq!(
            kinds,
            [ScopeKind::Concrete, ScopeKind::Unrelated, ScopeKind::Unrelated]
        );
    }

    #[test]
    fn default_namespace_can_be_the_reserved_one() {
        let document = xml_document! {
            r#"<settings xmlns="http://github.com/superruzafa/settings-loader"/>"#
        };
        assert_eq!(classify(document.root()), ScopeKind::Concrete);
    }

    #[test]
    fn extraction_takes_attributes_then_elements() {
        let document = xml_document! {r#"
        <s:settings xmlns:s="http://github.com/superruzafa/settings-loader"
                    key3="foo" key1="one">
            <key2>two</key2>
            <key3>bar</key3>
        </s:settings>
        "#};

        assert_eq!(
            extract_context(document.root()),
            context! {
                "key3" => vec!["foo", "bar"],
                "key1" => "one",
                "key2" => "two",
            }
        );
    }

    #[test]
    fn prefixed_contributors_are_skipped() {
        let document = xml_document! {r#"
        <s:settings xmlns:s="http://github.com/superruzafa/settings-loader"
                    xmlns:x="urn:example" x:skipped="no">
            <key>value</key>
            <x:ignored>nope</x:ignored>
        </s:settings>
        "#};

        assert_eq!(extract_context(document.root()), context! { "key" => "value" });
    }

    #[test]
    fn repeated_keys_accumulate_in_document_order() {
        let document = xml_document! {r#"
        <s:settings xmlns:s="http://github.com/superruzafa/settings-loader">
            <key>value1</key>
            <key>value2</key>
            <key>value3</key>
        </s:settings>
        "#};

        assert_eq!(
            extract_context(document.root()),
            context! { "key" => vec!["value1", "value2", "value3"] }
        );
    }

    #[test]
    fn unrelated_root_yields_nothing() {
        let document = xml_document!("<config><key>value</key></config>");
        let mut diagnostics = Diagnostics::new();
        assert!(walk(document.root(), &mut diagnostics).is_empty());
    }
}
