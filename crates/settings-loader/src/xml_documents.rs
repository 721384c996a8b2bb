//! xml document tree
//!
//! [XmlDocument] tracks
//! - the source path (when loaded from a file)
//! - the root element
//!
//! Parsing folds the [quick_xml] event stream into a navigable element
//! tree. Each element keeps its local name, its namespace prefix as
//! written, and the namespace URI the prefix resolved to at that point of
//! the document, so scope classification works with any prefix bound to
//! the reserved namespace (including the default `xmlns=`).
//!
//! Only well-formedness is checked here. Documents that parse are handed
//! to the loader as-is; nothing in this module knows about settings
//! scopes.
use quick_xml::events::Event;
use quick_xml::name::{QName, ResolveResult};
use quick_xml::reader::NsReader;
use std::path::{Path, PathBuf};

/// A parsed XML document and the path it was loaded from
#[derive(Debug, Clone)]
pub struct XmlDocument {
    root: XmlElement,
    source: Option<PathBuf>,
}

impl XmlDocument {
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn load_file(file_path: &Path) -> Result<Self, ParseError> {
        let file_path = file_path.canonicalize()?;
        tracing::info!(path=%file_path.display(), "loading file");

        let file_contents = std::fs::read_to_string(&file_path)?;
        let mut document = parse(&file_contents)?;
        document.source = Some(file_path);
        Ok(document)
    }
}

/// An element with its namespace-resolved name, attributes and content
#[derive(Debug, Clone)]
pub struct XmlElement {
    /// Local name, without prefix
    pub name: String,
    /// Namespace prefix as written in the document
    pub prefix: Option<String>,
    /// Namespace URI the element name resolved to
    pub namespace: Option<String>,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlNode>,
}

#[derive(Debug, Clone)]
pub struct XmlAttribute {
    /// Local name, without prefix
    pub name: String,
    /// Namespace prefix as written in the document
    pub prefix: Option<String>,
    pub value: String,
}

/// Element content in document order
#[derive(Debug, Clone)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    /// Name as written in the document, prefix included
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }

    /// Direct child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Concatenated text of this element and all its descendants
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, text: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Element(element) => element.collect_text(text),
                XmlNode::Text(content) => text.push_str(content),
            }
        }
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("XML syntax error: {message}")]
    Syntax { message: String },
    #[error("Document has no root element")]
    EmptyDocument,
    #[error("Document has more than one root element")]
    MultipleRoots,
    #[error("Unexpected end of document, expected closing tag </{0}>")]
    UnexpectedEof(String),
    #[error("Unexpected closing tag </{0}>")]
    UnexpectedClosingTag(String),
}

/// Parses a document from a string
pub fn parse(source: &str) -> Result<XmlDocument, ParseError> {
    let mut reader = NsReader::from_str(source);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let (resolution, event) = reader
            .read_resolved_event()
            .map_err(|err| ParseError::Syntax {
                message: err.to_string(),
            })?;
        let namespace = match resolution {
            ResolveResult::Bound(ns) => {
                Some(String::from_utf8_lossy(ns.into_inner()).into_owned())
            }
            ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
        };

        match event {
            Event::Start(start) => {
                let element = open_element(&start, namespace)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&start, namespace)?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::End(end) => {
                let name = end.name();
                let local_name = String::from_utf8_lossy(name.local_name().as_ref()).into_owned();
                let Some(element) = stack.pop() else {
                    return Err(ParseError::UnexpectedClosingTag(local_name));
                };
                if element.name != local_name {
                    return Err(ParseError::UnexpectedClosingTag(local_name));
                }
                close_element(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let content = text
                    .unescape()
                    .map_err(|err| ParseError::Syntax {
                        message: err.to_string(),
                    })?
                    .into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(content));
                }
            }
            Event::CData(data) => {
                let content = String::from_utf8_lossy(data.as_ref()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(content));
                }
            }
            Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::UnexpectedEof(open.name.clone()));
    }

    let root = root.ok_or(ParseError::EmptyDocument)?;
    Ok(XmlDocument { root, source: None })
}

fn open_element(
    start: &quick_xml::events::BytesStart<'_>,
    namespace: Option<String>,
) -> Result<XmlElement, ParseError> {
    let (name, prefix) = split_name(start.name());

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| ParseError::Syntax {
            message: err.to_string(),
        })?;

        let (name, prefix) = split_name(attribute.key);
        if is_namespace_declaration(&name, prefix.as_deref()) {
            continue;
        }

        let value = attribute
            .unescape_value()
            .map_err(|err| ParseError::Syntax {
                message: err.to_string(),
            })?
            .into_owned();

        attributes.push(XmlAttribute {
            name,
            prefix,
            value,
        });
    }

    Ok(XmlElement {
        name,
        prefix,
        namespace,
        attributes,
        children: Vec::new(),
    })
}

fn close_element(
    element: XmlElement,
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        return Ok(());
    }

    if root.is_some() {
        return Err(ParseError::MultipleRoots);
    }

    *root = Some(element);
    Ok(())
}

fn split_name(name: QName<'_>) -> (String, Option<String>) {
    let local = String::from_utf8_lossy(name.local_name().as_ref()).into_owned();
    let prefix = name
        .prefix()
        .map(|prefix| String::from_utf8_lossy(prefix.as_ref()).into_owned());
    (local, prefix)
}

/// Namespace declarations live on their own axis; they are neither
/// context contributors nor regular attributes.
fn is_namespace_declaration(name: &str, prefix: Option<&str>) -> bool {
    prefix == Some("xmlns") || (prefix.is_none() && name == "xmlns")
}

/// Utility macro to create an [XmlDocument]
///
/// ```
/// # use settings_loader::xml_document;
/// xml_document!("<config><key>value</key></config>");
/// ```
///
/// # Panic
/// Panics on invalid input
///
/// ```should_panic
/// # use settings_loader::xml_document;
/// xml_document!("<config>");
/// ```
#[macro_export]
macro_rules! xml_document {
    ($expr:expr) => {
        $crate::xml_documents::parse($expr).expect("document must parse")
    };
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn element_tree() {
        let document = xml_document! {r#"
        <config version="1">
            <name>demo</name>
            <name>other</name>
            <empty/>
        </config>
        "#};

        let root = document.root();
        assert_eq!(root.name, "config");
        assert_eq!(root.get_attribute("version"), Some("1"));
        assert_eq!(root.elements().count(), 3);

        let names: Vec<_> = root.elements().map(|element| element.name.as_str()).collect();
        assert_eq!(names, ["name", "name", "empty"]);
        assert_eq!(root.elements().next().unwrap().text_content(), "demo");
    }

    #[test]
    fn namespaces_resolve_through_any_prefix() {
        let document = xml_document! {
            r#"<a:root xmlns:a="urn:one" xmlns="urn:default"><child/></a:root>"#
        };

        let root = document.root();
        assert_eq!(root.prefix.as_deref(), Some("a"));
        assert_eq!(root.namespace.as_deref(), Some("urn:one"));
        assert_eq!(root.qualified_name(), "a:root");

        let child = root.elements().next().unwrap();
        assert_eq!(child.prefix, None);
        assert_eq!(child.namespace.as_deref(), Some("urn:default"));
        assert_eq!(child.qualified_name(), "child");
    }

    #[test]
    fn namespace_declarations_are_not_attributes() {
        let document = xml_document! {
            r#"<root xmlns="urn:default" xmlns:a="urn:one" key="value"/>"#
        };

        let attributes: Vec<_> = document
            .root()
            .attributes
            .iter()
            .map(|attribute| attribute.name.as_str())
            .collect();
        assert_eq!(attributes, ["key"]);
    }

    #[test]
    fn text_is_unescaped() {
        let document = xml_document!("<root>a &amp; b</root>");
        assert_eq!(document.root().text_content(), "a & b");
    }

    #[test]
    fn malformed_documents_error() {
        assert!(parse("<root>").is_err());
        assert!(parse("<root></other>").is_err());
        assert!(parse("").is_err());
        assert!(parse("<one/><two/>").is_err());
    }
}
