//! End-to-end loads
//!
//! Full documents combining scope inheritance, key overriding, sequence
//! accumulation and placeholder interpolation, checked against the
//! externally observable settings list.

use pretty_assertions::assert_eq;
use settings_loader::context;
use settings_loader::diagnostics::Warning;
use settings_loader::loader::XmlLoader;
use settings_loader::xml_document;

fn load(xml: &str) -> XmlLoader {
    let mut loader = XmlLoader::new(xml_document!(xml));
    assert!(loader.load());
    loader
}

#[test]
fn environments_cascade() {
    let loader = load(
        r#"<?xml version="1.0" encoding="UTF-8"?>
        <s:abstract xmlns:s="http://github.com/superruzafa/settings-loader">
            <host>example.org</host>
            <url>https://{{ host }}/{{ path }}</url>
            <s:settings name="api" path="api"/>
            <s:settings name="www">
                <host>www.example.org</host>
                <path></path>
            </s:settings>
            <s:abstract region="eu">
                <host>eu.example.org</host>
                <s:settings name="api-eu" path="api"/>
            </s:abstract>
        </s:abstract>"#,
    );

    assert_eq!(
        loader.settings(),
        [
            context! {
                "host" => "example.org",
                "url" => "https://example.org/api",
                "name" => "api",
                "path" => "api",
            },
            context! {
                "host" => "www.example.org",
                "url" => "https://www.example.org/",
                "name" => "www",
                "path" => "",
            },
            context! {
                "host" => "eu.example.org",
                "url" => "https://eu.example.org/api",
                "region" => "eu",
                "name" => "api-eu",
                "path" => "api",
            },
        ]
    );
    assert!(loader.diagnostics().is_empty());
}

#[test]
fn settings_list_preserves_document_preorder() {
    let loader = load(
        r#"<s:settings xmlns:s="http://github.com/superruzafa/settings-loader" id="1">
            <s:settings id="2">
                <s:settings id="3"/>
            </s:settings>
            <s:settings id="4"/>
        </s:settings>"#,
    );

    let ids: Vec<_> = loader
        .settings()
        .iter()
        .map(|settings| settings["id"].as_scalar().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["1", "2", "3", "4"]);
}

#[test]
fn descendants_inherit_uninterpolated_values() {
    // The placeholder is resolved again in the child scope against the
    // child's own snapshot of the context.
    let loader = load(
        r#"<s:settings xmlns:s="http://github.com/superruzafa/settings-loader">
            <greeting>Hello {{ who }}</greeting>
            <who>world</who>
            <s:settings>
                <who>there</who>
            </s:settings>
        </s:settings>"#,
    );

    assert_eq!(
        loader.settings(),
        [
            context! { "greeting" => "Hello world", "who" => "world" },
            context! { "greeting" => "Hello there", "who" => "there" },
        ]
    );
}

#[test]
fn default_namespace_scopes() {
    let loader = load(
        r#"<settings xmlns="http://github.com/superruzafa/settings-loader">
            <key>value</key>
        </settings>"#,
    );

    assert_eq!(loader.settings(), [context! { "key" => "value" }]);
}

#[test]
fn warnings_accumulate_across_scopes() {
    let loader = load(
        r#"<s:abstract xmlns:s="http://github.com/superruzafa/settings-loader">
            <s:settings>
                <a>{{ missing1 }}</a>
            </s:settings>
            <s:settings>
                <b>{{ missing2 }}</b>
            </s:settings>
        </s:abstract>"#,
    );

    assert_eq!(
        loader.settings(),
        [context! { "a" => "" }, context! { "b" => "" }]
    );
    assert_eq!(
        loader.diagnostics().warnings(),
        [
            Warning::UndefinedKey("missing1".to_string()),
            Warning::UndefinedKey("missing2".to_string()),
        ]
    );
}
