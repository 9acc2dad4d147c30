//! Filling holder elements from their attributes

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;
use weft_component::{
    events, Component, ComponentError, Definition, EventArgs, MemoryStore, Registry, Scope,
};
use weft_core::WeftConfig;
use weft_dom::{HolderSource, MemoryDocument, RenderBackend};

fn field_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .define(
            "Field",
            Definition::new()
                .option("label", "")
                .option("maxLength", 10)
                .property("store_field", "field")
                .render_with(|c: &Component| {
                    format!(
                        r#"<label id="{}">{}:{}</label>"#,
                        c.id(),
                        c.options()["label"].as_str().unwrap_or(""),
                        c.options()["maxLength"]
                    )
                })
                .value_with(|c: &Component| c.options()["label"].clone()),
            None,
        )
        .unwrap();
    registry
}

#[test]
fn test_fill_builds_and_replaces_holder() {
    let registry = field_registry();
    let mut doc = MemoryDocument::parse(
        r#"<form><div data-comp="Field" data-comp-name="age" data-comp-options='{"label": "Age"}'></div></form>"#,
    )
    .unwrap();
    let holder = doc.select("data-comp")[0];

    let field = registry.fill(&mut doc, holder, &Scope::new()).unwrap();

    assert_eq!(field.name(), "age");
    assert_eq!(field.type_name(), "Field");
    assert!(field.is_rendered());
    assert_eq!(
        doc.to_html(),
        format!(r#"<form><label id="{}">Age:10</label></form>"#, field.id())
    );
}

#[test]
fn test_fill_custom_options_only_for_declared_keys() {
    let registry = field_registry();
    let mut doc = MemoryDocument::parse(
        r#"<div data-comp="Field" data-comp-op-max-length="4" data-comp-op-unknown="x" data-comp-op-label="Name"></div>"#,
    )
    .unwrap();
    let holder = doc.select("data-comp")[0];

    let field = registry.fill(&mut doc, holder, &Scope::new()).unwrap();

    assert_eq!(field.option_value("maxLength"), Some(&json!(4)));
    assert_eq!(field.option_value("label"), Some(&json!("Name")));
    assert!(field.option_value("unknown").is_none());
    assert!(field.option_value("max_length").is_none());
}

#[test]
fn test_custom_options_override_named_options() {
    let registry = field_registry();
    let scope = Scope::new().with_options_fn("fieldOptions", || {
        json!({"label": "From scope", "maxLength": 3})
    });
    let mut doc = MemoryDocument::parse(
        r#"<div data-comp="Field" data-comp-options="fieldOptions" data-comp-op-label="From attribute"></div>"#,
    )
    .unwrap();
    let holder = doc.select("data-comp")[0];

    let field = registry.fill(&mut doc, holder, &scope).unwrap();

    assert_eq!(field.option_value("label"), Some(&json!("From attribute")));
    assert_eq!(field.option_value("maxLength"), Some(&json!(3)));
}

#[test]
fn test_fill_order_store_init_holder_render() {
    let order = Rc::new(RefCell::new(Vec::<String>::new()));
    let mut registry = Registry::new();
    let o = order.clone();
    registry
        .define(
            "Tracked",
            Definition::new()
                .render_with(|c: &Component| format!(r#"<span id="{}"></span>"#, c.id()))
                .on(events::CONNECT_STORE, {
                    let o = o.clone();
                    move |_: &Component, _: &EventArgs| o.borrow_mut().push("store".into())
                })
                .on(events::RENDERED, {
                    let o = o.clone();
                    move |_: &Component, _: &EventArgs| o.borrow_mut().push("render".into())
                })
                .method("handle_holder", move |_: &mut Component, args: &[Value]| {
                    let name = args[0]["data-comp-name"].as_str().unwrap_or("").to_string();
                    o.borrow_mut().push(format!("holder:{name}"));
                    Value::Null
                }),
            None,
        )
        .unwrap();

    let o = order.clone();
    let scope = Scope::new()
        .with_store("profile", MemoryStore::shared("profile"))
        .with_init("setup", move |c: &mut Component| {
            o.borrow_mut()
                .push(format!("init:{}", c.is_connected("profile")))
        });
    let mut doc = MemoryDocument::parse(
        r#"<div data-comp="Tracked" data-comp-name="t" data-comp-store="profile" data-comp-init="setup"></div>"#,
    )
    .unwrap();
    let holder = doc.select("data-comp")[0];

    registry.fill(&mut doc, holder, &scope).unwrap();

    assert_eq!(
        *order.borrow(),
        vec!["store", "init:true", "holder:t", "render"]
    );
}

#[test]
fn test_fill_without_replace_keeps_holder() {
    let registry = field_registry();
    let mut doc = MemoryDocument::parse(
        r#"<div data-comp="Field" data-name="n" data-comp-render-replace="false"></div>"#,
    )
    .unwrap();
    let holder = doc.select("data-comp")[0];

    let field = registry.fill(&mut doc, holder, &Scope::new()).unwrap();

    // The holder now carries the component id, so it is the anchor
    assert!(doc.contains(holder));
    assert_eq!(doc.attribute(holder, "id"), Some(field.id()));
    assert_eq!(field.container(&doc).unwrap(), holder);
    assert_eq!(doc.metadata(holder, "component"), Some(field.id()));
}

#[test]
fn test_configured_replace_default() {
    let mut config = WeftConfig::default();
    config.render.replace = false;
    let mut registry = Registry::with_config(config);
    registry
        .define(
            "Box",
            Definition::new().render_with(|c: &Component| format!(r#"<b id="{}"></b>"#, c.id())),
            None,
        )
        .unwrap();
    let mut doc = MemoryDocument::parse(r#"<i data-comp="Box"></i>"#).unwrap();
    let holder = doc.select("data-comp")[0];

    registry.fill(&mut doc, holder, &Scope::new()).unwrap();
    assert!(doc.contains(holder));
}

#[test]
fn test_fill_errors_leave_holder_untouched() {
    let registry = field_registry();
    let cases = [
        (
            r#"<div data-comp="Missing"></div>"#,
            ComponentError::UnknownType("Missing".into()),
        ),
        (
            r#"<div data-comp="Field" data-comp-store="nowhere"></div>"#,
            ComponentError::UnresolvedReference {
                kind: "store",
                name: "nowhere".into(),
            },
        ),
        (
            r#"<div data-comp="Field" data-comp-init="nothing"></div>"#,
            ComponentError::UnresolvedReference {
                kind: "init",
                name: "nothing".into(),
            },
        ),
    ];

    for (markup, expected) in cases {
        let mut doc = MemoryDocument::parse(markup).unwrap();
        let holder = doc.select("data-comp")[0];
        assert_eq!(registry.fill(&mut doc, holder, &Scope::new()).unwrap_err(), expected);
        assert_eq!(doc.to_html(), markup);
    }
}

#[test]
fn test_fill_rejects_non_mapping_options() {
    let registry = field_registry();
    let mut doc =
        MemoryDocument::parse(r#"<div data-comp="Field" data-comp-options="[1, 2]"></div>"#)
            .unwrap();
    let holder = doc.select("data-comp")[0];

    let err = registry.fill(&mut doc, holder, &Scope::new()).unwrap_err();
    assert!(matches!(err, ComponentError::InvalidOptionsShape(_)));
}

#[test]
fn test_fill_all_in_document_order() {
    let registry = field_registry();
    let mut doc = MemoryDocument::parse(
        r#"<section><p data-comp="Field" name="first"></p><p>plain</p><p data-comp="Field" name="second"></p></section>"#,
    )
    .unwrap();

    let fields = registry.fill_all(&mut doc, &Scope::new()).unwrap();

    let names: Vec<&str> = fields.iter().map(Component::name).collect();
    assert_eq!(names, vec!["first", "second"]);
    assert!(doc.select("data-comp").is_empty());
    for field in &fields {
        assert!(doc.locate(field.id()).is_some());
    }
}

#[test]
fn test_fill_all_skips_swallowed_holders() {
    let registry = field_registry();
    let mut doc = MemoryDocument::parse(
        r#"<div data-comp="Field" name="outer"><span data-comp="Field" name="inner"></span></div>"#,
    )
    .unwrap();

    let fields = registry.fill_all(&mut doc, &Scope::new()).unwrap();

    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name(), "outer");
}

#[test]
fn test_unnamed_holder_gets_generated_name() {
    let registry = field_registry();
    let mut doc = MemoryDocument::parse(r#"<div data-comp="Field"></div>"#).unwrap();
    let holder = doc.select("data-comp")[0];

    let field = registry.fill(&mut doc, holder, &Scope::new()).unwrap();

    assert!(field.name().starts_with(registry.ids().prefix()));
    assert_ne!(field.name(), field.id());
}
