//! Integration tests for rendering components into a headless document
//!
//! These tests verify that:
//! - Option partials deep-merge in call order
//! - render / remove leave no anchor behind
//! - Rendering twice is the same as remove + render
//! - reRender never mutates an unrendered component

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;
use weft_component::{events, Component, ComponentError, EventArgs, LifecycleState, RenderHandler};
use weft_core::options_from_value;
use weft_dom::{HolderSource, MemoryDocument, RenderBackend};

fn card(name: &str) -> Component {
    let mut c = Component::new(name);
    c.set_render_handler(RenderHandler::func(|c: &Component| {
        let title = c
            .option_value("title")
            .and_then(Value::as_str)
            .unwrap_or("untitled")
            .to_string();
        format!(r#"<article id="{}"><h1>{}</h1></article>"#, c.id(), title)
    }));
    c
}

/// Later partials win at the same path, mappings merge recursively
#[test]
fn test_option_partials_merge_in_order() {
    let partials = [
        json!({"style": {"color": "red", "border": {"width": 1}}, "tags": ["a"]}),
        json!({"style": {"border": {"style": "solid"}}, "tags": ["b", "c"]}),
        json!({"style": {"color": "blue"}, "visible": true}),
    ];

    let mut c = Component::new("c");
    for partial in partials {
        c.option(&options_from_value(partial).unwrap());
    }

    assert_eq!(
        Value::Object(c.get_options()),
        json!({
            "style": {"color": "blue", "border": {"width": 1, "style": "solid"}},
            "tags": ["b", "c"],
            "visible": true
        })
    );
}

#[test]
fn test_render_then_remove_leaves_nothing() -> anyhow::Result<()> {
    let mut doc = MemoryDocument::parse(r#"<body><div id="slot"></div></body>"#)?;
    let slot = doc.locate("slot").unwrap();
    let mut c = card("card");
    c.set_option("title", "Hello");

    c.render(&mut doc, slot, true)?;
    assert!(c.is_rendered());
    assert_eq!(
        doc.to_html(),
        format!(r#"<body><article id="{}"><h1>Hello</h1></article></body>"#, c.id())
    );

    c.remove(&mut doc)?;
    assert!(!c.is_rendered());
    assert!(c.find_container(&doc).is_none());
    assert_eq!(doc.to_html(), "<body></body>");
    Ok(())
}

#[test]
fn test_render_twice_keeps_a_single_anchor() -> anyhow::Result<()> {
    let mut doc = MemoryDocument::parse(r#"<ul><li id="one"></li><li id="two"></li></ul>"#)?;
    let mut c = card("card");

    let one = doc.locate("one").unwrap();
    c.render(&mut doc, one, false)?;
    let two = doc.locate("two").unwrap();
    c.render(&mut doc, two, false)?;

    let html = doc.to_html();
    assert_eq!(html.matches(c.id()).count(), 1);
    assert_eq!(
        html,
        format!(
            r#"<ul><li id="one"></li><li id="two"><article id="{}"><h1>untitled</h1></article></li></ul>"#,
            c.id()
        )
    );
    Ok(())
}

#[test]
fn test_re_render_picks_up_new_options() -> anyhow::Result<()> {
    let mut doc = MemoryDocument::parse(r#"<div id="slot"></div>"#)?;
    let slot = doc.locate("slot").unwrap();
    let mut c = card("card");
    c.set_option("title", "First");
    c.render(&mut doc, slot, true)?;

    c.set_option("title", "Second");
    c.re_render(&mut doc)?;

    let anchor = c.container(&doc)?;
    assert_eq!(doc.text_content(anchor), "Second");
    assert_eq!(doc.metadata(anchor, "component"), Some(c.id()));
    assert_eq!(doc.to_html().matches("<article").count(), 1);
    Ok(())
}

#[test]
fn test_re_render_unrendered_fails_without_side_effects() {
    let fired = Rc::new(RefCell::new(Vec::<String>::new()));
    let mut doc = MemoryDocument::parse("<p>static</p>").unwrap();
    let mut c = card("card");
    for event in [events::COMPILED, events::BEFORE_RE_RENDER, events::RENDERED] {
        let fired = fired.clone();
        c.on(event, move |_: &Component, _: &EventArgs| {
            fired.borrow_mut().push(event.to_string())
        });
    }

    for _ in 0..3 {
        let err = c.re_render(&mut doc).unwrap_err();
        assert_eq!(err, ComponentError::NotRendered(c.id().to_string()));
    }

    assert!(fired.borrow().is_empty());
    assert!(!c.is_rendered());
    assert_eq!(doc.to_html(), "<p>static</p>");
}

#[test]
fn test_re_render_after_external_detach_keeps_state() -> anyhow::Result<()> {
    let mut doc = MemoryDocument::parse(r#"<div id="slot"></div>"#)?;
    let slot = doc.locate("slot").unwrap();
    let mut c = card("card");
    c.render(&mut doc, slot, true)?;

    let anchor = c.container(&doc)?;
    doc.detach(anchor)?;

    let err = c.re_render(&mut doc).unwrap_err();
    assert!(matches!(err, ComponentError::ContainerNotFound { .. }));
    assert!(c.is_rendered());
    Ok(())
}

fn anchors_with_id(doc: &MemoryDocument, id: &str) -> usize {
    doc.select("id")
        .into_iter()
        .filter(|&node| doc.attribute(node, "id") == Some(id))
        .count()
}

/// A rejected replace keeps the old anchor, so the component stays rendered
#[test]
fn test_re_render_with_bad_markup_keeps_old_anchor() -> anyhow::Result<()> {
    let mut doc = MemoryDocument::parse(r#"<div id="a"></div><div id="b"></div>"#)?;
    let a = doc.locate("a").unwrap();
    let mut c = card("card");
    c.render(&mut doc, a, true)?;
    let id = c.id().to_string();
    let before = doc.to_html();

    c.set_render_handler(format!(r#"<div id="{id}"><p></div>"#));
    let err = c.re_render(&mut doc).unwrap_err();

    assert!(matches!(err, ComponentError::Dom(_)));
    assert!(c.is_rendered());
    assert_eq!(doc.to_html(), before);

    c.set_render_handler(format!(r#"<section id="{id}"></section>"#));
    let b = doc.locate("b").unwrap();
    c.render(&mut doc, b, true)?;

    assert_eq!(anchors_with_id(&doc, &id), 1);
    assert_eq!(doc.to_html(), format!(r#"<section id="{id}"></section>"#));
    Ok(())
}

/// Content without the id removes the anchor, so the component is unrendered
#[test]
fn test_re_render_without_id_unrenders() -> anyhow::Result<()> {
    let mut doc = MemoryDocument::parse(r#"<div id="slot"></div>"#)?;
    let slot = doc.locate("slot").unwrap();
    let mut c = card("card");
    c.render(&mut doc, slot, true)?;

    c.set_render_handler("<p>detached</p>");
    let err = c.re_render(&mut doc).unwrap_err();

    assert!(matches!(err, ComponentError::ContainerNotFound { .. }));
    assert!(!c.is_rendered());
    assert!(c.find_container(&doc).is_none());
    assert_eq!(doc.to_html(), "<p>detached</p>");
    Ok(())
}

#[test]
fn test_lifecycle_history_records_cycle() -> anyhow::Result<()> {
    let mut doc = MemoryDocument::parse(r#"<div id="slot"></div>"#)?;
    let slot = doc.locate("slot").unwrap();
    let mut c = card("card");

    c.render(&mut doc, slot, true)?;
    c.re_render(&mut doc)?;
    c.remove(&mut doc)?;

    let states: Vec<LifecycleState> = c.lifecycle_history().iter().map(|(_, _, to)| *to).collect();
    assert_eq!(
        states,
        vec![
            LifecycleState::Rendered,
            LifecycleState::Unrendered,
            LifecycleState::Rendered,
            LifecycleState::Unrendered,
        ]
    );
    Ok(())
}

#[test]
fn test_trigger_passes_values() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut c = Component::new("c");
    let s = seen.clone();
    c.on("selected", move |c: &Component, args: &EventArgs| {
        s.borrow_mut().push((c.name().to_string(), args.values().to_vec()))
    });

    c.trigger("selected", vec![json!(1), json!("two")]);
    c.trigger("ignored", vec![]);

    assert_eq!(
        *seen.borrow(),
        vec![("c".to_string(), vec![json!(1), json!("two")])]
    );
}
