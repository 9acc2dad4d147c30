//! Store Sync Demo
//!
//! Fills a small form from holder markup, edits a field and pushes the
//! values into a shared store.
//!
//! Run with:
//! `RUST_LOG=debug cargo run -p weft_component --example store_sync`

use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use weft_component::{Component, Definition, MemoryStore, Registry, Scope, SharedStore};
use weft_core::Options;
use weft_dom::MemoryDocument;

const FORM: &str = r#"<form>
<div data-comp="TextField" data-comp-name="name" data-comp-store="profile" data-comp-op-placeholder="Your name"></div>
<div data-comp="NumberField" data-comp-name="age" data-comp-store="profile" data-comp-options="ageOptions"></div>
</form>"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut registry = Registry::new();
    registry.define(
        "TextField",
        Definition::new()
            .option("value", "")
            .option("placeholder", "")
            .render_with(|c: &Component| {
                format!(
                    r#"<input id="{}" value="{}" placeholder="{}">"#,
                    c.id(),
                    c.options()["value"].as_str().unwrap_or(""),
                    c.options()["placeholder"].as_str().unwrap_or("")
                )
            })
            .value_with(|c: &Component| c.options()["value"].clone()),
        None,
    )?;
    registry.define(
        "NumberField",
        Definition::new()
            .option("min", 0)
            .value_with(|c: &Component| c.options()["value"].clone()),
        Some("TextField"),
    )?;

    let store = MemoryStore::shared("profile");
    store.on_change(|store: &MemoryStore, pushed: &Options| {
        tracing::info!(?pushed, data = ?store.data(), "profile changed");
    });
    let shared: SharedStore = store.clone();

    let scope = Scope::new()
        .with_store("profile", shared)
        .with_options("ageOptions", json!({"value": 0, "min": 18}));

    let mut doc = MemoryDocument::parse(FORM)?;
    let mut fields = registry.fill_all(&mut doc, &scope)?;
    println!("{}", doc.to_html());

    for field in &mut fields {
        let value = match field.name() {
            "name" => json!("Kim"),
            "age" => json!(34),
            _ => Value::Null,
        };
        field.set_option("value", value);
        field.re_render(&mut doc)?;
        field.push_to_stores(false)?;
    }

    println!("{}", doc.to_html());
    println!("{}", Value::Object(store.data()));
    Ok(())
}
