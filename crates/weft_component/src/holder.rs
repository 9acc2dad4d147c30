//! Holder fill bridge
//!
//! A holder is a placeholder element whose attributes describe a component:
//!
//! | attribute                   | meaning                                        |
//! |-----------------------------|------------------------------------------------|
//! | `<prefix>`                  | type name (falls back to the configured type)  |
//! | `<prefix>-name`, `data-name`, `name` | instance name, first present wins     |
//! | `<prefix>-options`          | JSON object literal or a named scope entry     |
//! | `<prefix>-op-<kebab-name>`  | one option field, only if the type declares it |
//! | `<prefix>-store`            | named scope store to connect                   |
//! | `<prefix>-init`             | named scope callback run before render         |
//! | `<prefix>-render-replace`   | replace the holder (default) or fill it        |
//!
//! Reading the attributes is a pure step ([`HolderSpec::from_attributes`]);
//! [`Registry::fill`] then builds, wires and renders the component.

use rustc_hash::FxHashMap;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use weft_core::config::HolderConfig;
use weft_core::{options_from_value, Options};
use weft_dom::{DomError, HolderSource};

use crate::component::{Component, InitFn};
use crate::registry::Registry;
use crate::store::SharedStore;
use crate::{ComponentError, Result};

/// Where a holder's options come from
#[derive(Clone, Debug, PartialEq)]
pub enum OptionsRef {
    /// Inline JSON
    Literal(Value),
    /// Name of a [`Scope`] entry
    Named(String),
}

/// Everything a holder's attributes say about its component
#[derive(Clone, Debug, PartialEq)]
pub struct HolderSpec {
    pub type_name: String,
    pub instance_name: Option<String>,
    pub options: Option<OptionsRef>,
    pub store_ref: Option<String>,
    pub init_ref: Option<String>,
    pub render_replace: Option<bool>,
    /// Option fields from `<prefix>-op-*`, under every key spelling
    pub custom_options: Options,
}

impl HolderSpec {
    pub fn from_attributes(attributes: &[(String, String)], config: &HolderConfig) -> Self {
        let prefix = config.attribute_prefix.as_str();
        let get = |suffix: &str| attribute(attributes, &format!("{prefix}{suffix}"));

        let type_name = get("")
            .filter(|value| !value.is_empty())
            .unwrap_or(config.fallback_type.as_str())
            .to_string();

        let instance_name = [
            get("-name"),
            attribute(attributes, "data-name"),
            attribute(attributes, "name"),
        ]
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .map(str::to_string);

        let options = get("-options").map(options_ref);
        let store_ref = get("-store").map(str::to_string);
        let init_ref = get("-init").map(str::to_string);
        let render_replace = get("-render-replace").map(is_truthy);

        let op_prefix = format!("{prefix}-op-");
        let mut custom_options = Options::new();
        for (key, value) in attributes {
            let Some(field) = key.strip_prefix(&op_prefix) else {
                continue;
            };
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            let value = decode_value(value);
            for spelling in key_spellings(field) {
                custom_options.insert(spelling, value.clone());
            }
        }

        Self {
            type_name,
            instance_name,
            options,
            store_ref,
            init_ref,
            render_replace,
            custom_options,
        }
    }
}

fn attribute<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn options_ref(raw: &str) -> OptionsRef {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str(trimmed) {
            return OptionsRef::Literal(value);
        }
    }
    OptionsRef::Named(raw.trim().to_string())
}

fn is_truthy(raw: &str) -> bool {
    !matches!(raw.trim(), "" | "false" | "0" | "null")
}

fn decode_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// `max-length` as `maxlength`, `maxLength` and `max_length`
fn key_spellings(kebab: &str) -> [String; 3] {
    let parts: Vec<&str> = kebab.split('-').filter(|part| !part.is_empty()).collect();

    let lower = parts.concat().to_lowercase();
    let snake = parts.join("_").to_lowercase();
    let mut camel = String::with_capacity(kebab.len());
    for (i, part) in parts.iter().enumerate() {
        let part = part.to_lowercase();
        if i == 0 {
            camel.push_str(&part);
            continue;
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            camel.extend(first.to_uppercase());
            camel.push_str(chars.as_str());
        }
    }

    [lower, camel, snake]
}

/// A named options entry
#[derive(Clone)]
pub enum OptionsSource {
    Value(Value),
    Func(Rc<dyn Fn() -> Value>),
}

impl OptionsSource {
    fn resolve(&self) -> Value {
        match self {
            OptionsSource::Value(value) => value.clone(),
            OptionsSource::Func(f) => f(),
        }
    }
}

/// Named options, stores and init callbacks a holder may refer to
#[derive(Clone, Default)]
pub struct Scope {
    options: FxHashMap<String, OptionsSource>,
    stores: FxHashMap<String, SharedStore>,
    inits: FxHashMap<String, InitFn>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, name: impl Into<String>, options: Value) -> Self {
        self.options.insert(name.into(), OptionsSource::Value(options));
        self
    }

    pub fn with_options_fn<F>(mut self, name: impl Into<String>, options: F) -> Self
    where
        F: Fn() -> Value + 'static,
    {
        self.options
            .insert(name.into(), OptionsSource::Func(Rc::new(options)));
        self
    }

    pub fn with_store(mut self, name: impl Into<String>, store: SharedStore) -> Self {
        self.stores.insert(name.into(), store);
        self
    }

    pub fn with_init<F>(mut self, name: impl Into<String>, init: F) -> Self
    where
        F: Fn(&mut Component) + 'static,
    {
        self.inits.insert(name.into(), Rc::new(init));
        self
    }

    fn options(&self, reference: &OptionsRef) -> Result<Options> {
        let value = match reference {
            OptionsRef::Literal(value) => value.clone(),
            OptionsRef::Named(name) => self
                .options
                .get(name)
                .ok_or_else(|| unresolved("options", name))?
                .resolve(),
        };
        Ok(options_from_value(value)?)
    }

    fn store(&self, name: &str) -> Result<SharedStore> {
        self.stores
            .get(name)
            .cloned()
            .ok_or_else(|| unresolved("store", name))
    }

    fn init(&self, name: &str) -> Result<InitFn> {
        self.inits
            .get(name)
            .cloned()
            .ok_or_else(|| unresolved("init", name))
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("options", &self.options.keys().collect::<Vec<_>>())
            .field("stores", &self.stores.keys().collect::<Vec<_>>())
            .field("inits", &self.inits.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn unresolved(kind: &'static str, name: &str) -> ComponentError {
    ComponentError::UnresolvedReference {
        kind,
        name: name.to_string(),
    }
}

impl Registry {
    /// Build and render the component a holder describes
    ///
    /// Order: factory, holder id, options, store, init, `handle_holder`,
    /// render. References are resolved before anything is built.
    pub fn fill<D: HolderSource>(
        &self,
        dom: &mut D,
        holder: D::Anchor,
        scope: &Scope,
    ) -> Result<Component> {
        self.fill_holder(dom, holder, scope).map_err(|err| {
            tracing::warn!(holder = ?holder, error = %err, "holder fill failed");
            err
        })
    }

    /// Fill every holder carrying the type attribute, in document order
    ///
    /// Holders swallowed by an earlier fill are skipped.
    pub fn fill_all<D: HolderSource>(&self, dom: &mut D, scope: &Scope) -> Result<Vec<Component>> {
        let holders = dom.select(&self.config.holder.attribute_prefix);
        let mut components = Vec::with_capacity(holders.len());
        for holder in holders {
            match dom.attributes(holder) {
                Err(DomError::UnknownNode(_)) => {
                    tracing::trace!(holder = ?holder, "holder no longer in document");
                    continue;
                }
                Err(err) => return Err(err.into()),
                Ok(_) => components.push(self.fill(dom, holder, scope)?),
            }
        }
        Ok(components)
    }

    fn fill_holder<D: HolderSource>(
        &self,
        dom: &mut D,
        holder: D::Anchor,
        scope: &Scope,
    ) -> Result<Component> {
        let attributes = dom.attributes(holder)?;
        let spec = HolderSpec::from_attributes(&attributes, &self.config.holder);

        if !self.is_known(&spec.type_name) {
            return Err(ComponentError::UnknownType(spec.type_name));
        }
        let mut options = match &spec.options {
            Some(reference) => scope.options(reference)?,
            None => Options::new(),
        };
        let store = spec.store_ref.as_deref().map(|s| scope.store(s)).transpose()?;
        let init = spec.init_ref.as_deref().map(|i| scope.init(i)).transpose()?;

        let name = spec
            .instance_name
            .clone()
            .unwrap_or_else(|| self.ids().next_id());
        let mut component = self.factory(&spec.type_name, &name, None)?;
        dom.set_attribute(holder, "id", component.id())?;

        for (key, value) in &spec.custom_options {
            if component.options().contains_key(key) {
                options.insert(key.clone(), value.clone());
            }
        }
        if !options.is_empty() {
            component.option(&options);
        }

        if let Some(store) = store {
            component.connect_store(store);
        }
        if let Some(init) = init {
            init(&mut component);
        }

        let holder_attributes: Options = attributes
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        component.handle_holder(&holder_attributes);

        let replace = spec.render_replace.unwrap_or(self.config.render.replace);
        component.render(dom, holder, replace)?;

        tracing::debug!(
            type_name = %spec.type_name,
            id = %component.id(),
            replace,
            "filled holder"
        );
        Ok(component)
    }
}
