//! Component instances
//!
//! A [`Component`] owns its identity, options, handlers, listeners and
//! connected stores. Rendering goes through a [`RenderBackend`]; the
//! component finds its anchor by looking up its own id.
//!
//! Lifecycle notifications, in order:
//! - `render`: (`before_remove`, `removed` if already rendered), `compiled`, `rendered`
//! - `re_render`: `compiled`, `before_re_render`, `rendered`, `re-rendered`
//! - `remove`: `before_remove`, `removed`

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use weft_core::{merge, Emitter, IdAllocator, Options};
use weft_dom::RenderBackend;

use crate::events::{self, ComponentListener, EventArgs};
use crate::lifecycle::{Lifecycle, LifecycleEvent, LifecycleState};
use crate::store::{SharedStore, StoreDataHandler};
use crate::{ComponentError, Result};

/// Metadata key linking an anchor back to its component id
pub const COMPONENT_METADATA_KEY: &str = "component";

/// Method name that overrides [`Component::handle_holder`]
pub const HANDLE_HOLDER_METHOD: &str = "handle_holder";

/// Property key mapped onto the store field
pub const STORE_FIELD_PROPERTY: &str = "store_field";

/// Property key that sets literal render content
pub const RENDER_HANDLER_PROPERTY: &str = "render_handler";

/// Text compiled when no render handler is set
pub const NULL_CONTENT: &str = "null";

pub type RenderFn = Rc<dyn Fn(&Component) -> String>;
pub type ValueFn = Rc<dyn Fn(&Component) -> Value>;
pub type MethodFn = Rc<dyn Fn(&mut Component, &[Value]) -> Value>;
pub type InitFn = Rc<dyn Fn(&mut Component)>;

/// What a component renders: a function of the component or fixed content
#[derive(Clone)]
pub enum RenderHandler {
    Literal(String),
    Func(RenderFn),
}

impl RenderHandler {
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Component) -> String + 'static,
    {
        RenderHandler::Func(Rc::new(f))
    }

    fn render(&self, component: &Component) -> String {
        match self {
            RenderHandler::Literal(content) => content.clone(),
            RenderHandler::Func(f) => f(component),
        }
    }
}

impl From<&str> for RenderHandler {
    fn from(content: &str) -> Self {
        RenderHandler::Literal(content.to_string())
    }
}

impl From<String> for RenderHandler {
    fn from(content: String) -> Self {
        RenderHandler::Literal(content)
    }
}

impl fmt::Debug for RenderHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderHandler::Literal(content) => f.debug_tuple("Literal").field(content).finish(),
            RenderHandler::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// A live component instance
pub struct Component {
    id: String,
    name: String,
    type_name: String,
    options: Options,
    properties: Options,
    render_handler: Option<RenderHandler>,
    value_handler: Option<ValueFn>,
    lifecycle: Lifecycle,
    stores: IndexMap<String, SharedStore>,
    store_field: Option<String>,
    store_data_handler: Option<StoreDataHandler>,
    methods: FxHashMap<String, MethodFn>,
    events: Emitter<Component, EventArgs>,
}

impl Component {
    /// Create a bare component with a default-prefixed id
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_allocator(name, &IdAllocator::default())
    }

    /// Create a bare component, drawing its id from `ids`
    pub fn with_allocator(name: impl Into<String>, ids: &IdAllocator) -> Self {
        Self {
            id: ids.next_id(),
            name: name.into(),
            type_name: "Component".to_string(),
            options: Options::new(),
            properties: Options::new(),
            render_handler: None,
            value_handler: None,
            lifecycle: Lifecycle::new(),
            stores: IndexMap::new(),
            store_field: None,
            store_data_handler: None,
            methods: FxHashMap::default(),
            events: Emitter::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Registry name this instance was built from
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn set_type_name(&mut self, type_name: &str) {
        self.type_name = type_name.to_string();
    }

    // =========================================================================
    // Options and properties
    // =========================================================================

    /// Deep-merge a partial mapping into the options
    pub fn option(&mut self, partial: &Options) -> &mut Self {
        merge(&mut self.options, partial);
        self.emit(events::OPTION_CHANGED, EventArgs::None);
        self
    }

    /// Merge a single key
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let mut partial = Options::new();
        partial.insert(key.into(), value.into());
        self.option(&partial)
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Deep copy of the options
    pub fn get_options(&self) -> Options {
        self.options.clone()
    }

    pub fn option_value(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Assign a property
    ///
    /// `store_field` sets the store field and `render_handler` sets literal
    /// render content; `null` clears either.
    pub fn set_property(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match key.as_str() {
            STORE_FIELD_PROPERTY => self.store_field = property_text(value),
            RENDER_HANDLER_PROPERTY => {
                self.render_handler = property_text(value).map(RenderHandler::Literal)
            }
            _ => {
                self.properties.insert(key, value);
            }
        }
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    pub fn set_render_handler(&mut self, handler: impl Into<RenderHandler>) -> &mut Self {
        self.render_handler = Some(handler.into());
        self
    }

    pub fn set_value_handler<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&Component) -> Value + 'static,
    {
        self.value_handler = Some(Rc::new(handler));
        self
    }

    pub(crate) fn set_value_fn(&mut self, handler: ValueFn) {
        self.value_handler = Some(handler);
    }

    pub fn has_render_handler(&self) -> bool {
        self.render_handler.is_some()
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Register a listener
    pub fn on<F>(&mut self, event: impl Into<String>, listener: F) -> &mut Self
    where
        F: Fn(&Component, &EventArgs) + 'static,
    {
        self.events.on(event, listener);
        self
    }

    pub fn add_listener(&mut self, event: impl Into<String>, listener: ComponentListener) {
        self.events.add(event, listener);
    }

    /// Drop all listeners of `event`
    pub fn off(&mut self, event: &str) -> &mut Self {
        self.events.off(event);
        self
    }

    pub(crate) fn events_mut(&mut self) -> &mut Emitter<Component, EventArgs> {
        &mut self.events
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.events.listener_count(event)
    }

    /// Emit a custom event with JSON arguments
    pub fn trigger(&self, event: &str, args: Vec<Value>) {
        self.emit(event, EventArgs::Values(args));
    }

    fn emit(&self, event: &str, args: EventArgs) {
        self.events.emit(self, event, &args);
    }

    // =========================================================================
    // Methods
    // =========================================================================

    /// Bind a named method, replacing any previous one
    pub fn define_method<F>(&mut self, name: impl Into<String>, method: F) -> &mut Self
    where
        F: Fn(&mut Component, &[Value]) -> Value + 'static,
    {
        self.methods.insert(name.into(), Rc::new(method));
        self
    }

    pub(crate) fn bind_method(&mut self, name: &str, method: MethodFn) {
        self.methods.insert(name.to_string(), method);
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Call a bound method
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value> {
        let method = self
            .methods
            .get(name)
            .cloned()
            .ok_or_else(|| ComponentError::UnknownMethod {
                id: self.id.clone(),
                method: name.to_string(),
            })?;
        Ok(method(self, args))
    }

    /// Hook run with the holder's attributes before a holder render
    ///
    /// Does nothing unless a `handle_holder` method is bound.
    pub fn handle_holder(&mut self, holder: &Options) {
        if let Some(method) = self.methods.get(HANDLE_HOLDER_METHOD).cloned() {
            method(self, &[Value::Object(holder.clone())]);
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn is_rendered(&self) -> bool {
        self.lifecycle.is_rendered()
    }

    pub fn lifecycle_history(&self) -> &[(LifecycleState, LifecycleEvent, LifecycleState)] {
        self.lifecycle.history()
    }

    /// Compute content and fire `compiled`
    ///
    /// Without a render handler the content is [`NULL_CONTENT`].
    pub fn compile(&self) -> String {
        let content = match &self.render_handler {
            Some(handler) => handler.render(self),
            None => {
                tracing::warn!(id = %self.id, name = %self.name, "compiling without a render handler");
                NULL_CONTENT.to_string()
            }
        };
        self.emit(events::COMPILED, EventArgs::Content(content.clone()));
        content
    }

    /// Like [`compile`](Self::compile), failing when no render handler is set
    pub fn compile_strict(&self) -> Result<String> {
        if self.render_handler.is_none() {
            return Err(ComponentError::MissingRenderHandler(self.id.clone()));
        }
        Ok(self.compile())
    }

    /// Render into `target`
    ///
    /// With `replace` the target element is replaced by the content, otherwise
    /// only its children are. A rendered component is removed first.
    pub fn render<B: RenderBackend>(
        &mut self,
        dom: &mut B,
        target: B::Anchor,
        replace: bool,
    ) -> Result<&mut Self> {
        if self.is_rendered() {
            self.remove(dom)?;
        }

        let content = self.compile();
        if replace {
            dom.replace_anchor(target, &content)?;
        } else {
            dom.set_content(target, &content)?;
        }

        let anchor = self.container(dom)?;
        dom.attach_metadata(anchor, COMPONENT_METADATA_KEY, &self.id)?;
        self.mark_rendered();

        tracing::debug!(id = %self.id, name = %self.name, replace, "rendered");
        Ok(self)
    }

    /// Recompile and swap the current anchor
    ///
    /// Fails with `NotRendered` before touching anything if the component is
    /// not rendered, and with `ContainerNotFound` before any notification if
    /// the anchor vanished. The state only leaves `Rendered` once the backend
    /// accepted the new content: a rejected replace keeps the old anchor and
    /// the component rendered, content without the id leaves it unrendered.
    pub fn re_render<B: RenderBackend>(&mut self, dom: &mut B) -> Result<&mut Self> {
        if !self.is_rendered() {
            return Err(ComponentError::NotRendered(self.id.clone()));
        }

        let content = self.compile();
        let anchor = self.container(dom)?;

        self.emit(events::BEFORE_RE_RENDER, EventArgs::None);
        dom.replace_anchor(anchor, &content)?;
        self.lifecycle.send(LifecycleEvent::Swap);

        let anchor = self.container(dom)?;
        dom.attach_metadata(anchor, COMPONENT_METADATA_KEY, &self.id)?;
        self.mark_rendered();
        self.emit(events::RE_RENDERED, EventArgs::None);

        tracing::debug!(id = %self.id, name = %self.name, "re-rendered");
        Ok(self)
    }

    /// Detach the anchor; a no-op when there is none
    pub fn remove<B: RenderBackend>(&mut self, dom: &mut B) -> Result<&mut Self> {
        let Some(anchor) = self.find_container(dom) else {
            tracing::trace!(id = %self.id, "remove: no anchor");
            return Ok(self);
        };

        self.emit(events::BEFORE_REMOVE, EventArgs::None);
        dom.detach(anchor)?;
        self.lifecycle.send(LifecycleEvent::Unmount);
        self.emit(events::REMOVED, EventArgs::None);

        tracing::debug!(id = %self.id, name = %self.name, "removed");
        Ok(self)
    }

    /// The anchor element, failing when absent
    pub fn container<B: RenderBackend>(&self, dom: &B) -> Result<B::Anchor> {
        self.find_container(dom)
            .ok_or_else(|| ComponentError::ContainerNotFound {
                id: self.id.clone(),
                name: self.name.clone(),
            })
    }

    /// The anchor element, if present
    pub fn find_container<B: RenderBackend>(&self, dom: &B) -> Option<B::Anchor> {
        dom.locate(&self.id)
    }

    fn mark_rendered(&mut self) {
        self.lifecycle.send(LifecycleEvent::Mount);
        self.emit(events::RENDERED, EventArgs::None);
    }

    /// Current value, `null` without a value handler
    pub fn get_value(&self) -> Value {
        match &self.value_handler {
            Some(handler) => handler(self),
            None => Value::Null,
        }
    }

    // =========================================================================
    // Stores
    // =========================================================================

    pub fn store_field(&self) -> Option<&str> {
        self.store_field.as_deref()
    }

    pub fn set_store_field(&mut self, field: impl Into<String>) -> &mut Self {
        self.store_field = Some(field.into());
        self
    }

    pub fn set_store_data_handler<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(Value, &Component) -> Value + 'static,
    {
        self.store_data_handler = Some(Rc::new(handler));
        self
    }

    /// Connect a store under its own key, replacing any store with that key
    pub fn connect_store(&mut self, store: SharedStore) -> &mut Self {
        let key = store.store_key();
        self.stores.insert(key.clone(), store.clone());
        tracing::debug!(id = %self.id, store = %key, "connected store");
        self.emit(events::CONNECT_STORE, EventArgs::Store { key, store });
        self
    }

    pub fn disconnect_store(&mut self, store: &SharedStore) -> &mut Self {
        let key = store.store_key();
        self.stores.shift_remove(&key);
        tracing::debug!(id = %self.id, store = %key, "disconnected store");
        self.emit(
            events::DISCONNECT_STORE,
            EventArgs::Store {
                key,
                store: store.clone(),
            },
        );
        self
    }

    pub fn is_connected(&self, key: &str) -> bool {
        self.stores.contains_key(key)
    }

    /// Keys of connected stores, in connection order
    pub fn store_keys(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }

    /// Field the value is pushed under: store field, else name, else id
    pub fn push_field(&self) -> Option<&str> {
        [self.store_field.as_deref(), Some(self.name.as_str()), Some(self.id.as_str())]
            .into_iter()
            .flatten()
            .find(|field| !field.is_empty())
    }

    /// Push `{field: value}` into every connected store
    pub fn push_to_stores(&self, silent: bool) -> Result<()> {
        let field = self.push_field().ok_or(ComponentError::MissingField)?;
        if self.stores.is_empty() {
            return Ok(());
        }

        let mut value = self.get_value();
        if let Some(handler) = &self.store_data_handler {
            value = handler(value, self);
        }

        let mut data = Options::new();
        data.insert(field.to_string(), value);

        for (key, store) in &self.stores {
            if silent {
                store.change_silent(&data);
            } else {
                store.change(&data);
            }
            tracing::trace!(id = %self.id, store = %key, field, silent, "pushed");
        }
        Ok(())
    }
}

fn property_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Connect one store to many components
pub fn connect_store_all<'a, I>(store: &SharedStore, components: I)
where
    I: IntoIterator<Item = &'a mut Component>,
{
    for component in components {
        component.connect_store(store.clone());
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("options", &self.options)
            .field("properties", &self.properties)
            .field("render_handler", &self.render_handler)
            .field("rendered", &self.is_rendered())
            .field("stores", &self.stores.keys().collect::<Vec<_>>())
            .field("store_field", &self.store_field)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("events", &self.events)
            .finish()
    }
}
