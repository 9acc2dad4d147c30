//! Declarative component definitions
//!
//! A [`Definition`] is a recipe, not an instance. The registry materializes
//! it level by level: the base is built first, then each level overlays its
//! properties, options, handlers, listeners and methods.

use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use weft_core::Options;

use crate::component::{Component, InitFn, MethodFn, RenderHandler, ValueFn};
use crate::events::{ComponentListener, EventArgs};

/// Which inherited listeners a definition drops before adding its own
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ResetEvents {
    /// Keep everything inherited
    #[default]
    Keep,
    /// Drop every inherited listener
    All,
    /// Drop inherited listeners of these events only
    Only(Vec<String>),
}

/// A declarative component definition
#[derive(Clone, Default)]
pub struct Definition {
    pub(crate) base_on: Option<String>,
    pub(crate) init_handler: Option<InitFn>,
    pub(crate) options: Options,
    pub(crate) properties: Options,
    pub(crate) render_handler: Option<RenderHandler>,
    pub(crate) reset_events: ResetEvents,
    pub(crate) events: Vec<(String, ComponentListener)>,
    pub(crate) methods: Vec<(String, MethodFn)>,
    pub(crate) value_handler: Option<ValueFn>,
}

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend a registered class or another definition
    pub fn base_on(mut self, base: impl Into<String>) -> Self {
        self.base_on = Some(base.into());
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Deep-merge a whole mapping into this level's options
    pub fn with_options(mut self, options: &Options) -> Self {
        weft_core::merge(&mut self.options, options);
        self
    }

    /// Set a property on components built from this level
    ///
    /// `store_field` becomes the store field and `render_handler` becomes
    /// literal render content; other keys land in the property bag.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Fixed content or a [`RenderHandler`]
    pub fn render(mut self, handler: impl Into<RenderHandler>) -> Self {
        self.render_handler = Some(handler.into());
        self
    }

    pub fn render_with<F>(self, handler: F) -> Self
    where
        F: Fn(&Component) -> String + 'static,
    {
        self.render(RenderHandler::func(handler))
    }

    pub fn value_with<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Component) -> Value + 'static,
    {
        self.value_handler = Some(Rc::new(handler));
        self
    }

    /// Listener added on top of surviving inherited ones
    pub fn on<F>(mut self, event: impl Into<String>, listener: F) -> Self
    where
        F: Fn(&Component, &EventArgs) + 'static,
    {
        self.events.push((event.into(), Rc::new(listener)));
        self
    }

    /// Method bound on the instance, replacing an inherited one of the same name
    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&mut Component, &[Value]) -> Value + 'static,
    {
        self.methods.push((name.into(), Rc::new(method)));
        self
    }

    pub fn reset_events(mut self, reset: ResetEvents) -> Self {
        self.reset_events = reset;
        self
    }

    /// Hook run once the level is materialized
    pub fn init<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Component) + 'static,
    {
        self.init_handler = Some(Rc::new(handler));
        self
    }

    pub fn base(&self) -> Option<&str> {
        self.base_on.as_deref()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn properties(&self) -> &Options {
        &self.properties
    }

    /// Apply this level onto an instance built from its base
    pub(crate) fn apply(&self, component: &mut Component) {
        for (key, value) in &self.properties {
            component.set_property(key.clone(), value.clone());
        }

        component.option(&self.options);

        if let Some(handler) = &self.render_handler {
            component.set_render_handler(handler.clone());
        }
        if let Some(handler) = &self.value_handler {
            component.set_value_fn(handler.clone());
        }

        match &self.reset_events {
            ResetEvents::Keep => {}
            ResetEvents::All => component.events_mut().clear(),
            ResetEvents::Only(events) => component.events_mut().off_many(events),
        }
        for (event, listener) in &self.events {
            component.add_listener(event.clone(), listener.clone());
        }

        for (name, method) in &self.methods {
            component.bind_method(name, method.clone());
        }

        if let Some(init) = &self.init_handler {
            init(component);
        }
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("base_on", &self.base_on)
            .field("options", &self.options)
            .field("properties", &self.properties)
            .field("render_handler", &self.render_handler)
            .field("reset_events", &self.reset_events)
            .field(
                "events",
                &self.events.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field(
                "methods",
                &self.methods.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field("init_handler", &self.init_handler.is_some())
            .field("value_handler", &self.value_handler.is_some())
            .finish()
    }
}
