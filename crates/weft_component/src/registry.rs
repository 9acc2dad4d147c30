//! Type registry and factory
//!
//! Holds native classes (constructors) and declarative definitions side by
//! side. A fresh [`Registry`] per test gives full isolation; nothing here is
//! global except the id counter.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use weft_core::{options_from_value, IdAllocator, WeftConfig};

use crate::component::Component;
use crate::definition::Definition;
use crate::{ComponentError, Result};

/// Name of the built-in native class
pub const BASE_CLASS: &str = "Component";

/// Native class constructor: builds an instance with the given name
pub type Constructor = Rc<dyn Fn(&str, &IdAllocator) -> Component>;

/// Registry of native classes and declarative definitions
pub struct Registry {
    classes: IndexMap<String, Constructor>,
    defined: IndexMap<String, Rc<Definition>>,
    ids: IdAllocator,
    pub(crate) config: WeftConfig,
}

impl Registry {
    /// Registry with the built-in `Component` class and default configuration
    pub fn new() -> Self {
        Self::with_config(WeftConfig::default())
    }

    /// Registry with the built-in `Component` class
    pub fn with_config(config: WeftConfig) -> Self {
        let mut registry = Self::bare(config);
        registry.register(BASE_CLASS, |name: &str, ids: &IdAllocator| {
            Component::with_allocator(name, ids)
        });
        registry
    }

    /// Registry with nothing registered
    pub fn bare(config: WeftConfig) -> Self {
        Self {
            classes: IndexMap::new(),
            defined: IndexMap::new(),
            ids: IdAllocator::new(config.ids.prefix.clone()),
            config,
        }
    }

    pub fn config(&self) -> &WeftConfig {
        &self.config
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    // =========================================================================
    // Native classes
    // =========================================================================

    /// Register a native class, replacing any previous one of that name
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&str, &IdAllocator) -> Component + 'static,
    {
        let name = name.into();
        tracing::debug!(class = %name, "registered native class");
        self.classes.insert(name, Rc::new(constructor));
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.classes.shift_remove(name).is_some()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Registered class names, in registration order
    pub fn classes(&self) -> Vec<String> {
        self.classes.keys().cloned().collect()
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    /// Add or replace a declarative definition
    ///
    /// `base` overrides the definition's own `base_on`. The effective base
    /// must already be registered or defined, the name must not belong to a
    /// native class, and the base chain must not lead back to `name`.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        mut definition: Definition,
        base: Option<&str>,
    ) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;

        if let Some(base) = base {
            definition.base_on = Some(base.to_string());
        }

        if let Some(base) = definition.base_on.as_deref() {
            if !self.is_known(base) {
                return Err(ComponentError::UnknownBase(base.to_string()));
            }
        }
        if self.is_registered(&name) {
            return Err(ComponentError::NameCollision(name));
        }
        if let Some(base) = definition.base_on.as_deref() {
            self.check_acyclic(&name, base)?;
        }

        tracing::debug!(definition = %name, base = ?definition.base_on, "defined component type");
        self.defined.insert(name, Rc::new(definition));
        Ok(())
    }

    pub fn undefine(&mut self, name: &str) -> bool {
        self.defined.shift_remove(name).is_some()
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.defined.contains_key(name)
    }

    /// Defined type names, in definition order
    pub fn defined(&self) -> Vec<String> {
        self.defined.keys().cloned().collect()
    }

    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.defined.get(name).map(|d| d.as_ref())
    }

    /// Whether `name` is a class or a definition
    pub fn is_known(&self, name: &str) -> bool {
        self.is_registered(name) || self.is_defined(name)
    }

    fn check_acyclic(&self, name: &str, base: &str) -> Result<()> {
        let mut current = Some(base);
        while let Some(level) = current {
            if level == name {
                return Err(ComponentError::CyclicBase {
                    name: name.to_string(),
                    base: base.to_string(),
                });
            }
            current = self.defined.get(level).and_then(|d| d.base());
        }
        Ok(())
    }

    // =========================================================================
    // Factory
    // =========================================================================

    /// Build an instance of `type_name`
    ///
    /// `options` must be a mapping when given; it is merged last, so it wins
    /// over every declarative level.
    pub fn factory(
        &self,
        type_name: &str,
        name: &str,
        options: Option<Value>,
    ) -> Result<Component> {
        validate_name(name)?;
        let options = match options {
            Some(Value::Null) | None => None,
            Some(value) => Some(options_from_value(value)?),
        };

        let mut component = self.build(type_name, name)?;
        if let Some(options) = options {
            component.option(&options);
        }

        tracing::debug!(type_name, name, id = %component.id(), "built component");
        Ok(component)
    }

    fn build(&self, type_name: &str, name: &str) -> Result<Component> {
        if let Some(constructor) = self.classes.get(type_name) {
            let mut component = constructor(name, &self.ids);
            component.set_name(name);
            component.set_type_name(type_name);
            return Ok(component);
        }

        let definition = self
            .defined
            .get(type_name)
            .ok_or_else(|| ComponentError::UnknownType(type_name.to_string()))?;

        let mut component = match definition.base() {
            Some(base) if !self.is_known(base) => {
                return Err(ComponentError::UnknownBase(base.to_string()))
            }
            Some(base) => self.build(base, name)?,
            None => Component::with_allocator(name, &self.ids),
        };

        definition.apply(&mut component);
        component.set_type_name(type_name);
        tracing::trace!(type_name, base = ?definition.base(), "applied definition level");
        Ok(component)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("classes", &self.classes.keys().collect::<Vec<_>>())
            .field("defined", &self.defined)
            .field("ids", &self.ids)
            .field("config", &self.config)
            .finish()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ComponentError::InvalidName(name.to_string()));
    }
    Ok(())
}
