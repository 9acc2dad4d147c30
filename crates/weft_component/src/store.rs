//! Store sync channel
//!
//! A store is an external data sink identified by its key. Components push
//! their value into every connected store as a single-field mapping; the
//! store decides what `change` does with it.
//!
//! Stores are shared and may be pushed into again while a change is being
//! dispatched, so the entry points take `&self` and implementations keep
//! their own interior mutability.

use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use weft_core::{merge, Emitter, Options};

use crate::component::Component;

/// The store contract components push into
pub trait Store {
    /// Stable key the store is registered under
    fn store_key(&self) -> String;

    /// Apply data and notify observers
    fn change(&self, data: &Options);

    /// Apply data without notifying observers
    fn change_silent(&self, data: &Options);
}

/// Stores are shared; components never own their lifetime
pub type SharedStore = Rc<dyn Store>;

/// Transform applied to a value before it is pushed
pub type StoreDataHandler = Rc<dyn Fn(Value, &Component) -> Value>;

/// Name of the event a [`MemoryStore`] fires on a noisy change
pub const STORE_CHANGED: &str = "change";

/// A mapping-backed store
///
/// Pushed data is deep-merged into the store's mapping. `change` fires
/// [`STORE_CHANGED`] with the pushed data, `change_silent` does not. No
/// borrow is held while listeners run, so a listener may push again.
pub struct MemoryStore {
    key: String,
    data: RefCell<Options>,
    events: RefCell<Emitter<MemoryStore, Options>>,
}

impl MemoryStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            data: RefCell::new(Options::new()),
            events: RefCell::new(Emitter::new()),
        }
    }

    /// Create a store already wrapped for sharing
    pub fn shared(key: impl Into<String>) -> Rc<Self> {
        Rc::new(Self::new(key))
    }

    /// Copy of the current data
    pub fn data(&self) -> Options {
        self.data.borrow().clone()
    }

    pub fn get(&self, field: &str) -> Option<Value> {
        self.data.borrow().get(field).cloned()
    }

    /// Listen for noisy changes
    pub fn on_change<F>(&self, listener: F)
    where
        F: Fn(&MemoryStore, &Options) + 'static,
    {
        self.events.borrow_mut().on(STORE_CHANGED, listener);
    }
}

impl Store for MemoryStore {
    fn store_key(&self) -> String {
        self.key.clone()
    }

    fn change(&self, data: &Options) {
        merge(&mut self.data.borrow_mut(), data);
        tracing::trace!(store = %self.key, "store changed");
        let listeners = self.events.borrow().snapshot(STORE_CHANGED);
        for listener in listeners {
            listener(self, data);
        }
    }

    fn change_silent(&self, data: &Options) {
        merge(&mut self.data.borrow_mut(), data);
        tracing::trace!(store = %self.key, "store changed silently");
    }
}
