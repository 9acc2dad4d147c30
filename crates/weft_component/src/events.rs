//! Component event names and payloads

use serde_json::Value;
use std::fmt;
use weft_core::Listener;

use crate::component::Component;
use crate::store::SharedStore;

/// Options were merged
pub const OPTION_CHANGED: &str = "option_changed";
/// Content was compiled; carries the content
pub const COMPILED: &str = "compiled";
/// The component reached the rendered state (also fired on re-render)
pub const RENDERED: &str = "rendered";
/// A re-render is about to replace the anchor
pub const BEFORE_RE_RENDER: &str = "before_re_render";
/// A re-render finished
pub const RE_RENDERED: &str = "re-rendered";
/// The anchor is about to be detached
pub const BEFORE_REMOVE: &str = "before_remove";
/// The anchor was detached
pub const REMOVED: &str = "removed";
/// A store was connected; carries key and store
pub const CONNECT_STORE: &str = "connect_store";
/// A store was disconnected; carries key and store
pub const DISCONNECT_STORE: &str = "disconnect_store";

/// Listener bound to a component
pub type ComponentListener = Listener<Component, EventArgs>;

/// Payload passed to component listeners
#[derive(Clone, Default)]
pub enum EventArgs {
    #[default]
    None,
    Content(String),
    Store {
        key: String,
        store: SharedStore,
    },
    Values(Vec<Value>),
}

impl EventArgs {
    /// Compiled content, for `compiled`
    pub fn content(&self) -> Option<&str> {
        match self {
            EventArgs::Content(content) => Some(content),
            _ => None,
        }
    }

    /// Store key, for `connect_store` / `disconnect_store`
    pub fn store_key(&self) -> Option<&str> {
        match self {
            EventArgs::Store { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn store(&self) -> Option<&SharedStore> {
        match self {
            EventArgs::Store { store, .. } => Some(store),
            _ => None,
        }
    }

    /// Arguments of a custom event
    pub fn values(&self) -> &[Value] {
        match self {
            EventArgs::Values(values) => values,
            _ => &[],
        }
    }
}

impl fmt::Debug for EventArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventArgs::None => f.write_str("None"),
            EventArgs::Content(content) => f.debug_tuple("Content").field(content).finish(),
            EventArgs::Store { key, .. } => f.debug_struct("Store").field("key", key).finish(),
            EventArgs::Values(values) => f.debug_tuple("Values").field(values).finish(),
        }
    }
}
