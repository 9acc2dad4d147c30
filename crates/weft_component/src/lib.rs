//! Weft Components
//!
//! Declarative UI components on top of a pluggable render backend:
//!
//! - **Instances**: [`Component`] with options, handlers, listeners and a
//!   render lifecycle
//! - **Registry**: native classes and declarative [`Definition`]s, with
//!   `base_on` inheritance resolved by [`Registry::factory`]
//! - **Stores**: push a component's value into connected [`Store`]s
//! - **Holders**: build components from placeholder element attributes
//!
//! # Example
//!
//! ```rust
//! use weft_component::{events, Definition, Registry};
//!
//! let mut registry = Registry::new();
//! registry
//!     .define("Greeting", Definition::new().render("Hi"), None)
//!     .unwrap();
//!
//! let mut greeting = registry.factory("Greeting", "g1", None).unwrap();
//! greeting.on(events::COMPILED, |_, args| assert_eq!(args.content(), Some("Hi")));
//!
//! assert_eq!(greeting.compile(), "Hi");
//! ```

pub mod component;
pub mod definition;
mod error;
pub mod events;
pub mod holder;
pub mod lifecycle;
pub mod registry;
pub mod store;

pub use component::{connect_store_all, Component, RenderHandler};
pub use definition::{Definition, ResetEvents};
pub use error::{ComponentError, Result};
pub use events::EventArgs;
pub use holder::{HolderSpec, OptionsRef, Scope};
pub use lifecycle::{LifecycleEvent, LifecycleState};
pub use registry::{Registry, BASE_CLASS};
pub use store::{MemoryStore, SharedStore, Store};
