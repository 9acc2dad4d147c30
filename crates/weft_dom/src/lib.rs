//! Weft DOM layer
//!
//! Components never touch a concrete DOM. They talk to a [`RenderBackend`]
//! (lookup by id, replace, set content, metadata, detach) and, for holder
//! scanning, to a [`HolderSource`] (attribute reads and writes).
//!
//! [`MemoryDocument`] implements both on top of a slotmap node tree. It is the
//! backend used for headless rendering and tests.

mod backend;
mod document;
mod error;
pub mod markup;

pub use backend::{HolderSource, RenderBackend};
pub use document::{MemoryDocument, NodeId};
pub use error::{DomError, Result};
pub use markup::{parse_fragment, MarkupNode};
