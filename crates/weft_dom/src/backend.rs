//! Collaborator contracts used by components

use std::fmt::Debug;

use crate::Result;

/// The DOM operations a component needs to render itself
///
/// An anchor is the backend's handle to a location in the document. A
/// component's anchor is the element whose `id` equals the component id.
pub trait RenderBackend {
    type Anchor: Copy + Eq + Debug;

    /// Find the attached element carrying `id`
    fn locate(&self, id: &str) -> Option<Self::Anchor>;

    /// Replace the anchor itself with `content`
    fn replace_anchor(&mut self, anchor: Self::Anchor, content: &str) -> Result<()>;

    /// Replace only the anchor's children with `content`
    fn set_content(&mut self, anchor: Self::Anchor, content: &str) -> Result<()>;

    /// Attach a metadata entry to the anchor
    fn attach_metadata(&mut self, anchor: Self::Anchor, key: &str, value: &str) -> Result<()>;

    /// Remove the anchor and its subtree from the document
    fn detach(&mut self, anchor: Self::Anchor) -> Result<()>;
}

/// Attribute access for declarative holders
pub trait HolderSource: RenderBackend {
    /// All attributes of the element, in source order
    fn attributes(&self, anchor: Self::Anchor) -> Result<Vec<(String, String)>>;

    /// Set (or overwrite) one attribute
    fn set_attribute(&mut self, anchor: Self::Anchor, name: &str, value: &str) -> Result<()>;

    /// Attached elements carrying `attribute`, in document order
    fn select(&self, attribute: &str) -> Vec<Self::Anchor>;
}
