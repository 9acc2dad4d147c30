//! Headless in-memory document
//!
//! A node tree stored in a slotmap. Every live node is attached: replacing or
//! detaching a node drops its whole subtree, so stale handles simply stop
//! resolving.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::fmt::Write as _;

use crate::backend::{HolderSource, RenderBackend};
use crate::markup::{escape_attribute, is_void, parse_fragment, MarkupNode};
use crate::{DomError, Result};

new_key_type! {
    /// Handle to a node of a [`MemoryDocument`]
    pub struct NodeId;
}

#[derive(Clone, Debug)]
enum NodeKind {
    Root,
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    metadata: FxHashMap<String, String>,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            metadata: FxHashMap::default(),
        }
    }
}

/// An in-memory document implementing the render and holder contracts
#[derive(Clone, Debug)]
pub struct MemoryDocument {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl MemoryDocument {
    /// Create an empty document
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(NodeKind::Root, None));
        Self { nodes, root }
    }

    /// Create a document whose root holds `markup`
    pub fn parse(markup: &str) -> Result<Self> {
        let mut doc = Self::new();
        let root = doc.root;
        doc.append_markup(root, markup)?;
        Ok(doc)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Parse `markup` and append it to `parent`'s children
    pub fn append_markup(&mut self, parent: NodeId, markup: &str) -> Result<SmallVec<[NodeId; 4]>> {
        self.container(parent)?;
        let fragment = parse_fragment(markup)?;
        let index = self.nodes[parent].children.len();
        Ok(self.insert_fragment(parent, index, fragment))
    }

    /// Whether the handle refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[self.root].children.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn metadata(&self, id: NodeId, key: &str) -> Option<&str> {
        self.nodes.get(id)?.metadata.get(key).map(String::as_str)
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in std::iter::once(id).chain(self.descendants(id)) {
            if let Some(Node {
                kind: NodeKind::Text(text),
                ..
            }) = self.nodes.get(node)
            {
                out.push_str(text);
            }
        }
        out
    }

    /// Serialize the node including its own tag
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id);
        out
    }

    /// Serialize the node's children
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(&mut out, child);
        }
        out
    }

    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        self.inner_html(self.root)
    }

    fn write_node(&self, out: &mut String, id: NodeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Root => {
                for &child in &node.children {
                    self.write_node(out, child);
                }
            }
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    let _ = write!(out, " {}=\"{}\"", name, escape_attribute(value));
                }
                out.push('>');
                if is_void(tag) {
                    return;
                }
                for &child in &node.children {
                    self.write_node(out, child);
                }
                let _ = write!(out, "</{}>", tag);
            }
        }
    }

    /// Pre-order descendants of `id`, excluding `id`
    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| matches!(self.nodes[id].kind, NodeKind::Element { .. }))
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| DomError::UnknownNode(format!("{id:?}")))
    }

    /// A node that may hold children: the root or an element
    fn container(&self, id: NodeId) -> Result<&Node> {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::Text(_) => Err(DomError::NotAnElement(format!("{id:?}"))),
            _ => Ok(node),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut Vec<(String, String)>> {
        match self.nodes.get_mut(id) {
            Some(Node {
                kind: NodeKind::Element { attributes, .. },
                ..
            }) => Ok(attributes),
            Some(_) => Err(DomError::NotAnElement(format!("{id:?}"))),
            None => Err(DomError::UnknownNode(format!("{id:?}"))),
        }
    }

    fn insert_fragment(
        &mut self,
        parent: NodeId,
        index: usize,
        fragment: Vec<MarkupNode>,
    ) -> SmallVec<[NodeId; 4]> {
        let ids: SmallVec<[NodeId; 4]> = fragment
            .into_iter()
            .map(|node| self.build(parent, node))
            .collect();
        let children = &mut self.nodes[parent].children;
        let index = index.min(children.len());
        for (offset, &id) in ids.iter().enumerate() {
            children.insert(index + offset, id);
        }
        ids
    }

    fn build(&mut self, parent: NodeId, markup: MarkupNode) -> NodeId {
        match markup {
            MarkupNode::Text(text) => self
                .nodes
                .insert(Node::new(NodeKind::Text(text), Some(parent))),
            MarkupNode::Element {
                tag,
                attributes,
                children,
            } => {
                let id = self.nodes.insert(Node::new(
                    NodeKind::Element { tag, attributes },
                    Some(parent),
                ));
                let kids: Vec<NodeId> = children
                    .into_iter()
                    .map(|child| self.build(id, child))
                    .collect();
                self.nodes[id].children = kids;
                id
            }
        }
    }

    /// Take `id` out of its parent's child list, returning the parent and slot
    fn unlink(&mut self, id: NodeId) -> Result<(NodeId, usize)> {
        if id == self.root {
            return Err(DomError::Root("detached"));
        }
        let parent = self
            .node(id)?
            .parent
            .ok_or_else(|| DomError::UnknownNode(format!("{id:?}")))?;
        let siblings = &mut self.nodes[parent].children;
        let index = siblings
            .iter()
            .position(|&c| c == id)
            .ok_or_else(|| DomError::UnknownNode(format!("{id:?}")))?;
        siblings.remove(index);
        Ok((parent, index))
    }

    fn drop_subtree(&mut self, id: NodeId) {
        for node in self.descendants(id) {
            self.nodes.remove(node);
        }
        self.nodes.remove(id);
    }

    fn drop_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id].children);
        for child in children {
            self.drop_subtree(child);
        }
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for MemoryDocument {
    type Anchor = NodeId;

    fn locate(&self, id: &str) -> Option<NodeId> {
        self.elements()
            .find(|&node| self.attribute(node, "id") == Some(id))
    }

    fn replace_anchor(&mut self, anchor: NodeId, content: &str) -> Result<()> {
        if anchor == self.root {
            return Err(DomError::Root("replaced"));
        }
        self.node(anchor)?;
        let fragment = parse_fragment(content)?;
        let (parent, index) = self.unlink(anchor)?;
        self.drop_subtree(anchor);
        let inserted = self.insert_fragment(parent, index, fragment);
        tracing::trace!(?anchor, inserted = inserted.len(), "replaced anchor");
        Ok(())
    }

    fn set_content(&mut self, anchor: NodeId, content: &str) -> Result<()> {
        self.container(anchor)?;
        let fragment = parse_fragment(content)?;
        self.drop_children(anchor);
        self.insert_fragment(anchor, 0, fragment);
        tracing::trace!(?anchor, "set content");
        Ok(())
    }

    fn attach_metadata(&mut self, anchor: NodeId, key: &str, value: &str) -> Result<()> {
        self.node(anchor)?;
        self.nodes[anchor]
            .metadata
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn detach(&mut self, anchor: NodeId) -> Result<()> {
        self.unlink(anchor)?;
        self.drop_subtree(anchor);
        tracing::trace!(?anchor, "detached");
        Ok(())
    }
}

impl HolderSource for MemoryDocument {
    fn attributes(&self, anchor: NodeId) -> Result<Vec<(String, String)>> {
        match &self.node(anchor)?.kind {
            NodeKind::Element { attributes, .. } => Ok(attributes.clone()),
            _ => Err(DomError::NotAnElement(format!("{anchor:?}"))),
        }
    }

    fn set_attribute(&mut self, anchor: NodeId, name: &str, value: &str) -> Result<()> {
        let attributes = self.element_mut(anchor)?;
        match attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn select(&self, attribute: &str) -> Vec<NodeId> {
        self.elements()
            .filter(|&node| self.attribute(node, attribute).is_some())
            .collect()
    }
}
