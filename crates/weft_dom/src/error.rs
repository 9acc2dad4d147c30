//! DOM error types

use thiserror::Error;

/// Render backend errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The node handle does not refer to a live node
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// The operation needs an element but got a text node
    #[error("node is not an element: {0}")]
    NotAnElement(String),

    /// The root node cannot be replaced or removed
    #[error("the document root cannot be {0}")]
    Root(&'static str),

    /// Content could not be parsed as a markup fragment
    #[error("markup error at byte {offset}: {message}")]
    Markup { offset: usize, message: String },
}

/// Result type for DOM operations
pub type Result<T> = std::result::Result<T, DomError>;
