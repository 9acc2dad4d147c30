//! Component error types

use thiserror::Error;
use weft_core::OptionsError;
use weft_dom::DomError;

/// Component runtime errors
///
/// All of these are programmer errors raised at the call site; nothing in
/// the runtime catches or retries them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// Instance name is missing or blank
    #[error("component name is missing or invalid: {0:?}")]
    InvalidName(String),

    /// Type name is neither a native class nor a definition
    #[error("component type not found: {0}")]
    UnknownType(String),

    /// `base_on` names nothing registered or defined
    #[error("base class or definition is not known: {0}")]
    UnknownBase(String),

    /// A definition tried to take a native class name
    #[error("component type name is registered by a native class: {0}")]
    NameCollision(String),

    /// Re-render requested before the first render
    #[error("component is not rendered: #{0}")]
    NotRendered(String),

    /// Strict container lookup found no anchor
    #[error("component container not found: #{id}, name: {name}")]
    ContainerNotFound { id: String, name: String },

    /// No store field, name or id to push under
    #[error("store data field is undefined")]
    MissingField,

    /// An options payload was not a mapping
    #[error("invalid options: {0}")]
    InvalidOptionsShape(#[from] OptionsError),

    /// Strict compile with no render handler set
    #[error("component has no render handler: #{0}")]
    MissingRenderHandler(String),

    /// Redefinition would make the `base_on` chain loop
    #[error("defining {name} on {base} would create an inheritance cycle")]
    CyclicBase { name: String, base: String },

    /// No method bound under the name
    #[error("component #{id} has no method {method}")]
    UnknownMethod { id: String, method: String },

    /// A holder attribute named something the scope does not provide
    #[error("holder references unknown {kind}: {name}")]
    UnresolvedReference { kind: &'static str, name: String },

    /// The render backend rejected an operation
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Result type for component operations
pub type Result<T> = std::result::Result<T, ComponentError>;
