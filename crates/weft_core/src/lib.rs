//! Weft Core Runtime
//!
//! This crate provides the foundational primitives for the Weft component runtime:
//!
//! - **Identities**: process-unique, human-readable component ids
//! - **Options**: deep-merged JSON option mappings
//! - **Event Emitters**: named, ordered listener lists bound to a subject
//! - **State Machines**: flat transition tables for lifecycle tracking
//! - **Configuration**: `weft.toml` loading
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use weft_core::options::{merge, options_from_value};
//!
//! let mut options = options_from_value(json!({"size": {"w": 1, "h": 2}})).unwrap();
//! let partial = options_from_value(json!({"size": {"h": 5}})).unwrap();
//! merge(&mut options, &partial);
//!
//! assert_eq!(options["size"], json!({"w": 1, "h": 5}));
//! ```

pub mod config;
pub mod events;
pub mod fsm;
pub mod id;
pub mod options;

pub use config::{ConfigError, WeftConfig};
pub use events::{Emitter, Listener};
pub use fsm::{StateMachine, Transition};
pub use id::{next_id, IdAllocator, DEFAULT_ID_PREFIX};
pub use options::{merge, options_from_value, Options, OptionsError};
