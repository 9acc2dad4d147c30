//! Identity allocation
//!
//! Component ids double as DOM anchor ids, so they are plain strings made of a
//! readable prefix and a counter that never repeats within the process.

use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix used when no configuration overrides it
pub const DEFAULT_ID_PREFIX: &str = "component_";

/// Process-wide counter shared by every allocator
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Hands out ids with a fixed prefix
///
/// All allocators draw from the same counter, so two allocators with the same
/// prefix can never produce the same id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdAllocator {
    prefix: String,
}

impl IdAllocator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Allocate the next id
    pub fn next_id(&self) -> String {
        let n = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PREFIX)
    }
}

/// Allocate an id with the default prefix
pub fn next_id() -> String {
    IdAllocator::default().next_id()
}
