//! Render lifecycle
//!
//! `Unrendered -> Rendered -> Unrendered -> ...` with no terminal state. A
//! re-render passes through `Unrendered` while the anchor is swapped.

use weft_core::{StateMachine, Transition};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Unrendered,
    Rendered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Content placed and anchor found
    Mount,
    /// Anchor detached
    Unmount,
    /// Anchor about to be swapped by a re-render
    Swap,
}

use LifecycleEvent::*;
use LifecycleState::*;

const TRANSITIONS: [Transition<LifecycleState, LifecycleEvent>; 3] = [
    Transition::new(Unrendered, Mount, Rendered),
    Transition::new(Rendered, Unmount, Unrendered),
    Transition::new(Rendered, Swap, Unrendered),
];

/// Lifecycle tracker owned by every component
#[derive(Clone, Debug)]
pub struct Lifecycle {
    machine: StateMachine<LifecycleState, LifecycleEvent>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            machine: StateMachine::new(Unrendered, TRANSITIONS),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.machine.current_state()
    }

    pub fn is_rendered(&self) -> bool {
        self.machine.is_in(Rendered)
    }

    pub fn send(&mut self, event: LifecycleEvent) -> LifecycleState {
        self.machine.send(event)
    }

    pub fn history(&self) -> &[(LifecycleState, LifecycleEvent, LifecycleState)] {
        self.machine.history()
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
