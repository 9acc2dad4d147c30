//! State Machine Runtime
//!
//! Flat state machines used to track component lifecycles.
//! Supports:
//! - Transition tables keyed by (state, event)
//! - Transition history for debugging
//!
//! States and events are any small `Copy` values, usually fieldless enums.

use smallvec::SmallVec;
use std::fmt::Debug;

/// A transition in the state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition<S, E> {
    pub from_state: S,
    pub event: E,
    pub to_state: S,
}

impl<S, E> Transition<S, E> {
    pub const fn new(from: S, event: E, to: S) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
        }
    }
}

/// A state machine instance
#[derive(Clone, Debug)]
pub struct StateMachine<S, E> {
    current_state: S,
    transitions: SmallVec<[Transition<S, E>; 4]>,
    /// History of state transitions (for debugging)
    history: Vec<(S, E, S)>,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Debug,
    E: Copy + Eq + Debug,
{
    /// Create a new state machine with an initial state and transitions
    pub fn new(initial_state: S, transitions: impl IntoIterator<Item = Transition<S, E>>) -> Self {
        Self {
            current_state: initial_state,
            transitions: transitions.into_iter().collect(),
            history: Vec::new(),
        }
    }

    /// Get the current state
    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    /// Get transition history
    pub fn history(&self) -> &[(S, E, S)] {
        &self.history
    }

    /// Clear transition history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: E) -> bool {
        self.find(event).is_some()
    }

    /// Send an event, returning the resulting state
    ///
    /// Events with no matching transition leave the machine untouched.
    pub fn send(&mut self, event: E) -> S {
        let current = self.current_state;
        let Some(to_state) = self.find(event) else {
            tracing::trace!(?current, ?event, "no transition");
            return current;
        };

        self.current_state = to_state;
        self.history.push((current, event, to_state));
        tracing::trace!(?current, ?event, ?to_state, "transition");

        to_state
    }

    fn find(&self, event: E) -> Option<S> {
        let current = self.current_state;
        self.transitions
            .iter()
            .find(|t| t.from_state == current && t.event == event)
            .map(|t| t.to_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum State {
        Idle,
        Hovered,
        Pressed,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Event {
        PointerEnter,
        PointerLeave,
        PointerDown,
        PointerUp,
    }

    use Event::*;
    use State::*;

    fn machine() -> StateMachine<State, Event> {
        StateMachine::new(
            Idle,
            [
                Transition::new(Idle, PointerEnter, Hovered),
                Transition::new(Hovered, PointerLeave, Idle),
                Transition::new(Hovered, PointerDown, Pressed),
                Transition::new(Pressed, PointerUp, Hovered),
            ],
        )
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = machine();
        assert_eq!(fsm.current_state(), Idle);

        fsm.send(PointerEnter);
        assert_eq!(fsm.current_state(), Hovered);

        fsm.send(PointerDown);
        assert_eq!(fsm.current_state(), Pressed);

        fsm.send(PointerUp);
        assert!(fsm.is_in(Hovered));

        fsm.send(PointerLeave);
        assert!(fsm.is_in(Idle));
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut fsm = machine();

        // PointerDown is not valid in Idle
        assert_eq!(fsm.send(PointerDown), Idle);
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn test_history() {
        let mut fsm = machine();
        fsm.send(PointerEnter);
        fsm.send(PointerDown);

        let history = fsm.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], (Idle, PointerEnter, Hovered));
        assert_eq!(history[1], (Hovered, PointerDown, Pressed));

        fsm.clear_history();
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn test_can_send() {
        let fsm = machine();
        assert!(fsm.can_send(PointerEnter));
        assert!(!fsm.can_send(PointerDown));
    }
}
