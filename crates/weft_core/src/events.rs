//! Named event emitter
//!
//! An [`Emitter`] keeps, for every event name, the ordered list of listeners
//! registered under it. Emitting calls them synchronously in registration
//! order, handing each one the subject that owns the emitter and the payload.
//! A panicking listener is not caught.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;

/// Event listener function type
pub type Listener<S, P> = Rc<dyn Fn(&S, &P)>;

/// Dispatches named events to registered listeners
pub struct Emitter<S: ?Sized, P: ?Sized> {
    listeners: FxHashMap<String, SmallVec<[Listener<S, P>; 2]>>,
}

impl<S: ?Sized, P: ?Sized> Emitter<S, P> {
    pub fn new() -> Self {
        Self {
            listeners: FxHashMap::default(),
        }
    }

    /// Register a listener for an event name
    pub fn on<F>(&mut self, event: impl Into<String>, listener: F)
    where
        F: Fn(&S, &P) + 'static,
    {
        self.add(event, Rc::new(listener));
    }

    /// Register an already shared listener
    pub fn add(&mut self, event: impl Into<String>, listener: Listener<S, P>) {
        self.listeners
            .entry(event.into())
            .or_default()
            .push(listener);
    }

    /// Drop every listener registered under `event`
    pub fn off(&mut self, event: &str) {
        self.listeners.remove(event);
    }

    /// Drop every listener registered under any of `events`
    pub fn off_many<I, N>(&mut self, events: I)
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        for event in events {
            self.listeners.remove(event.as_ref());
        }
    }

    /// Drop all listeners
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of listeners registered under `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, |l| l.len())
    }

    /// Names that currently have at least one listener
    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.listeners.keys().map(String::as_str)
    }

    /// Call every listener registered under `event`
    ///
    /// The listener list is snapshotted first, so the emitter can be borrowed
    /// by the subject while dispatching.
    pub fn emit(&self, subject: &S, event: &str, payload: &P) {
        let snapshot = self.snapshot(event);
        if snapshot.is_empty() {
            return;
        }
        tracing::trace!(event, listeners = snapshot.len(), "emit");
        for listener in snapshot {
            listener(subject, payload);
        }
    }

    /// Copy of the listeners registered under `event`
    ///
    /// Lets an owner release its borrow of the emitter before dispatching.
    pub fn snapshot(&self, event: &str) -> SmallVec<[Listener<S, P>; 2]> {
        self.listeners
            .get(event)
            .map(|listeners| listeners.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl<S: ?Sized, P: ?Sized> Default for Emitter<S, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized, P: ?Sized> fmt::Debug for Emitter<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<(&str, usize)> = self
            .listeners
            .iter()
            .map(|(name, l)| (name.as_str(), l.len()))
            .collect();
        counts.sort_unstable();
        f.debug_struct("Emitter").field("listeners", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Subject {
        name: &'static str,
    }

    #[test]
    fn test_listeners_run_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut emitter: Emitter<Subject, u32> = Emitter::new();

        let l1 = log.clone();
        emitter.on("tick", move |s: &Subject, n: &u32| {
            l1.borrow_mut().push(format!("first:{}:{}", s.name, n))
        });
        let l2 = log.clone();
        emitter.on("tick", move |s: &Subject, n: &u32| {
            l2.borrow_mut().push(format!("second:{}:{}", s.name, n))
        });

        emitter.emit(&Subject { name: "a" }, "tick", &7);
        assert_eq!(*log.borrow(), vec!["first:a:7", "second:a:7"]);
    }

    #[test]
    fn test_unknown_event_is_noop() {
        let emitter: Emitter<Subject, ()> = Emitter::new();
        emitter.emit(&Subject { name: "a" }, "nothing", &());
        assert_eq!(emitter.listener_count("nothing"), 0);
    }

    #[test]
    fn test_off_and_clear() {
        let mut emitter: Emitter<Subject, ()> = Emitter::new();
        emitter.on("a", |_: &Subject, _: &()| {});
        emitter.on("b", |_: &Subject, _: &()| {});
        emitter.on("c", |_: &Subject, _: &()| {});

        emitter.off("a");
        assert_eq!(emitter.listener_count("a"), 0);
        assert_eq!(emitter.listener_count("b"), 1);

        emitter.off_many(["b"]);
        assert_eq!(emitter.listener_count("b"), 0);
        assert_eq!(emitter.event_names().collect::<Vec<_>>(), vec!["c"]);

        emitter.clear();
        assert_eq!(emitter.listener_count("c"), 0);
    }

    #[test]
    fn test_snapshot_outlives_emitter_changes() {
        let mut emitter: Emitter<Subject, ()> = Emitter::new();
        emitter.on("a", |_: &Subject, _: &()| {});
        emitter.on("a", |_: &Subject, _: &()| {});

        let snapshot = emitter.snapshot("a");
        emitter.clear();

        assert_eq!(snapshot.len(), 2);
        assert!(emitter.snapshot("a").is_empty());
    }
}
