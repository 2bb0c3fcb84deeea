//! Illustrative payload that records its own lifecycle.
//!
//! Every construction, clone, drop, read and write of a [`Trace`] is appended
//! to a shared [`Journal`] and logged, so a run shows exactly when the
//! handles allocate and free.

use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Constructed,
    Cloned,
    Dropped,
    Inspected,
    Mutated,
}

impl EventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Constructed => "constructed",
            EventKind::Cloned => "cloned",
            EventKind::Dropped => "dropped",
            EventKind::Inspected => "inspected",
            EventKind::Mutated => "mutated",
        }
    }
}

/// One journal row.
#[derive(Debug, Clone, Serialize)]
pub struct LifecycleEvent {
    pub seq: usize,
    pub instance: u32,
    pub kind: EventKind,
}

#[derive(Debug, Default)]
struct JournalInner {
    events: Vec<LifecycleEvent>,
    next_instance: u32,
}

/// Append-only event log shared by every `Trace` of one run.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    inner: Rc<RefCell<JournalInner>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_instance(&self) -> u32 {
        let mut inner = self.inner.borrow_mut();
        inner.next_instance += 1;
        inner.next_instance
    }

    fn record(&self, instance: u32, kind: EventKind) {
        let mut inner = self.inner.borrow_mut();
        let seq = inner.events.len();
        inner.events.push(LifecycleEvent {
            seq,
            instance,
            kind,
        });
        tracing::debug!(instance, event = kind.as_str(), "trace");
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.inner.borrow().events.clone()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.inner
            .borrow()
            .events
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    /// Instances constructed or cloned but not yet dropped.
    pub fn live(&self) -> usize {
        let born = self.count(EventKind::Constructed) + self.count(EventKind::Cloned);
        born.saturating_sub(self.count(EventKind::Dropped))
    }
}

/// Payload whose lifecycle is journaled.
#[derive(Debug)]
pub struct Trace {
    instance: u32,
    touches: u32,
    journal: Journal,
}

impl Trace {
    pub fn new(journal: &Journal) -> Self {
        let instance = journal.allocate_instance();
        journal.record(instance, EventKind::Constructed);
        Self {
            instance,
            touches: 0,
            journal: journal.clone(),
        }
    }

    /// Read-only operation.
    pub fn inspect(&self) {
        self.journal.record(self.instance, EventKind::Inspected);
    }

    pub fn touch(&mut self) {
        self.touches += 1;
        self.journal.record(self.instance, EventKind::Mutated);
    }

    pub fn instance(&self) -> u32 {
        self.instance
    }

    pub fn touches(&self) -> u32 {
        self.touches
    }
}

impl Clone for Trace {
    fn clone(&self) -> Self {
        let instance = self.journal.allocate_instance();
        self.journal.record(instance, EventKind::Cloned);
        Self {
            instance,
            touches: self.touches,
            journal: self.journal.clone(),
        }
    }
}

impl Drop for Trace {
    fn drop(&mut self) {
        self.journal.record(self.instance, EventKind::Dropped);
    }
}
