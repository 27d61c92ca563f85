//! Event recorder — a `tracing` subscriber that captures events for tests.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};

type LockCheck = Box<dyn Fn() -> bool + Send + Sync>;

/// One captured event.
#[derive(Debug, Clone, Default)]
pub struct RecordedEvent {
    /// Field values by name, formatted with `Debug`. The log line itself is
    /// under `message`.
    pub fields: BTreeMap<String, String>,
    /// Whether the lock check reported the guarded lock as held when the
    /// event fired.
    pub while_locked: bool,
}

impl RecordedEvent {
    /// The event's message, if it has one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.fields.get("message").map(String::as_str)
    }
}

/// Shared view of the events a recorder has captured.
#[derive(Debug, Clone, Default)]
pub struct RecordedEvents(Arc<Mutex<Vec<RecordedEvent>>>);

impl RecordedEvents {
    /// Every event captured so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn all(&self) -> Vec<RecordedEvent> {
        self.0.lock().unwrap().clone()
    }

    /// Events whose message equals `message`.
    #[must_use]
    pub fn with_message(&self, message: &str) -> Vec<RecordedEvent> {
        self.all()
            .into_iter()
            .filter(|e| e.message() == Some(message))
            .collect()
    }

    /// Number of events emitted while the guarded lock was held.
    #[must_use]
    pub fn emitted_while_locked(&self) -> usize {
        self.all().iter().filter(|e| e.while_locked).count()
    }
}

/// Subscriber that records every event, optionally noting whether a lock
/// was held at the time. Install it with `tracing::subscriber::with_default`
/// or `set_default`.
pub struct EventRecorder {
    events: RecordedEvents,
    lock_check: Option<LockCheck>,
    next_span: AtomicU64,
}

impl EventRecorder {
    /// A recorder with no lock check.
    #[must_use]
    pub fn new() -> (Self, RecordedEvents) {
        Self::build(None)
    }

    /// A recorder that calls `is_locked` on every event. The check should
    /// `try_lock` the mutex under test and report whether that failed.
    #[must_use]
    pub fn with_lock_check<F>(is_locked: F) -> (Self, RecordedEvents)
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self::build(Some(Box::new(is_locked)))
    }

    fn build(lock_check: Option<LockCheck>) -> (Self, RecordedEvents) {
        let events = RecordedEvents::default();
        let recorder = Self {
            events: events.clone(),
            lock_check,
            next_span: AtomicU64::new(1),
        };
        (recorder, events)
    }
}

struct FieldCollector<'a>(&'a mut BTreeMap<String, String>);

impl Visit for FieldCollector<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_owned(), format!("{value:?}"));
    }
}

impl Subscriber for EventRecorder {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(self.next_span.fetch_add(1, Ordering::Relaxed))
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let while_locked = self.lock_check.as_ref().is_some_and(|check| check());
        let mut fields = BTreeMap::new();
        event.record(&mut FieldCollector(&mut fields));
        self.events
            .0
            .lock()
            .unwrap()
            .push(RecordedEvent { fields, while_locked });
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}
