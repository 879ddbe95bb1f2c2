//! Options-source contract.
//!
//! A field receives its options either as a plain one-shot snapshot or as a
//! push stream that may re-emit over time. Both go through one contract:
//! subscribe a handler, receive zero or more snapshots, drop the returned
//! guard to release the handler. A plain `Vec<Value>` emits exactly once,
//! synchronously, during `subscribe`.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use serde_json::Value;

/// Handler invoked with each emitted snapshot.
///
/// A snapshot is the raw emitted sequence; consumers unwrap the single
/// element themselves (see the emission contract on
/// [`TreeSelect`](crate::widgets::tree_select::TreeSelect)).
pub type SnapshotHandler = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// A source of options snapshots.
pub trait OptionsSource {
    /// Register a handler and return its teardown guard.
    ///
    /// The handler may be invoked synchronously during this call (one-shot
    /// sources emit immediately). Dropping the guard unregisters the handler
    /// unconditionally.
    fn subscribe(&self, handler: SnapshotHandler) -> Subscription;
}

/// One-shot source: the snapshot is emitted once, on subscribe.
impl OptionsSource for Vec<Value> {
    fn subscribe(&self, handler: SnapshotHandler) -> Subscription {
        handler(self.as_slice());
        Subscription::detached()
    }
}

#[derive(Default)]
struct StreamInner {
    handlers: Vec<(usize, SnapshotHandler)>,
    next_id: usize,
}

/// A push-style options stream.
///
/// Emissions are delivered synchronously, in subscription order, to every
/// live subscriber. Clones share the same subscriber list, so the producing
/// side keeps one handle and the consuming side subscribes through another.
#[derive(Clone, Default)]
pub struct ValueStream {
    inner: Arc<Mutex<StreamInner>>,
}

impl ValueStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a snapshot to all current subscribers.
    pub fn emit(&self, snapshot: &[Value]) {
        // Handlers run outside the lock so they may subscribe/unsubscribe.
        let handlers: Vec<SnapshotHandler> = self
            .inner
            .lock()
            .map(|guard| guard.handlers.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();
        for handler in handlers {
            handler(snapshot);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .map(|guard| guard.handlers.len())
            .unwrap_or(0)
    }
}

impl fmt::Debug for ValueStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueStream")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl OptionsSource for ValueStream {
    fn subscribe(&self, handler: SnapshotHandler) -> Subscription {
        if let Ok(mut guard) = self.inner.lock() {
            let id = guard.next_id;
            guard.next_id += 1;
            guard.handlers.push((id, handler));
            Subscription {
                stream: Some((Arc::downgrade(&self.inner), id)),
            }
        } else {
            Subscription::detached()
        }
    }
}

/// Teardown guard for an options subscription.
///
/// Dropping the guard releases the handler, so a torn-down widget can never
/// be called back by a long-lived stream.
pub struct Subscription {
    stream: Option<(Weak<Mutex<StreamInner>>, usize)>,
}

impl Subscription {
    /// A guard with nothing to release (one-shot sources).
    fn detached() -> Self {
        Self { stream: None }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.stream.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some((stream, id)) = self.stream.take()
            && let Some(inner) = stream.upgrade()
            && let Ok(mut guard) = inner.lock()
        {
            guard.handlers.retain(|(handler_id, _)| *handler_id != id);
        }
    }
}
