// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Correlated request/response matching over the [`MessageBus`].
//!
//! A [`CorrelationRequest`] pairs a predicate with a transform. Listeners
//! receive the transform of every message the predicate accepts. The request
//! holds a bus subscription only while it has listeners: the first listener
//! subscribes, removing the last one unsubscribes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, trace, warn};
use vantage_proto::Message;

use crate::bus::{MessageBus, SubscriptionId};
use crate::ClientError;

type Predicate = dyn Fn(&Message) -> bool + Send + Sync;
type Transform<T> = dyn Fn(&Message) -> Result<T, ClientError> + Send + Sync;
type OnceSlot<T> = Arc<Mutex<Option<oneshot::Sender<Result<T, ClientError>>>>>;

/// Listener handle returned by [`CorrelationRequest::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

enum Listener<T> {
    Durable(Arc<dyn Fn(T) + Send + Sync>),
    Once(OnceSlot<T>),
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Durable(f) => Self::Durable(Arc::clone(f)),
            Self::Once(slot) => Self::Once(Arc::clone(slot)),
        }
    }
}

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(ListenerId, Listener<T>)>,
    subscription: Option<SubscriptionId>,
}

impl<T> Listeners<T> {
    fn snapshot(&self) -> Vec<(ListenerId, Listener<T>)> {
        self.entries.iter().map(|(id, l)| (*id, l.clone())).collect()
    }
}

struct Inner<T> {
    bus: MessageBus,
    label: String,
    timeout: Duration,
    predicate: Box<Predicate>,
    transform: Box<Transform<T>>,
    listeners: Mutex<Listeners<T>>,
}

/// Matches inbound messages to one logical request.
pub struct CorrelationRequest<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for CorrelationRequest<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + 'static> CorrelationRequest<T> {
    /// New request over `bus`. `label` names the request in logs and
    /// timeout errors.
    pub fn new<P, F>(
        bus: &MessageBus,
        label: impl Into<String>,
        timeout: Duration,
        predicate: P,
        transform: F,
    ) -> Self
    where
        P: Fn(&Message) -> bool + Send + Sync + 'static,
        F: Fn(&Message) -> Result<T, ClientError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                bus: bus.clone(),
                label: label.into(),
                timeout,
                predicate: Box::new(predicate),
                transform: Box::new(transform),
                listeners: Mutex::new(Listeners {
                    next_id: 0,
                    entries: Vec::new(),
                    subscription: None,
                }),
            }),
        }
    }

    /// Timeout applied by [`CorrelationRequest::once`].
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.lock_listeners().entries.len()
    }

    /// Durable subscription. Transform failures are logged and skipped.
    pub fn on<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Inner::add(&self.inner, Listener::Durable(Arc::new(listener)))
    }

    /// Removes a listener; tears down the bus subscription with the last one.
    pub fn off(&self, id: ListenerId) -> bool {
        self.inner.remove(id)
    }

    /// Registers a one-shot listener now and returns its pending result.
    ///
    /// Register before sending the request so a fast reply cannot be missed.
    pub fn once(&self) -> Pending<T> {
        let (tx, rx) = oneshot::channel();
        let id = Inner::add(&self.inner, Listener::Once(Arc::new(Mutex::new(Some(tx)))));
        Pending {
            rx,
            guard: ListenerGuard {
                inner: Arc::clone(&self.inner),
                id,
            },
            label: self.inner.label.clone(),
            timeout: self.inner.timeout,
        }
    }
}

impl<T: Send + 'static> Inner<T> {
    fn add(this: &Arc<Self>, listener: Listener<T>) -> ListenerId {
        let mut listeners = this.lock_listeners();
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, listener));
        if listeners.subscription.is_none() {
            let weak = Arc::downgrade(this);
            listeners.subscription = Some(this.bus.subscribe(move |message| {
                if let Some(inner) = weak.upgrade() {
                    inner.dispatch(message);
                }
            }));
            trace!(label = %this.label, "subscribed to bus");
        }
        id
    }
}

impl<T> Inner<T> {
    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, Listeners<T>> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.entries.len();
        listeners.entries.retain(|(l, _)| *l != id);
        let removed = listeners.entries.len() != before;
        if listeners.entries.is_empty() {
            if let Some(subscription) = listeners.subscription.take() {
                self.bus.unsubscribe(subscription);
                trace!(label = %self.label, "unsubscribed from bus");
            }
        }
        removed
    }

    fn dispatch(&self, message: &Message) {
        if !(self.predicate)(message) {
            return;
        }
        let snapshot = self.lock_listeners().snapshot();
        for (id, listener) in snapshot {
            match listener {
                Listener::Durable(f) => match (self.transform)(message) {
                    Ok(value) => f(value),
                    Err(err) => warn!(label = %self.label, %err, "dropping unusable response"),
                },
                Listener::Once(slot) => {
                    let sender = slot.lock().unwrap_or_else(|e| e.into_inner()).take();
                    if let Some(sender) = sender {
                        debug!(label = %self.label, "response matched");
                        let _ = sender.send((self.transform)(message));
                        self.remove(id);
                    }
                }
            }
        }
    }
}

/// Removes a listener when dropped, so every exit path cleans up.
struct ListenerGuard<T> {
    inner: Arc<Inner<T>>,
    id: ListenerId,
}

impl<T> Drop for ListenerGuard<T> {
    fn drop(&mut self) {
        self.inner.remove(self.id);
    }
}

/// Outstanding result of [`CorrelationRequest::once`].
///
/// Keeps its request alive until settled. Dropping it without awaiting
/// unregisters the listener.
#[must_use = "a pending response does nothing unless awaited"]
pub struct Pending<T> {
    rx: oneshot::Receiver<Result<T, ClientError>>,
    guard: ListenerGuard<T>,
    label: String,
    timeout: Duration,
}

impl<T> Pending<T> {
    /// Waits for the first matching response or the timeout.
    ///
    /// # Errors
    /// The transform's error, [`ClientError::Timeout`], or
    /// [`ClientError::Closed`] if the request was dropped.
    pub async fn wait(self) -> Result<T, ClientError> {
        let Self {
            rx,
            guard,
            label,
            timeout,
        } = self;
        let outcome = tokio::time::timeout(timeout, rx).await;
        drop(guard);
        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ClientError::Closed),
            Err(_) => {
                warn!(%label, ?timeout, "request timed out");
                Err(ClientError::Timeout {
                    what: label,
                    timeout,
                })
            }
        }
    }
}

/// Session-local correlation id source: `"<prefix>-<n>"`, `n` from 1.
#[derive(Debug)]
pub struct CorrelationIds {
    prefix: String,
    next: AtomicU64,
}

impl CorrelationIds {
    /// Generator whose ids start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }

    /// Fresh id; never repeats within this generator.
    pub fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}
