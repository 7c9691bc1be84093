// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Inbound message fan-out.

use std::sync::{Arc, Mutex};

use vantage_proto::Message;

type Handler = Arc<dyn Fn(&Message) + Send + Sync>;

/// Subscription handle returned by [`MessageBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler)>,
}

/// Delivers every inbound [`Message`] to the current subscribers.
///
/// Cloning yields another handle to the same registry. Handlers are
/// snapshotted before each publish, so a handler may subscribe or
/// unsubscribe (itself or others) while being notified; the change takes
/// effect from the next message.
#[derive(Clone, Default)]
pub struct MessageBus {
    registry: Arc<Mutex<Registry>>,
}

impl MessageBus {
    /// Bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for every subsequent message.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.handlers.push((id, Arc::new(handler)));
        id
    }

    /// Removes a handler. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        let before = registry.handlers.len();
        registry.handlers.retain(|(h, _)| *h != id);
        registry.handlers.len() != before
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .handlers
            .len()
    }

    /// Notifies every handler registered at the time of the call.
    pub fn publish(&self, message: &Message) {
        let snapshot: Vec<Handler> = self
            .registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .handlers
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();
        for handler in snapshot {
            handler(message);
        }
    }
}
