//! Location surface contract and the in-process location token owner.

use crate::observability::{events, fields};
use async_trait::async_trait;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const COMPONENT: &str = "location";

/// A change of the live location token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NavigationEvent {
    pub previous: String,
    pub current: String,
}

/// Stream of navigation events consumed by [`Router::listen`](crate::Router::listen).
pub type NavigationEvents = UnboundedReceiver<NavigationEvent>;

/// Owner of the live location token.
///
/// Pushing a new token must notify listeners asynchronously; the router never
/// expects handlers to run inside `push`.
#[async_trait]
pub trait LocationSurface: Send + Sync {
    async fn current(&self) -> String;

    async fn push(&self, location: String);
}

/// In-memory [`LocationSurface`] that reports changes on an unbounded channel.
pub struct MemoryLocation {
    current: Mutex<String>,
    notify: UnboundedSender<NavigationEvent>,
}

impl MemoryLocation {
    pub fn new(initial: impl Into<String>) -> (Arc<Self>, NavigationEvents) {
        let (notify, events) = mpsc::unbounded();
        let location = Self {
            current: Mutex::new(strip_marker(&initial.into()).to_string()),
            notify,
        };
        (Arc::new(location), events)
    }

    /// Ends the event stream. Events already queued are still delivered.
    pub fn close(&self) {
        self.notify.close_channel();
    }
}

fn strip_marker(location: &str) -> &str {
    location.strip_prefix('#').unwrap_or(location)
}

#[async_trait]
impl LocationSurface for MemoryLocation {
    async fn current(&self) -> String {
        self.current.lock().await.clone()
    }

    async fn push(&self, location: String) {
        let current = strip_marker(&location).to_string();
        let previous = {
            let mut slot = self.current.lock().await;
            std::mem::replace(&mut *slot, current.clone())
        };

        debug!(
            event = events::NAVIGATION_PUSH,
            component = COMPONENT,
            previous = previous.as_str(),
            location = current.as_str(),
            "location pushed"
        );

        if self
            .notify
            .unbounded_send(NavigationEvent { previous, current })
            .is_err()
        {
            warn!(
                event = events::NAVIGATION_NOTIFY_DROPPED,
                component = COMPONENT,
                reason = fields::REASON_RECEIVER_DROPPED,
                "navigation event dropped"
            );
        }
    }
}
