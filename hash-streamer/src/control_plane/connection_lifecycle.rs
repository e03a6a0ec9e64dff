//! Connection lifecycle orchestration: dedup on open, broad close.

use crate::control_plane::connection_table::ConnectionTable;
use crate::data_plane::ingress_listener::IngressListener;
use crate::data_plane::topic_registry::TopicRegistry;
use crate::error::TransportFailure;
use crate::observability::{events, fields};
use crate::transport::{ChunkListener, StreamTransport};
use std::sync::Arc;
use topic_pattern::{ResolvedTarget, RoutePattern};
use tracing::{debug, info, warn};

const COMPONENT: &str = "connection_lifecycle";

/// Coordinates connection transitions across the table, registry and transport.
pub(crate) struct ConnectionLifecycle<'a> {
    table: &'a ConnectionTable,
    registry: &'a Arc<TopicRegistry>,
    transport: &'a dyn StreamTransport,
}

impl<'a> ConnectionLifecycle<'a> {
    pub(crate) fn new(
        table: &'a ConnectionTable,
        registry: &'a Arc<TopicRegistry>,
        transport: &'a dyn StreamTransport,
    ) -> Self {
        Self {
            table,
            registry,
            transport,
        }
    }

    /// Opens `key` unless an existing connection already covers it.
    ///
    /// The key is reserved under the table lock, and the lock is released
    /// while the transport connects, so chunks delivered during `connect` may
    /// re-enter the bus. Concurrent opens of one key still connect once.
    /// Returns `true` only when a connection was made.
    pub(crate) async fn open(&self, key: &str) -> Result<bool, TransportFailure> {
        {
            let mut connections = self.table.lock().await;
            if connections.is_connected(key) || !connections.reserve(key) {
                debug!(
                    event = events::CONNECTION_OPEN_SKIPPED,
                    component = COMPONENT,
                    key,
                    reason = fields::REASON_ALREADY_CONNECTED,
                    "connection already open"
                );
                return Ok(false);
            }
        }

        debug!(
            event = events::CONNECTION_OPEN_START,
            component = COMPONENT,
            key,
            "opening connection"
        );

        let listener: Arc<dyn ChunkListener> =
            Arc::new(IngressListener::new(key, self.registry.clone()));
        match self.transport.connect(key, listener).await {
            Ok(handle) => {
                let (displaced, open) = {
                    let mut connections = self.table.lock().await;
                    let displaced = connections.insert(key.to_string(), handle);
                    (displaced, connections.len())
                };
                if let Some(duplicate) = displaced {
                    duplicate.close().await;
                    debug!(
                        event = events::CONNECTION_OPEN_SKIPPED,
                        component = COMPONENT,
                        key,
                        reason = fields::REASON_ALREADY_CONNECTED,
                        "duplicate connection closed"
                    );
                    return Ok(false);
                }
                info!(
                    event = events::CONNECTION_OPEN_OK,
                    component = COMPONENT,
                    key,
                    open,
                    "connection opened"
                );
                Ok(true)
            }
            Err(err) => {
                self.table.lock().await.release(key);
                warn!(
                    event = events::CONNECTION_OPEN_FAILED,
                    component = COMPONENT,
                    key,
                    err = %err,
                    "unable to open connection"
                );
                Err(err)
            }
        }
    }

    /// Closes every connection matched by the unresolved `pattern`.
    ///
    /// Nothing is closed when `target` is fully resolved and already connected.
    pub(crate) async fn close(
        &self,
        pattern: &RoutePattern,
        target: &ResolvedTarget,
    ) -> Vec<String> {
        let template = pattern.raw();
        let victims = {
            let mut connections = self.table.lock().await;
            if target.complete && connections.is_connected(&target.uri) {
                debug!(
                    event = events::CONNECTION_CLOSE_SKIPPED,
                    component = COMPONENT,
                    template,
                    key = target.uri.as_str(),
                    reason = fields::REASON_TARGET_STILL_WANTED,
                    "target connection kept open"
                );
                return Vec::new();
            }
            connections.take_matching(pattern)
        };

        let mut closed = Vec::with_capacity(victims.len());
        for (key, handle) in victims {
            handle.close().await;
            info!(
                event = events::CONNECTION_CLOSE_OK,
                component = COMPONENT,
                template,
                key = key.as_str(),
                "connection closed"
            );
            closed.push(key);
        }
        closed
    }
}
