//! Connection-table storage owner keyed by resolved stream URI.

use crate::transport::StreamHandle;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::{Mutex, MutexGuard};
use topic_pattern::RoutePattern;

/// Open connections by resolved key. At most one handle per key.
///
/// Keys whose `connect` is still in flight are held in `pending` so the
/// table lock is not needed across the transport call.
#[derive(Default)]
pub(crate) struct Connections {
    by_key: BTreeMap<String, Box<dyn StreamHandle>>,
    pending: BTreeSet<String>,
}

impl Connections {
    /// Whether any open or pending key is matched by `target` read as a template.
    ///
    /// A target that does not compile is compared as an exact key.
    pub(crate) fn is_connected(&self, target: &str) -> bool {
        let mut keys = self.by_key.keys().chain(&self.pending);
        match RoutePattern::compile(target) {
            Ok(pattern) => keys.any(|key| pattern.test(key)),
            Err(_) => keys.any(|key| key == target),
        }
    }

    /// Claims `key` for an in-flight connect. Returns `false` when it is
    /// already open or claimed.
    pub(crate) fn reserve(&mut self, key: &str) -> bool {
        if self.by_key.contains_key(key) {
            return false;
        }
        self.pending.insert(key.to_string())
    }

    /// Drops the claim on `key` after a failed connect.
    pub(crate) fn release(&mut self, key: &str) {
        self.pending.remove(key);
    }

    /// Stores `handle` under `key`, clearing any claim.
    ///
    /// An existing handle is never overwritten; the rejected one is handed
    /// back so the caller can close it.
    pub(crate) fn insert(
        &mut self,
        key: String,
        handle: Box<dyn StreamHandle>,
    ) -> Option<Box<dyn StreamHandle>> {
        self.pending.remove(&key);
        if self.by_key.contains_key(&key) {
            return Some(handle);
        }
        self.by_key.insert(key, handle);
        None
    }

    /// Removes and returns every connection whose key `pattern` matches.
    pub(crate) fn take_matching(
        &mut self,
        pattern: &RoutePattern,
    ) -> Vec<(String, Box<dyn StreamHandle>)> {
        let keys: Vec<String> = self
            .by_key
            .keys()
            .filter(|key| pattern.test(key))
            .cloned()
            .collect();

        keys.into_iter()
            .filter_map(|key| self.by_key.remove(&key).map(|handle| (key, handle)))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.by_key.keys().cloned().collect()
    }
}

pub(crate) struct ConnectionTable {
    connections: Mutex<Connections>,
}

impl ConnectionTable {
    pub(crate) fn new() -> Self {
        Self {
            connections: Mutex::new(Connections::default()),
        }
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, Connections> {
        self.connections.lock().await
    }
}
