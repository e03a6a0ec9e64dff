/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use async_trait::async_trait;
use hash_streamer::{ChunkListener, StreamHandle, StreamTransport, TransportFailure};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct TransportState {
    live: HashMap<String, Arc<dyn ChunkListener>>,
    connects: Vec<String>,
    closes: Vec<String>,
    requests: Vec<String>,
    responses: HashMap<String, Result<String, String>>,
    refused: HashSet<String>,
}

/// In-memory [`StreamTransport`] that records every call.
///
/// Chunks are delivered only when a test calls [`MemoryTransport::push`];
/// requests answer with whatever was registered for the exact URI.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<TransportState>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn respond_with(&self, uri: &str, body: &str) {
        self.state
            .lock()
            .await
            .responses
            .insert(uri.to_string(), Ok(body.to_string()));
    }

    pub async fn fail_request(&self, uri: &str, reason: &str) {
        self.state
            .lock()
            .await
            .responses
            .insert(uri.to_string(), Err(reason.to_string()));
    }

    pub async fn refuse_connect(&self, uri: &str) {
        self.state.lock().await.refused.insert(uri.to_string());
    }

    /// Delivers `data` to the live connection on `uri`. Returns `false` when none is open.
    pub async fn push(&self, uri: &str, data: &str) -> bool {
        let listener = self.state.lock().await.live.get(uri).cloned();
        match listener {
            Some(listener) => {
                listener.on_chunk(data.to_string()).await;
                true
            }
            None => false,
        }
    }

    pub async fn connects(&self) -> Vec<String> {
        self.state.lock().await.connects.clone()
    }

    pub async fn closes(&self) -> Vec<String> {
        self.state.lock().await.closes.clone()
    }

    pub async fn requests(&self) -> Vec<String> {
        self.state.lock().await.requests.clone()
    }

    pub async fn live_connections(&self) -> Vec<String> {
        let mut live: Vec<String> = self.state.lock().await.live.keys().cloned().collect();
        live.sort();
        live
    }
}

struct MemoryHandle {
    uri: String,
    state: Arc<Mutex<TransportState>>,
}

#[async_trait]
impl StreamHandle for MemoryHandle {
    async fn close(&self) {
        let mut state = self.state.lock().await;
        state.live.remove(&self.uri);
        state.closes.push(self.uri.clone());
        debug!(uri = self.uri.as_str(), "memory connection closed");
    }
}

#[async_trait]
impl StreamTransport for MemoryTransport {
    async fn connect(
        &self,
        uri: &str,
        listener: Arc<dyn ChunkListener>,
    ) -> Result<Box<dyn StreamHandle>, TransportFailure> {
        let mut state = self.state.lock().await;
        if state.refused.contains(uri) {
            return Err(TransportFailure::new(uri, "connection refused"));
        }

        state.connects.push(uri.to_string());
        state.live.insert(uri.to_string(), listener);
        debug!(uri, "memory connection opened");

        Ok(Box::new(MemoryHandle {
            uri: uri.to_string(),
            state: self.state.clone(),
        }))
    }

    async fn request(&self, uri: &str) -> Result<String, TransportFailure> {
        let mut state = self.state.lock().await;
        state.requests.push(uri.to_string());
        match state.responses.get(uri) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(reason)) => Err(TransportFailure::new(uri, reason.as_str())),
            None => Err(TransportFailure::new(uri, "no response registered")),
        }
    }
}
