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
use hash_streamer::{Action, Message, RouteParams, RouteStep, TopicListener};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Clone, Default)]
pub struct RecordingListener {
    message_store: Arc<Mutex<Vec<Arc<Message>>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<Arc<Message>> {
        self.message_store.lock().await.clone()
    }

    /// Source tags of every received message, in arrival order.
    pub async fn sources(&self) -> Vec<String> {
        self.message_store
            .lock()
            .await
            .iter()
            .map(|message| message.source().unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl TopicListener for RecordingListener {
    async fn on_receive(&self, message: Arc<Message>) {
        debug!("within recording_listener! src: {:?}", message.source());
        self.message_store.lock().await.push(message);
    }
}

/// Route step that records the params it ran with and passes them on.
#[derive(Clone, Default)]
pub struct RecordingStep {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl RecordingStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> RouteStep {
        Arc::new(self.clone())
    }

    pub async fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl Action<RouteParams> for RecordingStep {
    type Output = RouteParams;

    async fn run(&self, params: RouteParams) -> RouteParams {
        self.calls.lock().await.push(params.values().to_vec());
        params
    }
}
