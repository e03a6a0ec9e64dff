/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
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
use std::sync::Arc;

use crate::message::Message;

/// A subscriber registered on the stream bus under a topic template.
#[async_trait]
pub trait TopicListener: Send + Sync {
    async fn on_receive(&self, message: Arc<Message>);

    /// Closed listeners are pruned from their topic group on the next dispatch.
    fn is_closed(&self) -> bool {
        false
    }
}

/// [`TopicListener`] adapter over a synchronous closure.
pub struct FnListener<F> {
    callback: F,
}

#[async_trait]
impl<F> TopicListener for FnListener<F>
where
    F: Fn(Arc<Message>) + Send + Sync,
{
    async fn on_receive(&self, message: Arc<Message>) {
        (self.callback)(message)
    }
}

pub fn listener_fn<F>(callback: F) -> Arc<dyn TopicListener>
where
    F: Fn(Arc<Message>) + Send + Sync + 'static,
{
    Arc::new(FnListener { callback })
}
