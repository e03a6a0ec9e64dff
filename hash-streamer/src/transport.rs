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

//! Transport collaborator contract used by the stream bus.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::TransportFailure;

/// Receives raw chunks pushed by an open stream connection.
#[async_trait]
pub trait ChunkListener: Send + Sync {
    async fn on_chunk(&self, data: String);
}

/// An open push channel. Closing stops future deliveries only.
#[async_trait]
pub trait StreamHandle: Send + Sync {
    async fn close(&self);
}

/// Push-channel and one-shot request primitives, addressed by resolved URI.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use hash_streamer::{ChunkListener, StreamHandle, StreamTransport, TransportFailure};
/// use std::sync::Arc;
///
/// struct OfflineTransport;
///
/// #[async_trait]
/// impl StreamTransport for OfflineTransport {
///     async fn connect(
///         &self,
///         uri: &str,
///         _listener: Arc<dyn ChunkListener>,
///     ) -> Result<Box<dyn StreamHandle>, TransportFailure> {
///         Err(TransportFailure::new(uri, "offline"))
///     }
///
///     async fn request(&self, uri: &str) -> Result<String, TransportFailure> {
///         Err(TransportFailure::new(uri, "offline"))
///     }
/// }
/// ```
#[async_trait]
pub trait StreamTransport: Send + Sync {
    /// Opens a push channel on `uri`; every inbound chunk goes to `listener`.
    async fn connect(
        &self,
        uri: &str,
        listener: Arc<dyn ChunkListener>,
    ) -> Result<Box<dyn StreamHandle>, TransportFailure>;

    /// Performs a one-shot request and returns the raw response body.
    async fn request(&self, uri: &str) -> Result<String, TransportFailure>;
}
