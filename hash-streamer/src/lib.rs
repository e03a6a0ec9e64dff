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

//! # hash-streamer
//!
//! `hash-streamer` is a pattern-routed pub/sub core for a client that is driven
//! by a location token and by server push channels.
//!
//! Typical usage is centered on [`Router`] and [`StreamBus`]: route chains
//! react to the location, and call into the bus to switch streams on and off
//! or to fetch a snapshot once.
//!
//! ```
//! use async_trait::async_trait;
//! use hash_streamer::{
//!     sync_action_fn, ActionExt, ChunkListener, MemoryLocation, RouteParams, RouteStep, Router,
//!     StreamBus, StreamHandle, StreamTransport, TransportFailure,
//! };
//! use std::sync::Arc;
//!
//! # struct NoopHandle;
//! # #[async_trait]
//! # impl StreamHandle for NoopHandle {
//! #     async fn close(&self) {}
//! # }
//! struct NoopTransport;
//!
//! #[async_trait]
//! impl StreamTransport for NoopTransport {
//!     async fn connect(
//!         &self,
//!         _uri: &str,
//!         _listener: Arc<dyn ChunkListener>,
//!     ) -> Result<Box<dyn StreamHandle>, TransportFailure> {
//!         Ok(Box::new(NoopHandle))
//!     }
//!
//!     async fn request(&self, _uri: &str) -> Result<String, TransportFailure> {
//!         Ok("[]".to_string())
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let (location, events) = MemoryLocation::new("dashboard/past/42");
//! let router = Router::new("dashboard", location);
//! let bus = StreamBus::new("dashboard", Arc::new(NoopTransport));
//!
//! let project = |params: &RouteParams| vec![params[0].clone()];
//! let steps: Vec<RouteStep> = vec![
//!     bus.close_action("/dashboard/:project/listen", project).unwrap().boxed(),
//!     bus.stream_action("/dashboard/:project/listen", project).unwrap().boxed(),
//!     bus.fetch_action("/dashboard/:project/last", project).unwrap().boxed(),
//!     sync_action_fn(|params: RouteParams| params).boxed(),
//! ];
//! router.when("dashboard/past/:project").chain(steps).await.unwrap();
//!
//! assert_eq!(bus.open_connections().await, vec!["/dashboard/42/listen"]);
//! # drop(events);
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - API facade: outward `Router`/`StreamBus` surface
//! - Navigation: location surface, route subscriptions and replay
//! - Control plane: connection dedup and broad-close lifecycle
//! - Data plane: topic registry, ingress decoding and first-match dispatch
//! - Chain: `Action` continuations and the `Sequence` push stream
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events.
//! Library code emits events and does not initialize a global subscriber.
//! Binaries and tests are responsible for one-time `tracing_subscriber`
//! initialization at process boundaries.

mod chain;
pub use chain::{
    action_fn, sync_action_fn, Action, ActionExt, And, BoxAction, FnAction, Sequence,
    SyncFnAction, Then,
};

mod control_plane;
mod data_plane;
pub use data_plane::topic_registry::DispatchOutcome;

mod error;
pub use error::{StreamError, TransportFailure};

mod listener;
pub use listener::{listener_fn, FnListener, TopicListener};

mod message;
pub use message::{Message, SOURCE_FIELD};

mod navigation;
pub use navigation::{
    ChainHandle, GoAction, LocationSurface, MemoryLocation, NavigationEvent, NavigationEvents,
    RouteBinder, RouteStep, Router,
};

#[doc(hidden)]
pub mod observability;

mod stream_bus;
pub use stream_bus::{BusAction, StreamBus, TEMPLATE_TOPIC};

mod transport;
pub use transport::{ChunkListener, StreamHandle, StreamTransport};

pub use topic_pattern::{compile, PatternError, ResolvedTarget, RouteParams, RoutePattern};
