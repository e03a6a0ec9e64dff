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

use crate::chain::{Action, Sequence};
use crate::control_plane::connection_lifecycle::ConnectionLifecycle;
use crate::control_plane::connection_table::ConnectionTable;
use crate::data_plane::channel_listener::ChannelListener;
use crate::data_plane::topic_registry::{DispatchOutcome, TopicRegistry};
use crate::error::StreamError;
use crate::listener::TopicListener;
use crate::message::Message;
use crate::observability::{events, fields};
use crate::transport::StreamTransport;
use async_trait::async_trait;
use futures::channel::mpsc;
use serde_json::Value;
use std::sync::Arc;
use topic_pattern::{PatternError, ResolvedTarget, RoutePattern};
use tracing::{debug, info, warn};

const COMPONENT: &str = "stream_bus";

/// Topic carrying server-pushed template models.
pub const TEMPLATE_TOPIC: &str = "/template";

/// Decode-error location reported for chunks handed to [`StreamBus::receive_raw`].
const PULLED_URI: &str = "pulled";

struct BusInner {
    name: String,
    transport: Arc<dyn StreamTransport>,
    registry: Arc<TopicRegistry>,
    connections: ConnectionTable,
}

///
/// [`StreamBus`] fans inbound messages out to topic listeners and keeps at most
/// one push connection per resolved target.
///
/// Messages are routed by their `src` tag to the first registered topic
/// template that matches it; every listener in that group receives the
/// message in registration order. Later matching groups are not invoked.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use hash_streamer::{
///     listener_fn, ChunkListener, DispatchOutcome, Message, StreamBus, StreamHandle,
///     StreamTransport, TransportFailure,
/// };
/// use serde_json::json;
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
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let bus = StreamBus::new("dashboard", Arc::new(OfflineTransport));
/// bus.subscribe("feeds/:id", listener_fn(|message| println!("{:?}", message.payload())))
///     .await
///     .unwrap();
///
/// let outcome = bus.dispatch(Message::new("feeds/42", json!({ "title": "hello" }))).await;
/// assert!(matches!(outcome, DispatchOutcome::Delivered { listeners: 1, .. }));
/// # });
/// ```
#[derive(Clone)]
pub struct StreamBus {
    inner: Arc<BusInner>,
}

impl StreamBus {
    pub fn new(name: impl Into<String>, transport: Arc<dyn StreamTransport>) -> Self {
        let name = name.into();
        info!(
            event = events::STREAM_BUS_INIT,
            component = COMPONENT,
            bus = name.as_str(),
            "stream bus created"
        );
        Self {
            inner: Arc::new(BusInner {
                name,
                transport,
                registry: Arc::new(TopicRegistry::new()),
                connections: ConnectionTable::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    fn lifecycle(&self) -> ConnectionLifecycle<'_> {
        ConnectionLifecycle::new(
            &self.inner.connections,
            &self.inner.registry,
            self.inner.transport.as_ref(),
        )
    }

    /// Adds `listener` to the group of `template`; identical templates share a group.
    pub async fn subscribe(
        &self,
        template: &str,
        listener: Arc<dyn TopicListener>,
    ) -> Result<(), PatternError> {
        self.inner.registry.subscribe(template, listener).await
    }

    /// Exposes the deliveries of `template` as a sequence.
    ///
    /// Dropping the sequence detaches its listener on the next dispatch.
    pub async fn on_receive(
        &self,
        template: &str,
    ) -> Result<Sequence<Arc<Message>>, PatternError> {
        let (sender, receiver) = mpsc::unbounded();
        self.subscribe(template, Arc::new(ChannelListener::new(sender)))
            .await?;
        Ok(Sequence::new(receiver))
    }

    /// The `data` of every template model pushed under `model_name`.
    pub async fn on_receive_from_template(
        &self,
        model_name: &str,
    ) -> Result<Sequence<Value>, PatternError> {
        let model_name = model_name.to_string();
        Ok(self
            .on_receive(TEMPLATE_TOPIC)
            .await?
            .filter(move |message| {
                message.payload().get("name").and_then(Value::as_str) == Some(model_name.as_str())
            })
            .map(|message| message.payload().get("data").cloned().unwrap_or(Value::Null)))
    }

    pub async fn dispatch(&self, message: Message) -> DispatchOutcome {
        self.inner.registry.dispatch(message).await
    }

    /// Decodes a pulled chunk and dispatches it like a pushed one.
    pub async fn receive_raw(&self, data: &str) -> Result<DispatchOutcome, StreamError> {
        let message = Message::from_json(data).map_err(|source| StreamError::Decode {
            uri: PULLED_URI.to_string(),
            source,
        })?;
        Ok(self.dispatch(message).await)
    }

    pub async fn topics(&self) -> Vec<String> {
        self.inner.registry.topics().await
    }

    /// Opens a push connection on the resolved target unless one already covers it.
    ///
    /// Returns `true` when a new connection was made.
    pub async fn open<S: AsRef<str>>(
        &self,
        template: &str,
        args: &[S],
    ) -> Result<bool, StreamError> {
        let target = topic_pattern::resolve(template, args)?;
        self.open_target(&target).await
    }

    /// Closes every connection opened under the shape of `template`.
    ///
    /// A no-op when the fully resolved target is itself already connected.
    /// Returns the closed keys.
    pub async fn close<S: AsRef<str>>(
        &self,
        template: &str,
        args: &[S],
    ) -> Result<Vec<String>, StreamError> {
        let pattern = RoutePattern::compile(template)?;
        let target = pattern.resolve(args);
        Ok(self.lifecycle().close(&pattern, &target).await)
    }

    /// Requests the resolved target once and dispatches every returned message.
    ///
    /// Returns the number of messages dispatched.
    pub async fn fetch<S: AsRef<str>>(
        &self,
        template: &str,
        args: &[S],
    ) -> Result<usize, StreamError> {
        let target = topic_pattern::resolve(template, args)?;
        self.fetch_target(&target).await
    }

    pub async fn is_connected(&self, target: &str) -> bool {
        self.inner.connections.lock().await.is_connected(target)
    }

    pub async fn open_connections(&self) -> Vec<String> {
        self.inner.connections.lock().await.keys()
    }

    /// Continuation step opening a stream with arguments built from its input.
    pub fn stream_action<F>(&self, template: &str, build: F) -> Result<BusAction<F>, PatternError> {
        self.action(template, BusOperation::Stream, build)
    }

    /// Continuation step closing streams with arguments built from its input.
    pub fn close_action<F>(&self, template: &str, build: F) -> Result<BusAction<F>, PatternError> {
        self.action(template, BusOperation::Close, build)
    }

    /// Continuation step fetching once with arguments built from its input.
    pub fn fetch_action<F>(&self, template: &str, build: F) -> Result<BusAction<F>, PatternError> {
        self.action(template, BusOperation::Fetch, build)
    }

    fn action<F>(
        &self,
        template: &str,
        operation: BusOperation,
        build: F,
    ) -> Result<BusAction<F>, PatternError> {
        Ok(BusAction {
            bus: self.clone(),
            pattern: Arc::new(RoutePattern::compile(template)?),
            operation,
            build,
        })
    }

    async fn open_target(&self, target: &ResolvedTarget) -> Result<bool, StreamError> {
        Ok(self.lifecycle().open(&target.uri).await?)
    }

    async fn fetch_target(&self, target: &ResolvedTarget) -> Result<usize, StreamError> {
        let uri = target.uri.as_str();
        debug!(
            event = events::FETCH_START,
            component = COMPONENT,
            uri,
            "fetching"
        );

        let body = match self.inner.transport.request(uri).await {
            Ok(body) => body,
            Err(err) => {
                warn!(
                    event = events::FETCH_FAILED,
                    component = COMPONENT,
                    uri,
                    err = %err,
                    "fetch failed"
                );
                return Err(err.into());
            }
        };

        let messages: Vec<Message> = match serde_json::from_str(&body) {
            Ok(messages) => messages,
            Err(source) => {
                warn!(
                    event = events::FETCH_DECODE_FAILED,
                    component = COMPONENT,
                    uri,
                    err = %source,
                    "fetched body is not a message batch"
                );
                return Err(StreamError::Decode {
                    uri: uri.to_string(),
                    source,
                });
            }
        };

        let count = messages.len();
        for message in messages {
            self.dispatch(message).await;
        }

        info!(
            event = events::FETCH_OK,
            component = COMPONENT,
            uri,
            messages = count,
            "fetch dispatched"
        );
        Ok(count)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum BusOperation {
    Stream,
    Close,
    Fetch,
}

impl BusOperation {
    fn as_str(self) -> &'static str {
        match self {
            BusOperation::Stream => "stream",
            BusOperation::Close => "close",
            BusOperation::Fetch => "fetch",
        }
    }
}

/// Stream bus operation packaged as a continuation step.
///
/// Failures are logged and swallowed; the step always passes its input on.
pub struct BusAction<F> {
    bus: StreamBus,
    pattern: Arc<RoutePattern>,
    operation: BusOperation,
    build: F,
}

#[async_trait]
impl<I, F> Action<I> for BusAction<F>
where
    I: Send + 'static,
    F: Fn(&I) -> Vec<String> + Send + Sync,
{
    type Output = I;

    async fn run(&self, input: I) -> I {
        let args = (self.build)(&input);
        let target = self.pattern.resolve(&args);

        let result = match self.operation {
            BusOperation::Stream => self.bus.open_target(&target).await.map(drop),
            BusOperation::Close => {
                self.bus.lifecycle().close(&self.pattern, &target).await;
                Ok(())
            }
            BusOperation::Fetch => self.bus.fetch_target(&target).await.map(drop),
        };

        if let Err(err) = result {
            warn!(
                event = events::ACTION_FAILURE_SWALLOWED,
                component = COMPONENT,
                operation = self.operation.as_str(),
                template = self.pattern.raw(),
                params = %fields::format_keys(&args),
                err = %err,
                "continuing chain after failure"
            );
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::{StreamBus, TEMPLATE_TOPIC};
    use crate::chain::Action;
    use crate::error::{StreamError, TransportFailure};
    use crate::message::Message;
    use crate::transport::{ChunkListener, StreamHandle, StreamTransport};
    use crate::DispatchOutcome;
    use async_trait::async_trait;
    use futures::StreamExt;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct CountingTransport {
        connects: Mutex<Vec<String>>,
        closes: Arc<Mutex<Vec<String>>>,
    }

    struct CountingHandle {
        key: String,
        closes: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl StreamHandle for CountingHandle {
        async fn close(&self) {
            self.closes.lock().unwrap().push(self.key.clone());
        }
    }

    #[async_trait]
    impl StreamTransport for CountingTransport {
        async fn connect(
            &self,
            uri: &str,
            _listener: Arc<dyn ChunkListener>,
        ) -> Result<Box<dyn StreamHandle>, TransportFailure> {
            self.connects.lock().unwrap().push(uri.to_string());
            Ok(Box::new(CountingHandle {
                key: uri.to_string(),
                closes: self.closes.clone(),
            }))
        }

        async fn request(&self, uri: &str) -> Result<String, TransportFailure> {
            match uri {
                "/feeds/last" => Ok(r#"[{"src":"feeds/1"},{"src":"feeds/2"}]"#.to_string()),
                "/feeds/garbled" => Ok("{".to_string()),
                _ => Err(TransportFailure::new(uri, "status 404")),
            }
        }
    }

    #[tokio::test]
    async fn open_dedups_and_close_is_broad() {
        let transport = Arc::new(CountingTransport::default());
        let bus = StreamBus::new("test", transport.clone());

        assert!(bus.open("stream/:p", &["A"]).await.expect("open should succeed"));
        assert!(!bus.open("stream/:p", &["A"]).await.expect("open should succeed"));
        assert!(bus.open("stream/:p", &["B"]).await.expect("open should succeed"));
        assert_eq!(*transport.connects.lock().unwrap(), vec!["stream/A", "stream/B"]);

        let kept = bus
            .close("stream/:p", &["A"])
            .await
            .expect("close should succeed");
        assert!(kept.is_empty());
        assert_eq!(bus.open_connections().await, vec!["stream/A", "stream/B"]);

        let closed = bus
            .close("stream/:p", &["C"])
            .await
            .expect("close should succeed");
        assert_eq!(closed, vec!["stream/A", "stream/B"]);
        assert!(bus.open_connections().await.is_empty());
        assert_eq!(*transport.closes.lock().unwrap(), vec!["stream/A", "stream/B"]);
    }

    #[tokio::test]
    async fn fetch_dispatches_each_message() {
        let bus = StreamBus::new("test", Arc::new(CountingTransport::default()));
        let received = bus.on_receive("feeds/:id").await.expect("template should compile");

        let count = bus
            .fetch("/feeds/:which", &["last"])
            .await
            .expect("fetch should succeed");

        assert_eq!(count, 2);
        let sources: Vec<String> = received
            .take(2)
            .map(|message| message.source().unwrap_or_default().to_string())
            .collect()
            .await;
        assert_eq!(sources, vec!["feeds/1", "feeds/2"]);
    }

    #[tokio::test]
    async fn fetch_reports_transport_and_decode_failures() {
        let bus = StreamBus::new("test", Arc::new(CountingTransport::default()));

        assert!(matches!(
            bus.fetch("/feeds/:which", &["missing"]).await,
            Err(StreamError::Transport(_))
        ));
        assert!(matches!(
            bus.fetch("/feeds/:which", &["garbled"]).await,
            Err(StreamError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn template_models_are_filtered_by_name() {
        let bus = StreamBus::new("test", Arc::new(CountingTransport::default()));
        let models = bus
            .on_receive_from_template("feed")
            .await
            .expect("template topic should compile");

        bus.dispatch(Message::new(
            TEMPLATE_TOPIC,
            json!({ "name": "inbox", "data": 1 }),
        ))
        .await;
        bus.dispatch(Message::new(
            TEMPLATE_TOPIC,
            json!({ "name": "feed", "data": { "items": 3 } }),
        ))
        .await;

        let first = models.into_stream().next().await;
        assert_eq!(first, Some(json!({ "items": 3 })));
    }

    #[tokio::test]
    async fn receive_raw_decodes_then_dispatches() {
        let bus = StreamBus::new("test", Arc::new(CountingTransport::default()));

        assert_eq!(
            bus.receive_raw(r#"{"src":"feeds/1"}"#)
                .await
                .expect("chunk should decode"),
            DispatchOutcome::NoMatch {
                source: "feeds/1".to_string()
            }
        );
        assert!(bus.receive_raw("nope").await.is_err());
    }

    #[tokio::test]
    async fn fetch_action_swallows_failures_and_passes_input_on() {
        let bus = StreamBus::new("test", Arc::new(CountingTransport::default()));
        let step = bus
            .fetch_action("/feeds/:which", |which: &String| vec![which.clone()])
            .expect("template should compile");

        assert_eq!(step.run("missing".to_string()).await, "missing");
    }

    #[tokio::test]
    async fn stream_and_close_actions_drive_connections() {
        let bus = StreamBus::new("test", Arc::new(CountingTransport::default()));
        let open = bus
            .stream_action("/dashboard/:project/listen", |project: &u32| {
                vec![project.to_string()]
            })
            .expect("template should compile");
        let close = bus
            .close_action("/dashboard/:project/listen", |project: &u32| {
                vec![project.to_string()]
            })
            .expect("template should compile");

        assert_eq!(open.run(1u32).await, 1);
        assert_eq!(close.run(2u32).await, 2);
        assert!(bus.open_connections().await.is_empty());

        open.run(2u32).await;
        assert!(bus.is_connected("/dashboard/2/listen").await);
    }
}
