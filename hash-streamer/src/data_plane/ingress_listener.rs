//! Connection listener adapter that decodes pushed chunks and feeds dispatch.

use crate::data_plane::topic_registry::TopicRegistry;
use crate::message::Message;
use crate::observability::{events, fields};
use crate::transport::ChunkListener;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

const COMPONENT: &str = "ingress_listener";

#[derive(Clone)]
pub(crate) struct IngressListener {
    key: String,
    registry: Arc<TopicRegistry>,
}

impl IngressListener {
    pub(crate) fn new(key: &str, registry: Arc<TopicRegistry>) -> Self {
        Self {
            key: key.to_string(),
            registry,
        }
    }
}

#[async_trait]
impl ChunkListener for IngressListener {
    async fn on_chunk(&self, data: String) {
        let key = self.key.as_str();

        match Message::from_json(&data) {
            Ok(message) => {
                debug!(
                    event = events::INGRESS_RECEIVE,
                    component = COMPONENT,
                    key,
                    src = %fields::format_source(&message),
                    bytes = data.len(),
                    "received chunk"
                );
                self.registry.dispatch(message).await;
            }
            Err(err) => {
                warn!(
                    event = events::INGRESS_DECODE_FAILED,
                    component = COMPONENT,
                    key,
                    err = %err,
                    "dropping undecodable chunk"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IngressListener;
    use crate::data_plane::topic_registry::TopicRegistry;
    use crate::listener::listener_fn;
    use crate::transport::ChunkListener;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn decoded_chunks_reach_the_registry() {
        let registry = Arc::new(TopicRegistry::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        registry
            .subscribe(
                "/dashboard/:project/listen",
                listener_fn(move |message| {
                    sink.lock().unwrap().push(message.payload()["line"].clone());
                }),
            )
            .await
            .expect("template should compile");

        let listener = IngressListener::new("/dashboard/42/listen", registry);
        listener
            .on_chunk(r#"{"src":"/dashboard/42/listen","line":"boot"}"#.to_string())
            .await;
        listener.on_chunk("not json".to_string()).await;

        assert_eq!(*seen.lock().unwrap(), vec![serde_json::json!("boot")]);
    }
}
