//! Topic listener that forwards deliveries into a channel-backed sequence.

use crate::listener::TopicListener;
use crate::message::Message;
use async_trait::async_trait;
use futures::channel::mpsc::UnboundedSender;
use std::sync::Arc;

pub(crate) struct ChannelListener {
    sender: UnboundedSender<Arc<Message>>,
}

impl ChannelListener {
    pub(crate) fn new(sender: UnboundedSender<Arc<Message>>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl TopicListener for ChannelListener {
    async fn on_receive(&self, message: Arc<Message>) {
        // A dropped receiver is detected through `is_closed` on the next dispatch.
        let _ = self.sender.unbounded_send(message);
    }

    fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::ChannelListener;
    use crate::listener::TopicListener;
    use crate::message::Message;
    use futures::channel::mpsc;
    use futures::StreamExt;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn forwards_until_receiver_is_dropped() {
        let (sender, mut receiver) = mpsc::unbounded();
        let listener = ChannelListener::new(sender);

        listener
            .on_receive(Arc::new(Message::new("/template", json!({}))))
            .await;
        let message = receiver.next().await.expect("message should be forwarded");
        assert_eq!(message.source(), Some("/template"));
        assert!(!listener.is_closed());

        drop(receiver);
        assert!(listener.is_closed());
    }
}
