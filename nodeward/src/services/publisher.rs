//! In-process event publisher.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::broadcast;

use nodeward_shared::constants::messaging;

/// An event delivered to topic subscribers.
#[derive(Clone, Debug)]
pub struct Event {
    pub topic: String,
    pub payload: Value,
}

/// Topic-based pub/sub over broadcast channels.
///
/// Channels are created lazily per topic. Publishing to a topic with no
/// subscribers is a no-op; slow subscribers that fall more than the channel
/// capacity behind miss the oldest events.
#[derive(Debug)]
pub struct Publisher {
    topics: RwLock<HashMap<String, broadcast::Sender<Event>>>,
}

impl Publisher {
    pub fn new() -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
        }
    }

    fn sender(&self, topic: &str) -> broadcast::Sender<Event> {
        if let Some(sender) = self.topics.read().get(topic) {
            return sender.clone();
        }
        let mut topics = self.topics.write();
        topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(messaging::TOPIC_CAPACITY).0)
            .clone()
    }

    /// Subscribe to a topic.
    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Publish an event, returning the number of subscribers it reached.
    pub fn publish(&self, topic: &str, payload: Value) -> usize {
        let event = Event {
            topic: topic.to_string(),
            payload,
        };
        match self.sender(topic).send(event) {
            Ok(receivers) => receivers,
            Err(_) => 0,
        }
    }
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let publisher = Publisher::new();
        let mut rx = publisher.subscribe("head");

        let reached = publisher.publish("head", json!({"block": 7}));
        assert_eq!(reached, 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.topic, "head");
        assert_eq!(event.payload, json!({"block": 7}));
    }

    #[tokio::test]
    async fn topics_are_isolated() {
        let publisher = Publisher::new();
        let mut head_rx = publisher.subscribe("head");
        let mut finality_rx = publisher.subscribe("finality");

        publisher.publish("head", json!(1));

        assert_eq!(head_rx.recv().await.unwrap().payload, json!(1));
        assert!(matches!(
            finality_rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let publisher = Publisher::new();
        assert_eq!(publisher.publish("head", json!(1)), 0);
    }

    #[tokio::test]
    async fn multiple_subscribers_all_receive() {
        let publisher = Publisher::new();
        let mut a = publisher.subscribe("head");
        let mut b = publisher.subscribe("head");

        assert_eq!(publisher.publish("head", json!("x")), 2);
        assert_eq!(a.recv().await.unwrap().payload, json!("x"));
        assert_eq!(b.recv().await.unwrap().payload, json!("x"));
    }
}
