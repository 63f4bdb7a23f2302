//! InMemoryPublisher - 開発・テスト用の配送先
//!
//! publish されたメッセージを Vec に溜めるだけ。message id は IdGenerator、
//! 時刻は Clock から取るので、テストでは FixedClock で固定できる。

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::MessageId;
use crate::ports::{
    Clock, IdGenerator, PublishError, Publisher, SystemClock, UlidGenerator,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMessage {
    pub message_id: MessageId,
    pub destination: String,
    pub message: String,
    pub published_at: DateTime<Utc>,
}

pub struct InMemoryPublisher<C = SystemClock, G = UlidGenerator<SystemClock>> {
    clock: C,
    ids: G,
    /// Destinations that accept messages; `None` accepts everything.
    known_destinations: Option<HashSet<String>>,
    published: Mutex<Vec<PublishedMessage>>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::with_parts(SystemClock, UlidGenerator::new(SystemClock))
    }
}

impl Default for InMemoryPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, G: IdGenerator> InMemoryPublisher<C, G> {
    pub fn with_parts(clock: C, ids: G) -> Self {
        Self {
            clock,
            ids,
            known_destinations: None,
            published: Mutex::new(Vec::new()),
        }
    }

    /// Reject messages for any destination not listed here.
    pub fn restrict_to<I, S>(mut self, destinations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_destinations = Some(destinations.into_iter().map(Into::into).collect());
        self
    }

    /// Snapshot of everything published so far, oldest first.
    pub async fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().await.clone()
    }
}

#[async_trait]
impl<C: Clock, G: IdGenerator> Publisher for InMemoryPublisher<C, G> {
    async fn publish(&self, destination: &str, message: String) -> Result<String, PublishError> {
        if let Some(known) = &self.known_destinations
            && !known.contains(destination)
        {
            return Err(PublishError::Rejected(format!("unknown destination {destination}")));
        }

        let entry = PublishedMessage {
            message_id: self.ids.generate_message_id(),
            destination: destination.to_string(),
            message,
            published_at: self.clock.now(),
        };
        let id = entry.message_id.to_string();
        self.published.lock().await.push(entry);
        Ok(id)
    }
}
