//! Broadcaster - concern ごとの配送先へイベントを publish する
//!
//! A concern is a named notification category; the configuration maps each
//! concern to a destination address (e.g. a topic ARN). The published message
//! is the JSON text of `{ "concern", "event", "meta" }`.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument};

use crate::ports::{PublishError, Publisher};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastConfig {
    /// concern -> destination address
    #[serde(default, alias = "arns")]
    pub destinations: Option<HashMap<String, String>>,
}

impl BroadcastConfig {
    pub fn new<I, K, V>(destinations: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            destinations: Some(
                destinations
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("No or invalid list of destinations provided to broadcaster.")]
    NoDestinations,

    #[error("Invalid concern specified: \"{concern}\". Available concerns: {available}.")]
    InvalidConcern { concern: String, available: String },

    #[error("failed to encode broadcast message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

#[derive(Serialize)]
struct BroadcastMessage<'a> {
    concern: &'a str,
    event: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a Value>,
}

pub struct Broadcaster<P> {
    destinations: BTreeMap<String, String>,
    publisher: P,
}

impl<P: Publisher> Broadcaster<P> {
    /// Fails when the destination table is missing or empty.
    pub fn new(config: BroadcastConfig, publisher: P) -> Result<Self, BroadcastError> {
        let destinations: BTreeMap<String, String> = config
            .destinations
            .ok_or(BroadcastError::NoDestinations)?
            .into_iter()
            .collect();
        if destinations.is_empty() {
            return Err(BroadcastError::NoDestinations);
        }
        Ok(Self {
            destinations,
            publisher,
        })
    }

    /// Configured concerns, sorted.
    pub fn concerns(&self) -> Vec<&str> {
        self.destinations.keys().map(String::as_str).collect()
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Publish `event` (and optional `meta`) under `concern`; returns the
    /// message id assigned by the publisher.
    #[instrument(name = "broadcaster_broadcast", skip(self, event, meta))]
    pub async fn broadcast(
        &self,
        concern: &str,
        event: &Value,
        meta: Option<&Value>,
    ) -> Result<String, BroadcastError> {
        let Some(destination) = self.destinations.get(concern) else {
            return Err(BroadcastError::InvalidConcern {
                concern: concern.to_string(),
                available: self.concerns().join(", "),
            });
        };

        let message = serde_json::to_string(&BroadcastMessage {
            concern,
            event,
            meta,
        })?;
        let message_id = self.publisher.publish(destination, message).await?;

        info!(concern, destination = %destination, message_id = %message_id, "event broadcast");
        Ok(message_id)
    }
}
