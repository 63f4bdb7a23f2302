//! Publisher port - broadcast メッセージの配送先
//!
//! 本番では SNS の publish に相当する実装を差し込む。
//! 開発・テスト用には `impls::InMemoryPublisher` を使う。

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("destination rejected message: {0}")]
    Rejected(String),

    #[error("publish failed: {0}")]
    Failed(String),
}

/// Delivers a serialized message to a destination address and returns the
/// message id assigned by the delivery service.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, destination: &str, message: String) -> Result<String, PublishError>;
}

#[async_trait]
impl<P: Publisher> Publisher for Arc<P> {
    async fn publish(&self, destination: &str, message: String) -> Result<String, PublishError> {
        (**self).publish(destination, message).await
    }
}
