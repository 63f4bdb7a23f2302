//! ItemHandler port - payload を処理するユーザー関数
//!
//! # 学習ポイント
//! - 関連型 (`Output`, `Error`) で handler ごとに結果とエラーの型を決める
//! - `Error: From<RecordError>` により processor は `?` だけで両方を返せる

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::RecordError;

/// Business logic applied to every payload of a batch, whatever its origin.
///
/// # 使用例
/// ```ignore
/// struct Echo;
///
/// #[async_trait]
/// impl ItemHandler for Echo {
///     type Output = Value;
///     type Error = DispatchError;
///
///     async fn handle(&self, payload: Value) -> Result<Value, DispatchError> {
///         Ok(payload)
///     }
/// }
/// ```
///
/// Synchronous logic can be wrapped with `impls::sync_handler_fn`.
#[async_trait]
pub trait ItemHandler: Send + Sync {
    type Output: Send;
    type Error: From<RecordError> + Send;

    async fn handle(&self, payload: Value) -> Result<Self::Output, Self::Error>;
}

#[async_trait]
impl<H: ItemHandler> ItemHandler for Arc<H> {
    type Output = H::Output;
    type Error = H::Error;

    async fn handle(&self, payload: Value) -> Result<Self::Output, Self::Error> {
        (**self).handle(payload).await
    }
}
