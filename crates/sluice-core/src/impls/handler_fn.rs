//! Closure adapters for [`ItemHandler`].
//!
//! - `handler_fn`: async closure `Fn(Value) -> impl Future<Output = Result<O, E>>`
//! - `sync_handler_fn`: plain closure `Fn(Value) -> Result<O, E>`
//! - `json_handler_fn`: payload を T にデコードしてから async closure を呼ぶ

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::RecordError;
use crate::ports::ItemHandler;

pub struct FnHandler<F> {
    f: F,
}

pub fn handler_fn<F, Fut, O, E>(f: F) -> FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, E>> + Send,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut, O, E> ItemHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, E>> + Send,
    O: Send,
    E: From<RecordError> + Send,
{
    type Output = O;
    type Error = E;

    async fn handle(&self, payload: Value) -> Result<O, E> {
        (self.f)(payload).await
    }
}

pub struct SyncFnHandler<F> {
    f: F,
}

pub fn sync_handler_fn<F, O, E>(f: F) -> SyncFnHandler<F>
where
    F: Fn(Value) -> Result<O, E> + Send + Sync,
{
    SyncFnHandler { f }
}

#[async_trait]
impl<F, O, E> ItemHandler for SyncFnHandler<F>
where
    F: Fn(Value) -> Result<O, E> + Send + Sync,
    O: Send,
    E: From<RecordError> + Send,
{
    type Output = O;
    type Error = E;

    async fn handle(&self, payload: Value) -> Result<O, E> {
        (self.f)(payload)
    }
}

/// Decodes the payload into `T` before calling the closure.
///
/// SNS/SQS bodies arrive as strings, so a string payload is parsed as JSON
/// text first; if that fails it is decoded as a plain JSON string (which lets
/// `T = String` through). Other payloads are decoded with `from_value`.
pub struct JsonHandler<T, F> {
    f: F,
    _marker: PhantomData<fn(T)>,
}

pub fn json_handler_fn<T, F, Fut, O, E>(f: F) -> JsonHandler<T, F>
where
    T: DeserializeOwned + Send,
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, E>> + Send,
{
    JsonHandler {
        f,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<T, F, Fut, O, E> ItemHandler for JsonHandler<T, F>
where
    T: DeserializeOwned + Send,
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, E>> + Send,
    O: Send,
    E: From<RecordError> + Send,
{
    type Output = O;
    type Error = E;

    async fn handle(&self, payload: Value) -> Result<O, E> {
        let item = decode_payload::<T>(payload)?;
        (self.f)(item).await
    }
}

pub fn decode_payload<T: DeserializeOwned>(payload: Value) -> Result<T, RecordError> {
    let decoded = match payload {
        Value::String(text) => match serde_json::from_str(&text) {
            Ok(item) => Ok(item),
            Err(_) => serde_json::from_value(Value::String(text)),
        },
        other => serde_json::from_value(other),
    };
    decoded.map_err(|e| RecordError::PayloadDecode(e.to_string()))
}
