//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **handler_fn / sync_handler_fn / json_handler_fn**: closure を ItemHandler にする
//! - **InMemoryPublisher**: 開発・テスト用の Publisher
//!
//! 本番の Publisher（SNS client など）はこのクレートには置かない。

pub mod handler_fn;
pub mod inmem_publisher;

pub use self::handler_fn::{
    FnHandler, JsonHandler, SyncFnHandler, decode_payload, handler_fn, json_handler_fn,
    sync_handler_fn,
};
pub use self::inmem_publisher::{InMemoryPublisher, PublishedMessage};
