//! sluice-core
//!
//! Normalizes batches of event-source records (SNS, SQS, ...) into calls of a
//! single item handler and aggregates the results by record identifier.
//!
//! # モジュール構成
//! - **domain**: OriginTag, Batch, RecordError などのドメイン型
//! - **extract**: event source ごとの id / body extractor の表とデフォルト
//! - **app**: RecordProcessor と builder
//! - **ports**: ItemHandler, Publisher, Clock, IdGenerator
//! - **impls**: closure handler、InMemoryPublisher
//! - **config**: TOML から読む origin ルール
//! - **http**: API Gateway リクエストの正規化とレスポンス変換
//! - **broadcast**: concern ごとの配送先への publish

pub mod app;
pub mod broadcast;
pub mod config;
pub mod domain;
pub mod extract;
pub mod http;
pub mod impls;
pub mod ports;

pub use app::{BuildError, RecordProcessor, RecordProcessorBuilder};
pub use broadcast::{BroadcastConfig, BroadcastError, Broadcaster};
pub use config::{ConfigError, OriginRule, ProcessorConfig};
pub use domain::{Batch, DispatchError, OriginTag, ProcessedRecords, RecordError};
pub use extract::{BodyExtractors, IdExtractors, body_extractors, default_event_source, id_extractors};
pub use ports::ItemHandler;
