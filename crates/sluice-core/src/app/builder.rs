//! RecordProcessorBuilder - processor の構築と起動時検証
//!
//! # 学習ポイント
//! - Builder パターン（省略した設定はデフォルトの表で埋める）
//! - 起動時検証（Fail-fast 設計）: expect_origins() で必要な event source を宣言

use std::sync::Arc;

use serde_json::Value;

use super::processor::RecordProcessor;
use crate::config::ProcessorConfig;
use crate::domain::OriginTag;
use crate::extract::{
    BodyExtractors, EventSourceFn, IdExtractors, body_extractors, default_event_source,
    id_extractors,
};
use crate::ports::ItemHandler;

/// Builds a [`RecordProcessor`].
///
/// # 使用例
/// ```ignore
/// let processor = RecordProcessor::builder(handler)
///     .extract_id(IdExtractors::new().with("custom", id_at("/id")))
///     .extract_body(BodyExtractors::new().with("custom", body_at("/data")))
///     .expect_origins(&["custom"])
///     .build()?;
/// ```
///
/// Any table left unset falls back to the SNS/SQS defaults. Setting a table
/// replaces it wholesale, including extractors added earlier by
/// [`with_rules`](Self::with_rules).
pub struct RecordProcessorBuilder<H> {
    handler: H,
    id_extractors: Option<IdExtractors>,
    body_extractors: Option<BodyExtractors>,
    event_source: Option<EventSourceFn>,
    expected_origins: Option<Vec<OriginTag>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(
        "Missing extractors for event sources: {0:?}. These event sources were expected but need both an extractId and an extractBody function."
    )]
    MissingOrigins(Vec<String>),
}

impl<H: ItemHandler> RecordProcessorBuilder<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            id_extractors: None,
            body_extractors: None,
            event_source: None,
            expected_origins: None,
        }
    }

    pub fn extract_id(mut self, extractors: IdExtractors) -> Self {
        self.id_extractors = Some(extractors);
        self
    }

    pub fn extract_body(mut self, extractors: BodyExtractors) -> Self {
        self.body_extractors = Some(extractors);
        self
    }

    /// Override how a record's event source is read.
    pub fn event_source<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Option<OriginTag> + Send + Sync + 'static,
    {
        self.event_source = Some(Arc::new(f));
        self
    }

    /// Register the pointer-based extractors described by `config` on top of
    /// the current tables.
    pub fn with_rules(mut self, config: &ProcessorConfig) -> Self {
        let ids = self.id_extractors.get_or_insert_with(id_extractors);
        let bodies = self.body_extractors.get_or_insert_with(body_extractors);
        config.register(ids, bodies);
        self
    }

    /// Event sources that must be fully configured for `build()` to succeed.
    pub fn expect_origins(mut self, origins: &[&str]) -> Self {
        self.expected_origins = Some(origins.iter().map(|o| OriginTag::from(*o)).collect());
        self
    }

    /// Build the processor.
    ///
    /// # 検証
    /// - expect_origins() の event source が両方の表に登録されているか
    /// - 不足があれば BuildError::MissingOrigins
    pub fn build(self) -> Result<RecordProcessor<H>, BuildError> {
        if let Some(expected) = &self.expected_origins {
            let ids = self.id_extractors.as_ref();
            let bodies = self.body_extractors.as_ref();
            let defaults = (id_extractors(), body_extractors());
            let ids = ids.unwrap_or(&defaults.0);
            let bodies = bodies.unwrap_or(&defaults.1);

            let missing: Vec<String> = expected
                .iter()
                .filter(|o| !(ids.contains(o.as_str()) && bodies.contains(o.as_str())))
                .map(|o| o.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingOrigins(missing));
            }
        }
        Ok(self.into_processor())
    }

    pub(super) fn into_processor(self) -> RecordProcessor<H> {
        RecordProcessor {
            handler: self.handler,
            id_extractors: self.id_extractors.unwrap_or_else(id_extractors),
            body_extractors: self.body_extractors.unwrap_or_else(body_extractors),
            event_source: self
                .event_source
                .unwrap_or_else(|| Arc::new(default_event_source)),
        }
    }
}
