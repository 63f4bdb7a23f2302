//! Errors - レコード処理のエラー分類
//!
//! - `RecordError`: 設定不備・データ不備（batch 全体を中断する）
//! - handler のエラー: ラップせずにそのまま返す
//!
//! Handlers declare their own error type; it only has to accept a
//! `RecordError` (`From<RecordError>`) so the processor can report both kinds
//! through one `Result`. `DispatchError` is a ready-made choice for closures.

use std::fmt;

use thiserror::Error;

use super::origin::OriginTag;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which extractor table lacks an entry for an event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingExtractor {
    Id,
    Body,
    Both,
}

impl MissingExtractor {
    /// `None` when both extractors are present.
    pub fn detect(has_id: bool, has_body: bool) -> Option<Self> {
        match (has_id, has_body) {
            (true, true) => None,
            (false, true) => Some(Self::Id),
            (true, false) => Some(Self::Body),
            (false, false) => Some(Self::Both),
        }
    }
}

impl fmt::Display for MissingExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => f.write_str("extractId"),
            Self::Body => f.write_str("extractBody"),
            Self::Both => f.write_str("extractId and extractBody"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The record's event source has no id and/or body extractor.
    /// `origin` is `None` when the record carries no event source at all.
    #[error(
        "Lambda record processor not properly configured to handle event source \"{}\". Need to provide both an extractId and an extractBody function for this event source.",
        origin_label(.origin)
    )]
    MisconfiguredOrigin {
        origin: Option<OriginTag>,
        missing: MissingExtractor,
    },

    #[error("record {index} from event source \"{origin}\" did not yield an identifier")]
    MissingIdentifier { origin: OriginTag, index: usize },

    #[error("failed to decode payload: {0}")]
    PayloadDecode(String),
}

impl RecordError {
    pub fn misconfigured(origin: Option<OriginTag>, missing: MissingExtractor) -> Self {
        Self::MisconfiguredOrigin { origin, missing }
    }

    /// The event source the error is about, if any.
    pub fn origin(&self) -> Option<&OriginTag> {
        match self {
            Self::MisconfiguredOrigin { origin, .. } => origin.as_ref(),
            Self::MissingIdentifier { origin, .. } => Some(origin),
            Self::PayloadDecode(_) => None,
        }
    }
}

fn origin_label(origin: &Option<OriginTag>) -> &str {
    origin.as_ref().map_or("<none>", OriginTag::as_str)
}

/// General-purpose error type for closure handlers.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("{0}")]
    Handler(#[source] BoxError),
}

impl DispatchError {
    pub fn handler(err: impl Into<BoxError>) -> Self {
        Self::Handler(err.into())
    }

    pub fn as_record_error(&self) -> Option<&RecordError> {
        match self {
            Self::Record(e) => Some(e),
            Self::Handler(_) => None,
        }
    }
}
