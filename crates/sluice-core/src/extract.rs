//! Extractors - event source ごとの id / body の取り出し方
//!
//! 2 つの表（id 用と body 用）を event source で引く。新しい event source は
//! 条件分岐を書き足すのではなく、表に登録して追加する。
//!
//! The default tables are built by factory functions ([`id_extractors`],
//! [`body_extractors`]) so every processor starts from its own copy.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};

use crate::domain::OriginTag;
use crate::domain::origin::{SNS, SQS};

/// A pure projection from a record to one of its fields.
pub type Extractor<T> = Arc<dyn Fn(&Value) -> T + Send + Sync>;

/// Projection from a record to its event source.
pub type EventSourceFn = Arc<dyn Fn(&Value) -> Option<OriginTag> + Send + Sync>;

/// event source -> extractor の表
pub struct ExtractorTable<T> {
    extractors: HashMap<OriginTag, Extractor<T>>,
}

/// Identifier extractors. `None` means the record carries no usable id.
pub type IdExtractors = ExtractorTable<Option<String>>;

/// Payload extractors. Absent fields project to `Value::Null`.
pub type BodyExtractors = ExtractorTable<Value>;

impl<T> ExtractorTable<T> {
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<F>(mut self, origin: impl Into<OriginTag>, extractor: F) -> Self
    where
        F: Fn(&Value) -> T + Send + Sync + 'static,
    {
        self.register(origin, extractor);
        self
    }

    /// Register an extractor, replacing (and returning) any previous one for
    /// the same event source.
    pub fn register<F>(&mut self, origin: impl Into<OriginTag>, extractor: F) -> Option<Extractor<T>>
    where
        F: Fn(&Value) -> T + Send + Sync + 'static,
    {
        self.extractors.insert(origin.into(), Arc::new(extractor))
    }

    pub fn remove(&mut self, origin: &str) -> Option<Extractor<T>> {
        self.extractors.remove(origin)
    }

    pub fn get(&self, origin: &str) -> Option<&Extractor<T>> {
        self.extractors.get(origin)
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.extractors.contains_key(origin)
    }

    /// Registered event sources, sorted.
    pub fn origins(&self) -> Vec<OriginTag> {
        let mut origins: Vec<OriginTag> = self.extractors.keys().cloned().collect();
        origins.sort();
        origins
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl<T> Default for ExtractorTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ExtractorTable<T> {
    fn clone(&self) -> Self {
        Self {
            extractors: self.extractors.clone(),
        }
    }
}

impl<T> fmt::Debug for ExtractorTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorTable")
            .field("origins", &self.origins())
            .finish()
    }
}

/// Default identifier extractors: SNS nests the id under the notification,
/// SQS exposes it at the top level.
pub fn id_extractors() -> IdExtractors {
    IdExtractors::new()
        .with(SNS, id_at("/Sns/MessageId"))
        .with(SQS, id_at("/messageId"))
}

/// Default payload extractors, mirroring [`id_extractors`].
pub fn body_extractors() -> BodyExtractors {
    BodyExtractors::new()
        .with(SNS, body_at("/Sns/Message"))
        .with(SQS, body_at("/body"))
}

/// Reads the event source of a record.
///
/// SQS records spell the field `eventSource`, SNS records `EventSource`.
/// Both are checked, capitalized first. The first truthy scalar wins: a
/// non-empty string, a non-zero number or `true`. Numbers and booleans are
/// rendered as text so an unknown source can still be named in the error.
pub fn default_event_source(record: &Value) -> Option<OriginTag> {
    ["EventSource", "eventSource"].iter().find_map(|field| {
        record
            .get(*field)
            .filter(|value| is_truthy_scalar(value))
            .and_then(scalar_text)
            .map(OriginTag::from)
    })
}

/// Identifier at a JSON pointer (RFC 6901). Strings are used as is, numbers
/// and booleans are rendered as text; anything else yields `None`.
pub fn id_at(pointer: &str) -> impl Fn(&Value) -> Option<String> + Send + Sync + use<> {
    let pointer = pointer.to_string();
    move |record| record.pointer(&pointer).and_then(scalar_text)
}

/// Payload at a JSON pointer, `Value::Null` when absent.
pub fn body_at(pointer: &str) -> impl Fn(&Value) -> Value + Send + Sync + use<> {
    let pointer = pointer.to_string();
    move |record| record.pointer(&pointer).cloned().unwrap_or(Value::Null)
}

/// Like [`body_at`], but string payloads holding JSON text are parsed.
/// Strings that are not valid JSON are passed through unchanged.
pub fn json_body_at(pointer: &str) -> impl Fn(&Value) -> Value + Send + Sync + use<> {
    let pointer = pointer.to_string();
    move |record| {
        record
            .pointer(&pointer)
            .cloned()
            .map(parse_json_text)
            .unwrap_or(Value::Null)
    }
}

/// Parses a string holding JSON text; other values are returned as is.
pub fn parse_json_text(value: Value) -> Value {
    match value {
        Value::String(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        other => other,
    }
}

fn is_truthy_scalar(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Bool(b) => *b,
        _ => false,
    }
}

/// Text form of a scalar. Integral floats drop the fraction (`1.0` -> `"1"`).
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number_text(n: &Number) -> String {
    // 2^53: beyond this f64 no longer holds every integer
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}
