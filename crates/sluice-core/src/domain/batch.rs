//! Batch - 配送システムから届く 1 回分のレコード列
//!
//! Records are kept as raw JSON: their shape depends on the event source and is
//! only interpreted by the extractors registered for that source.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier -> handler result, one entry per processed record.
///
/// Records sharing an identifier overwrite each other in batch order
/// (last write wins).
pub type ProcessedRecords<T> = HashMap<String, T>;

/// The event delivered to one invocation: `{ "Records": [ ... ] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    #[serde(rename = "Records")]
    pub records: Vec<Value>,
}

impl Batch {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<Value>> for Batch {
    fn from(records: Vec<Value>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn batch_reads_capitalized_records_field() {
        let batch: Batch = serde_json::from_value(json!({
            "Records": [
                { "eventSource": "aws:sqs", "messageId": "m1", "body": "b1" },
                { "EventSource": "aws:sns", "Sns": { "MessageId": "m2" } }
            ]
        }))
        .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records[0]["messageId"], "m1");
    }

    #[test]
    fn batch_without_records_field_is_rejected() {
        let result = serde_json::from_value::<Batch>(json!({ "records": [] }));
        assert!(result.is_err());
    }
}
