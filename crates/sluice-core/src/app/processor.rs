//! RecordProcessor - batch を 1 レコードずつ handler に流す
//!
//! 1. event source を求める
//! 2. id / body extractor を引く（どちらか欠けていれば batch 全体を中断）
//! 3. handler を await（失敗はそのまま返す）
//! 4. レスポンスに id -> 結果 を書く（同じ id は後勝ち）
//!
//! Records are handled strictly one after another: a failure on record *k*
//! leaves records *k+1..n* untouched, and the response map is filled in batch
//! order.

use serde_json::Value;
use tracing::{debug, error, instrument};

use super::builder::RecordProcessorBuilder;
use crate::domain::{Batch, MissingExtractor, OriginTag, ProcessedRecords, RecordError};
use crate::extract::{BodyExtractors, EventSourceFn, IdExtractors};
use crate::ports::ItemHandler;

/// Reusable dispatch function closed over its configuration.
///
/// Configuration is fixed at construction; each call to
/// [`process`](Self::process) starts from an empty response map, so a
/// processor can be shared (e.g. behind an `Arc`) by concurrent invocations.
pub struct RecordProcessor<H> {
    pub(super) handler: H,
    pub(super) id_extractors: IdExtractors,
    pub(super) body_extractors: BodyExtractors,
    pub(super) event_source: EventSourceFn,
}

impl<H: ItemHandler> RecordProcessor<H> {
    /// Processor with the default SNS/SQS tables.
    pub fn new(handler: H) -> Self {
        RecordProcessorBuilder::new(handler).into_processor()
    }

    pub fn builder(handler: H) -> RecordProcessorBuilder<H> {
        RecordProcessorBuilder::new(handler)
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Event sources that resolve in both extractor tables.
    pub fn origins(&self) -> Vec<OriginTag> {
        self.id_extractors
            .origins()
            .into_iter()
            .filter(|origin| self.body_extractors.contains(origin.as_str()))
            .collect()
    }

    pub async fn process(&self, batch: &Batch) -> Result<ProcessedRecords<H::Output>, H::Error> {
        self.process_records(&batch.records).await
    }

    #[instrument(name = "record_processor_process", skip_all, fields(records = records.len()))]
    pub async fn process_records(
        &self,
        records: &[Value],
    ) -> Result<ProcessedRecords<H::Output>, H::Error> {
        let mut response = ProcessedRecords::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let (id, payload) = self.extract(index, record)?;
            debug!(index, id = %id, "dispatching record");

            let result = self.handler.handle(payload).await?;
            if response.insert(id, result).is_some() {
                debug!(index, "identifier already seen in batch, replacing earlier result");
            }
        }

        debug!(entries = response.len(), "batch processed");
        Ok(response)
    }

    fn extract(&self, index: usize, record: &Value) -> Result<(String, Value), RecordError> {
        let Some(origin) = (self.event_source)(record) else {
            error!(index, record = %record, "record has no event source");
            return Err(RecordError::misconfigured(None, MissingExtractor::Both));
        };

        let (extract_id, extract_body) = match (
            self.id_extractors.get(origin.as_str()),
            self.body_extractors.get(origin.as_str()),
        ) {
            (Some(extract_id), Some(extract_body)) => (extract_id, extract_body),
            (extract_id, extract_body) => {
                let missing = MissingExtractor::detect(extract_id.is_some(), extract_body.is_some())
                    .unwrap_or(MissingExtractor::Both);
                error!(
                    index,
                    origin = %origin,
                    missing = %missing,
                    record = %record,
                    "event source not configured"
                );
                return Err(RecordError::misconfigured(Some(origin), missing));
            }
        };

        let Some(id) = extract_id(record) else {
            error!(index, origin = %origin, record = %record, "record has no identifier");
            return Err(RecordError::MissingIdentifier { origin, index });
        };

        Ok((id, extract_body(record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DispatchError;
    use crate::extract::{BodyExtractors, IdExtractors};
    use crate::impls::{handler_fn, sync_handler_fn};
    use serde_json::json;
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn identity() -> impl ItemHandler<Output = Value, Error = DispatchError> {
        sync_handler_fn(|payload: Value| Ok::<_, DispatchError>(payload))
    }

    /// Records every payload it sees, in call order.
    fn recording() -> (
        Arc<Mutex<Vec<Value>>>,
        impl ItemHandler<Output = Value, Error = DispatchError>,
    ) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler = sync_handler_fn(move |payload: Value| {
            sink.lock().unwrap().push(payload.clone());
            Ok::<_, DispatchError>(payload)
        });
        (seen, handler)
    }

    #[tokio::test]
    async fn mixed_sqs_and_sns_batch_with_identity_handler() {
        let processor = RecordProcessor::new(identity());

        let batch = Batch::new(vec![
            json!({ "eventSource": "aws:sqs", "messageId": "m1", "body": "b1" }),
            json!({ "EventSource": "aws:sns", "Sns": { "MessageId": "m2", "Message": "b2" } }),
        ]);

        let response = processor.process(&batch).await.unwrap();

        assert_eq!(response.len(), 2);
        assert_eq!(response["m1"], json!("b1"));
        assert_eq!(response["m2"], json!("b2"));
    }

    #[tokio::test]
    async fn handler_receives_bodies_in_batch_order() {
        let (seen, handler) = recording();
        let processor = RecordProcessor::new(handler);

        processor
            .process(&Batch::new(vec![
                json!({ "EventSource": "aws:sqs", "messageId": "first message", "body": "first message body" }),
                json!({ "EventSource": "aws:sns", "Sns": { "MessageId": "second message", "Message": "second message body" } }),
            ]))
            .await
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![json!("first message body"), json!("second message body")]
        );
    }

    #[tokio::test]
    async fn response_holds_each_handler_result() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let processor = RecordProcessor::new(sync_handler_fn(move |_payload: Value| {
            let mut n = counter.lock().unwrap();
            *n += 1;
            Ok::<_, DispatchError>(format!("response {n}"))
        }));

        let response = processor
            .process(&Batch::new(vec![
                json!({ "EventSource": "aws:sqs", "messageId": "first message" }),
                json!({ "EventSource": "aws:sns", "Sns": { "MessageId": "second message" } }),
            ]))
            .await
            .unwrap();

        assert_eq!(response["first message"], "response 1");
        assert_eq!(response["second message"], "response 2");
    }

    #[tokio::test]
    async fn custom_tables_are_selected_by_event_source() {
        let ids = IdExtractors::new()
            .with("first", |r: &Value| r["prop"].as_str().map(|p| format!("first:{p}")))
            .with("second", |r: &Value| r["prop"].as_str().map(|p| format!("second:{p}")));
        let bodies = BodyExtractors::new()
            .with("first", |r: &Value| json!({ "from": "first", "prop": r["prop"] }))
            .with("second", |r: &Value| json!({ "from": "second", "prop": r["prop"] }));

        let (seen, handler) = recording();
        let processor = RecordProcessor::builder(handler)
            .extract_id(ids)
            .extract_body(bodies)
            .build()
            .unwrap();

        let response = processor
            .process(&Batch::new(vec![
                json!({ "EventSource": "first", "prop": "record 1" }),
                json!({ "EventSource": "second", "prop": "record 2" }),
                json!({ "EventSource": "first", "prop": "record 3" }),
            ]))
            .await
            .unwrap();

        assert_eq!(response.len(), 3);
        assert_eq!(response["first:record 1"]["from"], "first");
        assert_eq!(response["second:record 2"]["from"], "second");
        assert_eq!(response["first:record 3"]["prop"], "record 3");
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn colliding_identifiers_keep_the_last_result() {
        let processor = RecordProcessor::new(identity());

        let response = processor
            .process(&Batch::new(vec![
                json!({ "eventSource": "aws:sqs", "messageId": "same", "body": "A" }),
                json!({ "eventSource": "aws:sqs", "messageId": "other", "body": "B" }),
                json!({ "eventSource": "aws:sqs", "messageId": "same", "body": "C" }),
            ]))
            .await
            .unwrap();

        assert_eq!(response.len(), 2);
        assert_eq!(response["same"], "C");
        assert_eq!(response["other"], "B");
    }

    #[tokio::test]
    async fn unknown_event_source_aborts_the_batch() {
        let (seen, handler) = recording();
        let processor = RecordProcessor::new(handler);

        let err = processor
            .process(&Batch::new(vec![
                json!({ "eventSource": "aws:sqs", "messageId": "m1", "body": "b1" }),
                json!({ "EventSource": "invalid" }),
                json!({ "eventSource": "aws:sqs", "messageId": "m3", "body": "b3" }),
            ]))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Lambda record processor not properly configured to handle event source \"invalid\". Need to provide both an extractId and an extractBody function for this event source."
        );
        assert!(matches!(
            err.as_record_error(),
            Some(RecordError::MisconfiguredOrigin { origin: Some(o), missing: MissingExtractor::Both }) if o.as_str() == "invalid"
        ));
        // record 3 was never handed to the handler
        assert_eq!(*seen.lock().unwrap(), vec![json!("b1")]);
    }

    #[tokio::test]
    async fn half_configured_event_source_is_rejected() {
        let processor = RecordProcessor::builder(identity())
            .extract_id(IdExtractors::new().with("custom", |_: &Value| Some("id".to_string())))
            .build()
            .unwrap();

        let err = processor
            .process(&Batch::new(vec![json!({ "EventSource": "custom" })]))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_record_error(),
            Some(RecordError::MisconfiguredOrigin { missing: MissingExtractor::Body, .. })
        ));
    }

    #[tokio::test]
    async fn record_without_event_source_is_rejected() {
        let processor = RecordProcessor::new(identity());

        let err = processor
            .process(&Batch::new(vec![json!({ "messageId": "m1", "body": "b1" })]))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_record_error(),
            Some(RecordError::MisconfiguredOrigin { origin: None, .. })
        ));
    }

    #[tokio::test]
    async fn record_without_identifier_is_rejected() {
        let processor = RecordProcessor::new(identity());

        let err = processor
            .process(&Batch::new(vec![
                json!({ "eventSource": "aws:sqs", "messageId": "m0", "body": "ok" }),
                json!({ "eventSource": "aws:sqs", "body": "no id" }),
            ]))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_record_error(),
            Some(RecordError::MissingIdentifier { index: 1, .. })
        ));
    }

    #[tokio::test]
    async fn handler_failure_stops_remaining_records() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&calls);
        let processor = RecordProcessor::new(handler_fn(move |payload: Value| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(payload.clone());
                if payload == "fail" {
                    return Err(DispatchError::handler("handler exploded"));
                }
                Ok(payload)
            }
        }));

        let err = processor
            .process(&Batch::new(vec![
                json!({ "eventSource": "aws:sqs", "messageId": "1", "body": "ok" }),
                json!({ "eventSource": "aws:sqs", "messageId": "2", "body": "fail" }),
                json!({ "eventSource": "aws:sqs", "messageId": "3", "body": "never" }),
            ]))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "handler exploded");
        assert!(err.as_record_error().is_none());
        assert_eq!(*calls.lock().unwrap(), vec![json!("ok"), json!("fail")]);
    }

    #[tokio::test]
    async fn handler_calls_never_overlap() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&events);
        let processor = RecordProcessor::new(handler_fn(move |payload: Value| {
            let log = Arc::clone(&log);
            async move {
                let name = payload["name"].as_str().unwrap_or_default().to_string();
                let delay = payload["delay_ms"].as_u64().unwrap_or_default();

                log.lock().unwrap().push(format!("start {name}"));
                tokio::time::sleep(Duration::from_millis(delay)).await;
                log.lock().unwrap().push(format!("end {name}"));
                Ok::<_, DispatchError>(name)
            }
        }));

        // slowest first: concurrent calls would finish out of order
        let response = processor
            .process(&Batch::new(vec![
                json!({ "eventSource": "aws:sqs", "messageId": "1", "body": { "name": "a", "delay_ms": 30 } }),
                json!({ "eventSource": "aws:sqs", "messageId": "2", "body": { "name": "b", "delay_ms": 15 } }),
                json!({ "eventSource": "aws:sqs", "messageId": "3", "body": { "name": "c", "delay_ms": 1 } }),
            ]))
            .await
            .unwrap();

        assert_eq!(response.len(), 3);
        assert_eq!(
            *events.lock().unwrap(),
            vec!["start a", "end a", "start b", "end b", "start c", "end c"]
        );
    }

    /// In-memory sink for the fmt subscriber.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn misconfigured_record_is_logged_at_error_level() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::ERROR)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let processor = RecordProcessor::new(identity());
        let err = processor
            .process(&Batch::new(vec![
                json!({ "eventSource": "aws:sqs", "messageId": "m1", "body": "b1" }),
                json!({ "EventSource": "invalid", "marker": "offending" }),
            ]))
            .await
            .unwrap_err();
        assert!(err.as_record_error().is_some());

        let output = logs.contents();
        assert!(output.contains("ERROR"), "{output}");
        assert!(output.contains("event source not configured"), "{output}");
        assert!(
            output.contains(r#"{"EventSource":"invalid","marker":"offending"}"#),
            "{output}"
        );
        assert!(!output.contains("b1"), "{output}");
    }

    #[tokio::test]
    async fn numeric_event_source_is_named_in_error() {
        let processor = RecordProcessor::new(identity());

        let err = processor
            .process(&Batch::new(vec![json!({ "EventSource": 42, "messageId": "m" })]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("handle event source \"42\""), "{err}");
        assert!(matches!(
            err.as_record_error(),
            Some(RecordError::MisconfiguredOrigin { origin: Some(o), .. }) if o.as_str() == "42"
        ));
    }

    #[tokio::test]
    async fn integral_float_identifiers_share_a_key() {
        let processor = RecordProcessor::new(identity());

        let response = processor
            .process(&Batch::new(vec![
                json!({ "eventSource": "aws:sqs", "messageId": 1, "body": "first" }),
                json!({ "eventSource": "aws:sqs", "messageId": 1.0, "body": "second" }),
            ]))
            .await
            .unwrap();

        assert_eq!(response.len(), 1);
        assert_eq!(response["1"], "second");
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_response() {
        let processor = RecordProcessor::new(identity());
        let response = processor.process(&Batch::default()).await.unwrap();
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn invocations_do_not_share_responses() {
        let processor = RecordProcessor::new(identity());

        let first = processor
            .process(&Batch::new(vec![json!({ "eventSource": "aws:sqs", "messageId": "a", "body": 1 })]))
            .await
            .unwrap();
        let second = processor
            .process(&Batch::new(vec![json!({ "eventSource": "aws:sqs", "messageId": "b", "body": 2 })]))
            .await
            .unwrap();

        assert_eq!(first.keys().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(second.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn default_processor_resolves_builtin_origins() {
        let processor = RecordProcessor::new(identity());
        assert_eq!(
            processor.origins(),
            vec![OriginTag::from("aws:sns"), OriginTag::from("aws:sqs")]
        );
    }
}
