//! Domain model (origin tags, batches, message ids, errors).
//!
//! - origin: event source discriminant (`aws:sns`, `aws:sqs`, ...)
//! - batch: 入力 batch と集約済みレスポンスの型
//! - ids: broadcast で払い出す message id
//! - errors: RecordError / DispatchError

pub mod batch;
pub mod errors;
pub mod ids;
pub mod origin;

pub use self::batch::{Batch, ProcessedRecords};
pub use self::errors::{BoxError, DispatchError, MissingExtractor, RecordError};
pub use self::ids::MessageId;
pub use self::origin::OriginTag;
