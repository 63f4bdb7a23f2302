//! App - record processor の組み立てと実行
//!
//! # 主要コンポーネント
//! - **RecordProcessorBuilder**: 設定（extractor の表、event source の読み方）と起動時検証
//! - **RecordProcessor**: batch を順番に handler へ流し、id -> 結果 を集約する

pub mod builder;
pub mod processor;

pub use self::builder::{BuildError, RecordProcessorBuilder};
pub use self::processor::RecordProcessor;
