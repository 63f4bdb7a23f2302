//! Ports - 外部とのつなぎ目
//!
//! 各 trait は processor / broadcaster が依存する抽象です。
//! 実装は呼び出し側（ユーザーコード）か `impls` に置きます。
//!
//! - ItemHandler: 1 レコード分の payload を処理するビジネスロジック
//! - Publisher: broadcast の配送先（SNS など）
//! - Clock / IdGenerator: in-memory publisher のテスト容易性のため

pub mod clock;
pub mod handler;
pub mod id_generator;
pub mod publisher;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::handler::ItemHandler;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::publisher::{PublishError, Publisher};
