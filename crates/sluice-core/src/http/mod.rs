//! HTTP adapter - API Gateway リクエストの正規化とレスポンス変換
//!
//! - request: ヘッダー名の小文字化、JSON body のデコード、query / path parameters
//! - response: HttpError からステータスコードとメッセージを決める
//! - adapter: HttpHandler をラップして常に HttpResponse を返す

pub mod adapter;
pub mod request;
pub mod response;

pub use self::adapter::{HttpAdapter, HttpFnHandler, HttpHandler, http_handler_fn};
pub use self::request::{NormalizedRequest, RawRequest, normalize_request_parameters};
pub use self::response::{DEFAULT_ERROR_MESSAGE, HttpError, HttpResponse};
