use std::future::Future;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, warn};

use super::request::{NormalizedRequest, RawRequest, normalize_request_parameters};
use super::response::{HttpError, HttpResponse};

/// Business logic behind an HTTP endpoint.
///
/// `Ok(Some(_))` becomes a 200 JSON response, `Ok(None)` a 204.
#[async_trait]
pub trait HttpHandler: Send + Sync {
    type Output: Serialize + Send;

    async fn handle(&self, request: NormalizedRequest) -> Result<Option<Self::Output>, HttpError>;
}

pub struct HttpFnHandler<F> {
    f: F,
}

pub fn http_handler_fn<F, Fut, O>(f: F) -> HttpFnHandler<F>
where
    F: Fn(NormalizedRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<O>, HttpError>> + Send,
{
    HttpFnHandler { f }
}

#[async_trait]
impl<F, Fut, O> HttpHandler for HttpFnHandler<F>
where
    F: Fn(NormalizedRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<O>, HttpError>> + Send,
    O: Serialize + Send,
{
    type Output = O;

    async fn handle(&self, request: NormalizedRequest) -> Result<Option<O>, HttpError> {
        (self.f)(request).await
    }
}

/// Wraps an [`HttpHandler`]: normalizes the request, then maps the outcome
/// to a status code and body. Never fails; every error becomes a response.
pub struct HttpAdapter<H> {
    handler: H,
}

impl<H: HttpHandler> HttpAdapter<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub async fn call(&self, raw: RawRequest) -> HttpResponse {
        let request = match normalize_request_parameters(raw) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "rejecting request");
                return HttpResponse::from_error(&e);
            }
        };

        match self.handler.handle(request).await {
            Ok(Some(output)) => match serde_json::to_string(&output) {
                Ok(body) => HttpResponse::json(200, body),
                Err(e) => {
                    error!(error = %e, "failed to serialize handler output");
                    HttpResponse::from_error(&HttpError::default())
                }
            },
            Ok(None) => HttpResponse::no_content(),
            Err(e) => {
                warn!(status = e.resolved_status(), error = %e, "handler failed");
                HttpResponse::from_error(&e)
            }
        }
    }
}
