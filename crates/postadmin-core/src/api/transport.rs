use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::TransportError;
use super::request::{Body, HttpRequest, RawResponse};

/// Sends a resolved request and yields the raw response.
///
/// Any HTTP status counts as a response; only failing to get one is an
/// error. A success response whose body cannot be read is also an error.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<RawResponse, TransportError>>;
}

/// Transport over reqwest.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport. No timeout is applied when `timeout` is `None`.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<RawResponse, TransportError>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(request.method.clone(), &request.url)
                .headers(request.headers);
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            builder = match &request.body {
                Body::Empty => builder,
                Body::Json(value) => builder.json(value),
                Body::Form(fields) => builder.form(fields),
            };

            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            // Once the status is in, a failed body read only loses the body of
            // a failure response; the status still has to be classified.
            let body = match response.bytes().await {
                Ok(bytes) => {
                    debug!(url = %request.url, %status, len = bytes.len(), "Received response");
                    RawResponse::parse_body(&bytes)
                }
                Err(e) if !status.is_success() => {
                    warn!(url = %request.url, %status, error = %e, "Failed to read response body");
                    Value::Null
                }
                Err(e) => return Err(e.into()),
            };

            Ok(RawResponse { status, headers, body })
        })
    }
}
