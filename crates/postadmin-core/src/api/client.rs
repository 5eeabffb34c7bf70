//! Request client for the administration API.
//!
//! Every call resolves against one fixed origin, carries the bearer token
//! from the session store, and is classified on return:
//! 2xx resolves with the body, 401 tears the session down, anything else is
//! handed back to the caller untouched.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::SessionStore;
use crate::config::{Config, SESSION_EXPIRED_REDIRECT_DELAY};
use crate::shell::{Navigator, Notifier, SESSION_EXPIRED_MESSAGE};

use super::request::{query_pairs, Body, HttpRequest, RequestDescriptor, ResponseClass};
use super::transport::{ReqwestTransport, Transport};
use super::RequestError;

/// Clone is cheap; all collaborators are shared.
#[derive(Clone)]
pub struct RequestClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    redirect_delay: Duration,
}

impl RequestClient {
    /// Create a client over reqwest using the configured origin and timeout.
    pub fn new(
        config: &Config,
        session: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, RequestError> {
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Ok(Self::with_transport(
            &config.base_url,
            Arc::new(transport),
            session,
            notifier,
            navigator,
        ))
    }

    pub fn with_transport(
        base_url: &str,
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            session,
            notifier,
            navigator,
            redirect_delay: SESSION_EXPIRED_REDIRECT_DELAY,
        }
    }

    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Resolve a descriptor into the request that goes on the wire.
    /// Caller headers are applied first so they can never replace the
    /// Authorization header derived from the session.
    fn build_request(&self, descriptor: RequestDescriptor) -> Result<HttpRequest, RequestError> {
        let mut headers = descriptor.headers;
        if let Some(token) = self.session.get() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| RequestError::InvalidRequest(format!("bad token header: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        // GET carries its data as query parameters.
        let (query, body) = if descriptor.method == Method::GET {
            let query = match &descriptor.body {
                Body::Empty => Vec::new(),
                Body::Json(params) => query_pairs(params)?,
                Body::Form(fields) => fields.clone(),
            };
            (query, Body::Empty)
        } else {
            (Vec::new(), descriptor.body)
        };

        Ok(HttpRequest {
            method: descriptor.method,
            url: self.url_for(&descriptor.path),
            headers,
            query,
            body,
        })
    }

    /// Issue a request and return the response body on success.
    ///
    /// A 401 clears the session, shows a notification and schedules the
    /// login redirect before the call is rejected with
    /// [`RequestError::Unauthorized`].
    ///
    /// Must be polled inside a tokio runtime: the delayed redirect is a
    /// spawned task, and `tokio::spawn` panics without a runtime.
    pub async fn issue(&self, descriptor: RequestDescriptor) -> Result<Value, RequestError> {
        let method = descriptor.method.clone();
        let path = descriptor.path.clone();
        let request = self.build_request(descriptor)?;
        debug!(%method, path = %path, authenticated = request.headers.contains_key(header::AUTHORIZATION), "Issuing request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, path = %path, error = %e, "Request failed without a response");
                return Err(e.into());
            }
        };

        match response.classify() {
            ResponseClass::Success => Ok(response.body),
            ResponseClass::Unauthorized => {
                self.expire_session(&path);
                Err(RequestError::Unauthorized(response))
            }
            ResponseClass::OtherFailure => {
                debug!(%method, path = %path, status = %response.status, "Request rejected");
                Err(RequestError::Status(response))
            }
        }
    }

    /// Issue a request and deserialize the success body.
    pub async fn issue_json<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<T, RequestError> {
        let body = self.issue(descriptor).await?;
        serde_json::from_value(body).map_err(|e| RequestError::Decode(e.to_string()))
    }

    /// Session teardown for a rejected token. The clear happens before the
    /// redirect is scheduled, so the guard run by that redirect sees no
    /// token. Repeated 401s each schedule the same redirect.
    fn expire_session(&self, path: &str) {
        self.session.clear();
        info!(path, "Server rejected token; session cleared");
        self.notifier.notify(SESSION_EXPIRED_MESSAGE);

        let navigator = Arc::clone(&self.navigator);
        let delay = self.redirect_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate_to_login();
        });
    }

    pub async fn get(&self, path: &str, params: Value) -> Result<Value, RequestError> {
        self.issue(RequestDescriptor::get(path).with_json(params)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value, RequestError> {
        self.issue(RequestDescriptor::post(path).with_json(body)).await
    }

    pub async fn del(&self, path: &str, body: Value) -> Result<Value, RequestError> {
        self.issue(RequestDescriptor::delete(path).with_json(body)).await
    }
}
