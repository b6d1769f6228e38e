//! Backend API Client
//!
//! One method per backend endpoint, organized by domain. Every method
//! validates its payload, issues exactly one request through the
//! [`Transport`], and normalizes failures into an [`ApiError`].

mod auth;
mod employees;
mod users;
mod workload;

use std::rc::Rc;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{normalize, ApiError, ApiResult, ErrorBody, TransportError};
use crate::storage::{KeyValueStore, ACCESS_TOKEN_KEY};
use crate::validate::Validate;

/// A fully described backend call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }
}

/// Executes requests; returns the decoded JSON body (`Null` when empty)
#[async_trait(?Send)]
pub trait Transport {
    async fn execute(&self, request: ApiRequest) -> Result<Value, TransportError>;
}

/// reqwest-backed transport (fetch on wasm32)
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        log::debug!("{} {}", request.method, url);

        let mut rb = self.client.request(request.method, &url);
        if !request.query.is_empty() {
            rb = rb.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            rb = rb.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = &request.body {
            rb = rb.json(body);
        }

        let resp = rb
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: serde_json::from_str::<ErrorBody>(&text).ok(),
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Typed facade over a [`Transport`]
#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn Transport>,
    storage: Rc<dyn KeyValueStore>,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn Transport>, storage: Rc<dyn KeyValueStore>) -> Self {
        Self { transport, storage }
    }

    /// Run a request and decode the response into `T`
    async fn send<T: DeserializeOwned>(&self, request: ApiRequest, default_message: &str) -> ApiResult<T> {
        let value = self
            .transport
            .execute(request)
            .await
            .map_err(|e| normalize(e, default_message))?;
        serde_json::from_value(value)
            .map_err(|e| normalize(TransportError::Decode(e.to_string()), default_message))
    }

    /// Run a request whose response body is irrelevant
    async fn send_ok(&self, request: ApiRequest, default_message: &str) -> ApiResult<()> {
        self.transport
            .execute(request)
            .await
            .map(|_| ())
            .map_err(|e| normalize(e, default_message))
    }

    /// Access token from storage; the employee and workload endpoints need one
    fn stored_token(&self) -> ApiResult<String> {
        self.storage
            .get(ACCESS_TOKEN_KEY)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingToken)
    }
}

/// Validate then serialize an outbound payload
fn payload<T: Validate + Serialize>(data: &T) -> ApiResult<Value> {
    data.validate()?;
    serde_json::to_value(data).map_err(|e| ApiError::Transport(e.to_string()))
}
