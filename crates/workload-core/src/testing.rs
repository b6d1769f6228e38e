//! Test Support
//!
//! Scripted transport and JSON fixtures shared by the unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};

use crate::api::{ApiClient, ApiRequest, Transport};
use crate::error::{ErrorBody, TransportError};
use crate::storage::MemoryStorage;

type Route = (Method, String);

/// Transport answering from per-route queues and recording every request
#[derive(Default)]
pub struct MockTransport {
    routes: RefCell<HashMap<Route, VecDeque<Result<Value, TransportError>>>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn respond(&self, method: Method, path: &str, result: Result<Value, TransportError>) {
        self.routes
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(result);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let route = (request.method.clone(), request.path.clone());
        self.requests.borrow_mut().push(request);
        self.routes
            .borrow_mut()
            .get_mut(&route)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError::Network(format!("no mock for {} {}", route.0, route.1))))
    }
}

pub fn setup_client() -> (ApiClient, Rc<MockTransport>, Rc<MemoryStorage>) {
    let transport = Rc::new(MockTransport::default());
    let storage = Rc::new(MemoryStorage::new());
    let client = ApiClient::new(transport.clone(), storage.clone());
    (client, transport, storage)
}

/// Backend error with a message body
pub fn backend_error(status: u16, message: &str) -> TransportError {
    TransportError::Status {
        status,
        body: Some(ErrorBody {
            message: Some(Value::String(message.to_string())),
            code: None,
        }),
    }
}

/// Tokens must be at least 20 characters to pass request validation
pub fn pad_token(prefix: &str) -> String {
    format!("{:x<32}", prefix)
}

pub fn uuid_str(n: u32) -> String {
    format!("00000000-0000-4000-8000-{:012}", n)
}

pub fn profile_json(login: &str) -> Value {
    json!({
        "id": uuid_str(1),
        "login": login,
        "firstName": "Анна",
        "lastName": "Петрова",
        "role": "admin",
        "isActive": true,
        "lastLoginAt": null,
        "createdAt": "2025-01-10T09:00:00Z",
        "updatedAt": "2025-01-10T09:00:00Z"
    })
}

pub fn user_json(n: u32, login: &str, is_active: bool) -> Value {
    let mut profile = profile_json(login);
    profile["id"] = json!(uuid_str(n));
    profile["isActive"] = json!(is_active);
    profile
}

pub fn token_json(access: &str, refresh: &str) -> Value {
    json!({
        "accessToken": pad_token(access),
        "refreshToken": pad_token(refresh),
        "user": profile_json("admin")
    })
}

pub fn employee_json(n: u32, display: &str, rate: Option<f64>) -> Value {
    json!({
        "id": uuid_str(n),
        "createdAt": "2025-01-10T09:00:00Z",
        "updatedAt": "2025-01-10T09:00:00Z",
        "display": display,
        "email": format!("user{}@example.com", n),
        "login": format!("user{}", n),
        "dismissed": false,
        "rate": rate
    })
}
