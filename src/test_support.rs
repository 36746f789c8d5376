//! Scripted transport for client tests

use crate::auth_client::AuthenticatedHttpClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::token_store::MemoryStore;
use crate::transport::{HttpRequest, HttpResponse, Transport};
use reqwest::Method;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "http://api.test";
pub const API_KEY: &str = "test-api-key";

/// Canned reply for one request
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(HttpResponse),
    NetworkFailure,
}

impl Reply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Reply::Respond(HttpResponse::new(status, body.to_string()))
    }

    pub fn text(status: u16, body: &str) -> Self {
        Reply::Respond(HttpResponse::new(status, body))
    }
}

/// Replies queued per `(method, path)`; every request is recorded
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<HashMap<(Method, String), VecDeque<Reply>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        let url = format!("{BASE_URL}{path}");
        self.requests()
            .into_iter()
            .filter(|r| r.url == url)
            .collect()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let path = request
            .url
            .strip_prefix(BASE_URL)
            .unwrap_or(&request.url)
            .to_string();
        let key = (request.method.clone(), path);
        self.requests.lock().unwrap().push(request);

        // Let other in-flight calls run before this one is answered
        tokio::task::yield_now().await;

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(|queue| queue.pop_front());

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::NetworkFailure) => {
                Err(ClientError::Network("connection refused".to_string()))
            }
            None => panic!("no scripted reply for {} {}", key.0, key.1),
        }
    }
}

pub type TestClient = AuthenticatedHttpClient<MemoryStore, ScriptedTransport>;

pub fn test_client() -> (TestClient, ScriptedTransport) {
    let transport = ScriptedTransport::new();
    let client = AuthenticatedHttpClient::new(
        ClientConfig::new(BASE_URL, API_KEY),
        MemoryStore::new(),
        transport.clone(),
    );
    (client, transport)
}

pub fn bearer(request: &HttpRequest) -> Option<&str> {
    request
        .headers
        .get(reqwest::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

pub fn body_json(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_str(request.body.as_deref().unwrap_or("null")).unwrap()
}
