//! Per-call request descriptor

use crate::error::Result;
use reqwest::Method;
use serde::Serialize;

/// One logical API call: path, method, extra headers, body and auth mode
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Server-relative path, e.g. `/admins`
    pub path: String,
    pub method: Method,
    /// Merged over the default headers
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// No bearer token and no refresh-on-401 (login and friends)
    pub skip_auth: bool,
}

impl ApiRequest {
    /// Authenticated call with no body
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            headers: Vec::new(),
            body: None,
            skip_auth: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Serialize `body` as the JSON payload
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }

    /// Add a header; it overrides the default of the same name
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Never attach the bearer token or refresh on 401
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }
}
