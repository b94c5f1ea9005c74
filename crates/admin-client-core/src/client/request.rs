use std::fmt::Debug;

use admin_shared::{
    const_config::{path::PathSpec, resource::RESOURCE_TOTAL_COUNT_HEADER},
    errors::AdminError,
};
use reqwest::{Method, StatusCode};
use serde_json::Value;

/// Everything needed to send one request, relative to the api url
#[derive(Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// If set the session token is attached as a bearer token when sent
    pub authorized: bool,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            authorized: false,
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

    #[must_use]
    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_bearer(mut self) -> Self {
        self.authorized = true;
        self
    }

    /// Returns the value of the first query pair with `key`
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl From<PathSpec> for RequestSpec {
    fn from(value: PathSpec) -> Self {
        Self::new(value.method, value.path)
    }
}

impl Debug for RequestSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Bodies include passwords during login and registration
        f.debug_struct("RequestSpec")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("has_body", &self.body.is_some())
            .field("authorized", &self.authorized)
            .finish()
    }
}

/// A successful response, read fully so it can be handed to a strategy
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// Value of the total count header if present and numeric
    pub total_count: Option<u64>,
    /// Parsed json body, [`Value::Null`] if the body was empty
    pub body: Value,
}

impl ApiResponse {
    pub fn new(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            total_count: None,
            body,
        }
    }

    #[must_use]
    pub fn with_total_count(mut self, total_count: u64) -> Self {
        self.total_count = Some(total_count);
        self
    }

    #[tracing::instrument(skip(response), err(Debug))]
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, AdminError> {
        let status = response.status();
        let total_count = response
            .headers()
            .get(RESOURCE_TOTAL_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok());
        let text = response
            .text()
            .await
            .map_err(|e| AdminError::InvalidResponse(format!("failed to read body: {e}")))?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                AdminError::InvalidResponse(format!("failed to parse body as json: {e}"))
            })?
        };
        Ok(Self {
            status,
            total_count,
            body,
        })
    }
}
