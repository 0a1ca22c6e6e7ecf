// ABOUTME: Shared request plumbing for the portal and catalog clients.
// ABOUTME: Maps transport and status failures onto OpsError.

use reqwest::{RequestBuilder, Response, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::ops::OpsError;

/// A successful response body, JSON when the server says so.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl Body {
    pub fn into_json(self) -> Value {
        match self {
            Body::Json(value) => value,
            Body::Text(text) => Value::String(text),
        }
    }

    pub fn parse<T: DeserializeOwned>(self, endpoint: &str) -> Result<T, OpsError> {
        let value = match self {
            Body::Json(value) => value,
            Body::Text(text) => serde_json::from_str(&text)
                .map_err(|e| OpsError::invalid_response(endpoint, e.to_string()))?,
        };
        serde_json::from_value(value).map_err(|e| OpsError::invalid_response(endpoint, e.to_string()))
    }
}

/// Send `request`, failing on transport errors and non-2xx statuses.
pub async fn send(endpoint: &str, request: RequestBuilder) -> Result<Body, OpsError> {
    let response = request.send().await.map_err(|e| OpsError::Transport {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })?;

    let status = response.status();
    debug!(endpoint, status = status.as_u16(), "portal response");

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(OpsError::Http {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    read_body(endpoint, response).await
}

async fn read_body(endpoint: &str, response: Response) -> Result<Body, OpsError> {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    let text = response.text().await.map_err(|e| OpsError::Transport {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })?;

    if !is_json {
        return Ok(Body::Text(text));
    }
    if text.trim().is_empty() {
        return Ok(Body::Json(Value::Null));
    }
    serde_json::from_str(&text)
        .map(Body::Json)
        .map_err(|e| OpsError::invalid_response(endpoint, e.to_string()))
}
