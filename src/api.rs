//! HTTP client for the mammography backend.
//!
//! One [`ApiClient`] is shared by every screen. It joins routes onto the
//! configured base URL and attaches the bearer token from the session store,
//! so individual endpoint modules never see raw credentials.
//!
//! The backend's envelopes are not uniform: admin user routes wrap payloads
//! in `{ status_code, data, detail? }`, prediction routes in
//! `{ success, data, total }`, and the model list is a bare JSON array. Each
//! endpoint module owns the unwrapping for its family.

pub mod auth;
pub mod dataset;
pub mod models;
pub mod predictions;
pub mod uploads;
pub mod users;

use serde::Serialize;

use crate::{http_client, session::SessionStore};

pub(crate) const MAX_JSON_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
pub(crate) const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Errors shared across endpoint families.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Session invalid or expired")]
    Unauthorized,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Server error: {0}")]
    ServerError(String),
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Shared client handle. Cheap to clone into background jobs.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    store: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, store: SessionStore) -> Self {
        Self {
            base_url: base_url.into(),
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn get(&self, path: &str) -> ureq::Request {
        self.request("GET", path)
    }

    pub(crate) fn post(&self, path: &str) -> ureq::Request {
        self.request("POST", path)
    }

    pub(crate) fn put(&self, path: &str) -> ureq::Request {
        self.request("PUT", path)
    }

    pub(crate) fn patch(&self, path: &str) -> ureq::Request {
        self.request("PATCH", path)
    }

    pub(crate) fn delete(&self, path: &str) -> ureq::Request {
        self.request("DELETE", path)
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = format!("{}{}", self.base_url, path);
        let mut request = http_client::agent()
            .request(method, &url)
            .set("Accept", "application/json");
        if let Some(token) = self.store.token() {
            request = request.set("Authorization", &format!("Bearer {}", token.trim()));
        }
        request
    }
}

/// Issue a request with no body and return the response text.
pub(crate) fn call_text(request: ureq::Request, max_bytes: usize) -> Result<String, ApiError> {
    let response = match request.call() {
        Ok(response) => response,
        Err(err) => return Err(map_request_error(err)),
    };
    read_body(response, max_bytes)
}

/// Issue a request with a JSON body and return the response text.
pub(crate) fn send_json_text(
    request: ureq::Request,
    body: &impl Serialize,
    max_bytes: usize,
) -> Result<String, ApiError> {
    let response = match request.send_json(body) {
        Ok(response) => response,
        Err(err) => return Err(map_request_error(err)),
    };
    read_body(response, max_bytes)
}

pub(crate) fn read_body(response: ureq::Response, max_bytes: usize) -> Result<String, ApiError> {
    let bytes = http_client::read_response_bytes(response, max_bytes)
        .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ApiError::InvalidResponse(err.to_string()))
}

pub(crate) fn map_request_error(error: ureq::Error) -> ApiError {
    match error {
        ureq::Error::Status(code, response) => {
            let body = read_error_body(response);
            map_status_error(code, body)
        }
        ureq::Error::Transport(err) => ApiError::Transport(err.to_string()),
    }
}

pub(crate) fn map_status_error(code: u16, body: String) -> ApiError {
    let detail = extract_detail(&body).unwrap_or(body);
    match code {
        400 | 422 => ApiError::BadRequest(detail),
        401 | 403 => ApiError::Unauthorized,
        404 => ApiError::NotFound(detail),
        500..=599 => ApiError::ServerError(detail),
        _ => ApiError::Transport(format!("HTTP {code}: {detail}")),
    }
}

fn read_error_body(response: ureq::Response) -> String {
    http_client::read_response_bytes(response, MAX_ERROR_BODY_BYTES)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_else(|err| err.to_string())
}

/// Pull the human-readable `detail` field out of an error envelope when the
/// backend provides one.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    value
        .get("detail")
        .and_then(|detail| detail.as_str())
        .map(|detail| detail.to_string())
}
