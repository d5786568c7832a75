use super::*;

use crate::error::ApiError;

/// A rebuildable description of one outgoing call. The session gate needs
/// to issue the same request twice (once before and once after a token
/// refresh), so requests are value objects rather than built-up builders.
#[derive(Clone, Debug)]
pub struct RequestSpec {
    pub(super) method: reqwest::Method,
    pub(super) path: String,
    pub(super) query: Vec<(String, String)>,
    pub(super) body: Option<serde_json::Value>,
}

impl RequestSpec {
    pub fn get(path: &str) -> Self {
        Self::new(reqwest::Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(reqwest::Method::POST, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(reqwest::Method::PUT, path)
    }

    fn new(method: reqwest::Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl ApiClient {
    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build(
        &self,
        spec: &RequestSpec,
        bearer: Option<&str>,
    ) -> reqwest::blocking::RequestBuilder {
        let mut req = self.client.request(spec.method.clone(), self.url(&spec.path));
        if !spec.query.is_empty() {
            req = req.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            req = req.json(body);
        }
        if let Some(token) = bearer {
            req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token));
        }
        req
    }

    /// Sends once; transport failures (no response at all) map to
    /// [`ApiError::Network`].
    pub(super) fn execute(
        &self,
        spec: &RequestSpec,
        bearer: Option<&str>,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        self.build(spec, bearer).send().map_err(ApiError::from)
    }

    /// Passes 2xx responses through; everything else becomes
    /// [`ApiError::Server`] carrying the backend's structured message.
    pub(super) fn success(
        &self,
        resp: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body = resp.text().unwrap_or_default();
        Err(ApiError::Server {
            status,
            message: server_message(status, &body),
        })
    }

    pub(super) fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::blocking::Response,
    ) -> Result<T, ApiError> {
        let status = resp.status().as_u16();
        resp.json().map_err(|err| ApiError::Server {
            status,
            message: format!("unexpected response body: {}", err),
        })
    }
}

/// Pulls the human-readable message out of an error body. The backend uses
/// `{"detail": ...}`; `message` and `error` cover older deployments.
pub(super) fn server_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str())
                && !msg.is_empty()
            {
                return msg.to_string();
            }
        }
    }
    format!("request failed with status {}", status)
}

#[cfg(test)]
#[path = "../tests/api/http_tests.rs"]
mod tests;
