use std::time::Duration;

use anyhow::{Context, Result};

use crate::model::Session;
use crate::store::SessionStore;

mod http;
pub use self::http::RequestSpec;

mod types;
pub use self::types::*;

mod session;
use self::session::SessionGate;

mod analytics;
mod auth;
mod links;
mod validate;

/// Typed client for the Shortify backend.
///
/// Owns the session gate: every operation that needs credentials goes
/// through [`ApiClient::authorized`], which attaches the bearer token and
/// transparently refreshes it on expiry.
pub struct ApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
    gate: SessionGate,
}

impl ApiClient {
    pub fn open(base_url: impl Into<String>, store: SessionStore) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("shortify")
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .context("build reqwest client")?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let gate = SessionGate::load(store)?;
        Ok(Self {
            base_url,
            client,
            gate,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Synchronous read of the authenticated state; no network.
    pub fn current_session(&self) -> Option<Session> {
        self.gate.current()
    }
}
