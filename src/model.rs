use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: 1,
            api_base_url: None,
        }
    }
}

impl ClientConfig {
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }
}

/// The authenticated state: a token pair plus the subject it belongs to.
/// A session only exists with both tokens present; anything less is
/// treated as signed out.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub user_id: String,
}

/// On-disk form of [`Session`] (session.json).
///
/// Fields default to empty so older or hand-edited files still parse; the
/// both-tokens rule is applied when converting into a live session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRecord {
    pub version: u32,

    #[serde(default)]
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: String,

    #[serde(default)]
    pub token_type: String,

    #[serde(default)]
    pub user_id: String,
}

impl SessionRecord {
    pub fn from_session(session: &Session) -> Self {
        Self {
            version: 1,
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            token_type: session.token_type.clone(),
            user_id: session.user_id.clone(),
        }
    }

    /// A partial pair (either token missing) is "no session."
    pub fn into_session(self) -> Option<Session> {
        if self.access_token.is_empty() || self.refresh_token.is_empty() {
            return None;
        }
        Some(Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: if self.token_type.is_empty() {
                "Bearer".to_string()
            } else {
                self.token_type
            },
            user_id: self.user_id,
        })
    }
}
