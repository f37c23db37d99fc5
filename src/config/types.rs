//! Client configuration: where the API lives and how requests are credentialed.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOGIN_URL: &str = "/login/";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Origin of the backend, e.g. `https://lab.example.org`. Paths are appended as-is.
    pub base_url: String,
    /// Sent as `X-CSRFToken` on every request.
    #[serde(default)]
    pub csrf_token: Option<String>,
    /// Django session id, sent as the `sessionid` cookie.
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default = "default_login_url")]
    pub login_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_login_url() -> String {
    DEFAULT_LOGIN_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            csrf_token: None,
            session_id: None,
            login_url: default_login_url(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Absolute login URL, resolving a relative `login_url` against `base_url`.
    pub fn login_url(&self) -> String {
        if self.login_url.starts_with("http://") || self.login_url.starts_with("https://") {
            self.login_url.clone()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), self.login_url)
        }
    }
}
