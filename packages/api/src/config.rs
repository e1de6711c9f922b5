//! # Client configuration
//!
//! [`ClientConfig`] holds everything the browser client needs to know about
//! the site it runs on. It can be built with [`ClientConfig::default`] and the
//! `with_*` helpers, or parsed from TOML. The page template may embed that
//! TOML in a `<script type="application/toml" id="site-config">` element,
//! which [`ClientConfig::from_page`] picks up:
//!
//! ```toml
//! base_url = "/api/v1/"
//! timeout_secs = 10
//! login_url = "/users/login/"
//! media_root = "/media/"
//! placeholder_image = "/static/images/placeholder.jpg"
//! toast_duration_ms = 3000
//! ```
//!
//! Missing keys fall back to the defaults above.

use std::time::Duration;

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ClientConfig {
    /// Root of the REST API. May be relative to the page origin.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout shared by every request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Where unauthenticated users are sent.
    #[serde(default = "default_login_url")]
    pub login_url: String,
    /// Prefix for relative media paths.
    #[serde(default = "default_media_root")]
    pub media_root: String,
    /// Image shown when an entity has none.
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,
    /// How long a toast stays on screen.
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
}

fn default_base_url() -> String {
    "/api/v1/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_login_url() -> String {
    "/users/login/".to_string()
}

fn default_media_root() -> String {
    "/media/".to_string()
}

fn default_placeholder_image() -> String {
    "/static/images/placeholder.jpg".to_string()
}

fn default_toast_duration_ms() -> u64 {
    3000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            login_url: default_login_url(),
            media_root: default_media_root(),
            placeholder_image: default_placeholder_image(),
            toast_duration_ms: default_toast_duration_ms(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    /// Make a relative `base_url` absolute against the page origin
    /// (e.g. `"https://travel.example.com"`).
    pub fn resolve_against(mut self, origin: &str) -> Self {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            let origin = origin.trim_end_matches('/');
            let path = self.base_url.trim_start_matches('/');
            self.base_url = format!("{origin}/{path}");
        }
        self
    }

    /// Join an API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Configuration for the page the app is mounted in: the TOML the
    /// template embedded (if any) resolved against the page origin. A
    /// malformed document is logged and the defaults are used.
    pub fn from_page(embedded: Option<&str>, origin: Option<&str>) -> Self {
        let config = match embedded.map(Self::from_toml) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                tracing::warn!("ignoring embedded client config: {e}");
                Self::default()
            }
            None => Self::default(),
        };
        match origin {
            Some(origin) => config.resolve_against(origin),
            None => config,
        }
    }
}
