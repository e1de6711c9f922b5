//! # CSRF token resolution
//!
//! Mutating requests must carry the Django CSRF token in `X-CSRFToken`. The
//! page can expose it in three places, tried in this order:
//!
//! 1. `<meta name="csrf-token" content="...">`
//! 2. the `csrftoken` cookie
//! 3. `<input type="hidden" name="csrfmiddlewaretoken" value="...">`
//!
//! [`resolve_token`] is pure over a [`TokenSources`] implementation and is
//! called again for every request, so a session change mid-page is picked up.

use std::fmt;

/// Name of the `<meta>` tag carrying the token.
pub const META_NAME: &str = "csrf-token";
/// Name of the cookie carrying the token.
pub const COOKIE_NAME: &str = "csrftoken";
/// Name of the hidden form field carrying the token.
pub const HIDDEN_FIELD_NAME: &str = "csrfmiddlewaretoken";
/// Header the backend reads the token from.
pub const HEADER_NAME: &str = "X-CSRFToken";

/// An opaque CSRF credential.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "CsrfToken({prefix}...)")
    }
}

/// Where the page keeps its token candidates.
pub trait TokenSources {
    /// `content` of the csrf `<meta>` tag, if present.
    fn meta_content(&self) -> Option<String>;
    /// The raw `document.cookie` string.
    fn cookie_string(&self) -> Option<String>;
    /// `value` of the hidden csrf input, if present.
    fn hidden_field(&self) -> Option<String>;
}

/// Resolve the token from the highest-priority source that has one.
pub fn resolve_token(sources: &impl TokenSources) -> Option<CsrfToken> {
    let token = non_empty(sources.meta_content())
        .or_else(|| {
            sources
                .cookie_string()
                .and_then(|cookies| cookie_value(&cookies, COOKIE_NAME))
        })
        .or_else(|| non_empty(sources.hidden_field()))
        .map(CsrfToken);

    if token.is_none() {
        tracing::error!("unable to resolve a CSRF token from meta tag, cookie or form field");
    }
    token
}

/// Find `name` in a `document.cookie` style string and percent-decode its value.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .map(|raw| {
            urlencoding::decode(raw)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| raw.to_string())
        })
        .filter(|v| !v.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Fixed token sources, used when the values are already known.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenSources {
    pub meta: Option<String>,
    pub cookies: Option<String>,
    pub hidden: Option<String>,
}

impl TokenSources for StaticTokenSources {
    fn meta_content(&self) -> Option<String> {
        self.meta.clone()
    }

    fn cookie_string(&self) -> Option<String> {
        self.cookies.clone()
    }

    fn hidden_field(&self) -> Option<String> {
        self.hidden.clone()
    }
}
