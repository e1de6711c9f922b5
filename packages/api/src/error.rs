//! Error taxonomy for calls against the site's REST API.

use thiserror::Error;

use crate::transport::TransportError;

/// Every way an API call can fail, as seen by a controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No CSRF token could be resolved, so the mutating request was never sent.
    #[error("no CSRF token available")]
    AuthMissing,
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// The request went out but no response came back (includes timeouts).
    #[error("network error: {0}")]
    Network(String),
    /// The request could not be built.
    #[error("request failed: {0}")]
    Client(String),
    /// A 2xx body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Fallback when the server gives no usable message.
pub const GENERIC_FAILURE: &str = "请求失败";

impl ApiError {
    /// Build an [`ApiError::Http`] from a status code and the decoded body.
    ///
    /// The message is taken from `message`, then `detail`, then
    /// [`GENERIC_FAILURE`].
    pub fn from_status(status: u16, body: &serde_json::Value) -> Self {
        let message = ["message", "detail"]
            .iter()
            .find_map(|key| body.get(key).and_then(|v| v.as_str()))
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_FAILURE)
            .to_string();
        ApiError::Http { status, message }
    }

    /// The text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::AuthMissing => "请先登录".to_string(),
            ApiError::Http { status: 401, .. } => "请先登录".to_string(),
            ApiError::Http { status: 403, .. } => "没有权限执行此操作".to_string(),
            ApiError::Http { status: 404, .. } => "资源不存在".to_string(),
            ApiError::Http { status: 500, .. } => "服务器错误，请稍后重试".to_string(),
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Network(_) => "网络错误，请检查网络连接".to_string(),
            ApiError::Client(detail) | ApiError::Decode(detail) => {
                format!("{GENERIC_FAILURE}：{detail}")
            }
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ApiError::AuthMissing | ApiError::Http { status: 401, .. }
        )
    }
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::NoResponse(detail) => ApiError::Network(detail),
            TransportError::Build(detail) => ApiError::Client(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_status_messages() {
        let body = json!({ "message": "ignored" });
        assert_eq!(ApiError::from_status(401, &body).user_message(), "请先登录");
        assert_eq!(
            ApiError::from_status(403, &body).user_message(),
            "没有权限执行此操作"
        );
        assert_eq!(ApiError::from_status(404, &body).user_message(), "资源不存在");
        assert_eq!(
            ApiError::from_status(500, &body).user_message(),
            "服务器错误，请稍后重试"
        );
    }

    #[test]
    fn test_other_status_uses_body_message() {
        let err = ApiError::from_status(400, &json!({ "message": "库存不足" }));
        assert_eq!(err.user_message(), "库存不足");

        let err = ApiError::from_status(409, &json!({ "detail": "conflict" }));
        assert_eq!(err.user_message(), "conflict");

        let err = ApiError::from_status(422, &serde_json::Value::Null);
        assert_eq!(err.user_message(), "请求失败");
    }

    #[test]
    fn test_transport_messages() {
        assert_eq!(
            ApiError::Network("timed out".into()).user_message(),
            "网络错误，请检查网络连接"
        );
        assert_eq!(
            ApiError::Client("bad url".into()).user_message(),
            "请求失败：bad url"
        );
    }

    #[test]
    fn test_is_auth() {
        assert!(ApiError::AuthMissing.is_auth());
        assert!(ApiError::from_status(401, &serde_json::Value::Null).is_auth());
        assert!(!ApiError::Network("x".into()).is_auth());
    }
}
