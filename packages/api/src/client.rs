//! # ApiClient — the single way controllers reach the backend
//!
//! Every call goes through [`ApiClient::send`], which:
//!
//! 1. resolves a fresh CSRF token for mutating requests and attaches it as
//!    `X-CSRFToken` (no token → [`ApiError::AuthMissing`], nothing is sent);
//! 2. hands the request to the [`Transport`];
//! 3. passes 2xx bodies through unchanged;
//! 4. otherwise classifies the failure once, shows it through the
//!    [`Notifier`], and returns the same error so the caller can react.
//!
//! Resource-scoped groups (`scenic()`, `favorites()`, `orders()`, ...) live in
//! [`crate::resources`].

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::notify::Notifier;
use crate::token::{self, CsrfToken, TokenSources};
use crate::transport::{ApiRequest, Transport};

#[derive(Clone, Debug)]
pub struct ApiClient<T, N, S> {
    transport: T,
    notifier: N,
    tokens: S,
}

impl<T, N, S> ApiClient<T, N, S>
where
    T: Transport,
    N: Notifier,
    S: TokenSources,
{
    pub fn new(transport: T, notifier: N, tokens: S) -> Self {
        Self {
            transport,
            notifier,
            tokens,
        }
    }

    /// Resolve the CSRF token as the page exposes it right now.
    pub fn token(&self) -> Option<CsrfToken> {
        token::resolve_token(&self.tokens)
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Send a request and return the raw JSON body of a 2xx response.
    pub async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        match self.dispatch(request).await {
            Ok(body) => Ok(body),
            Err(err) => Err(self.report(err)),
        }
    }

    /// Like [`send`](Self::send), decoding the body into `R`.
    pub async fn send_as<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let body = self.send(request).await?;
        serde_json::from_value(body).map_err(|e| self.report(ApiError::Decode(e.to_string())))
    }

    async fn dispatch(&self, mut request: ApiRequest) -> Result<Value, ApiError> {
        if request.is_mutating() {
            let token = self.token().ok_or(ApiError::AuthMissing)?;
            request = request.header(token::HEADER_NAME, token.as_str());
        }

        let method = request.method.clone();
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ApiError::from_status(response.status, &response.body));
        }
        tracing::debug!("{method} {path} succeeded with {}", response.status);
        Ok(response.body)
    }

    fn report(&self, err: ApiError) -> ApiError {
        tracing::warn!("API call failed: {err}");
        self.notifier.error(&err.user_message());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::token::StaticTokenSources;
    use crate::transport::{MemoryTransport, TransportError};
    use serde_json::json;

    fn client_with(
        tokens: StaticTokenSources,
    ) -> (
        ApiClient<MemoryTransport, RecordingNotifier, StaticTokenSources>,
        MemoryTransport,
        RecordingNotifier,
    ) {
        let transport = MemoryTransport::new();
        let notifier = RecordingNotifier::new();
        let client = ApiClient::new(transport.clone(), notifier.clone(), tokens);
        (client, transport, notifier)
    }

    fn with_cookie(token: &str) -> StaticTokenSources {
        StaticTokenSources {
            cookies: Some(format!("csrftoken={token}")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_success_passes_body_through() {
        let (client, transport, notifier) = client_with(StaticTokenSources::default());
        transport.respond(200, json!({ "status": "success", "data": [1, 2] }));

        let body = client.send(ApiRequest::get("scenic/list/")).await.unwrap();

        assert_eq!(body, json!({ "status": "success", "data": [1, 2] }));
        assert!(notifier.notices().is_empty());
        // reads never need a token
        assert_eq!(transport.sent()[0].header_value("X-CSRFToken"), None);
    }

    #[tokio::test]
    async fn test_mutating_request_carries_fresh_token() {
        let (client, transport, _) = client_with(with_cookie("t0k"));
        transport.respond(200, json!({ "status": "success" }));

        client
            .send(ApiRequest::post("orders/create/").json(json!({})))
            .await
            .unwrap();

        assert_eq!(transport.sent()[0].header_value("X-CSRFToken"), Some("t0k"));
    }

    #[tokio::test]
    async fn test_missing_token_blocks_mutating_request() {
        let (client, transport, notifier) = client_with(StaticTokenSources::default());

        let err = client
            .send(ApiRequest::delete("comments/3/"))
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::AuthMissing);
        assert_eq!(transport.sent_count(), 0);
        assert_eq!(notifier.errors(), vec!["请先登录".to_string()]);
    }

    #[tokio::test]
    async fn test_http_failure_notified_once_and_returned() {
        let (client, transport, notifier) = client_with(with_cookie("t"));
        transport.respond(403, json!({ "detail": "forbidden" }));

        let err = client
            .send(ApiRequest::put("users/profile/"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApiError::Http {
                status: 403,
                message: "forbidden".into()
            }
        );
        assert_eq!(notifier.errors(), vec!["没有权限执行此操作".to_string()]);
    }

    #[tokio::test]
    async fn test_transport_failures_are_classified() {
        let (client, transport, notifier) = client_with(StaticTokenSources::default());
        transport
            .reply(Err(TransportError::NoResponse("timeout".into())))
            .reply(Err(TransportError::Build("relative URL".into())));

        let first = client.send(ApiRequest::get("news/list/")).await.unwrap_err();
        let second = client.send(ApiRequest::get("news/list/")).await.unwrap_err();

        assert_eq!(first, ApiError::Network("timeout".into()));
        assert_eq!(second, ApiError::Client("relative URL".into()));
        assert_eq!(
            notifier.errors(),
            vec![
                "网络错误，请检查网络连接".to_string(),
                "请求失败：relative URL".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_send_as_reports_decode_failure() {
        #[derive(Debug, serde::Deserialize)]
        struct Needs {
            #[allow(dead_code)]
            count: u32,
        }

        let (client, transport, notifier) = client_with(StaticTokenSources::default());
        transport.respond(200, json!({ "count": "many" }));

        let err = client
            .send_as::<Needs>(ApiRequest::get("x/"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(notifier.errors().len(), 1);
    }
}
