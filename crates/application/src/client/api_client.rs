//! Request authorization and refresh-on-401 retry.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use snapshop_domain::{ApiRequest, ApiResponse, RefreshPolicy, RequestAuth, AUTHORIZATION};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::ClientError;
use crate::auth::{token_preview, CredentialStore, SessionState, TokenRefresher};
use crate::ports::HttpTransport;

/// Retry state of one request.
///
/// A request starts `Initial`; the first 401 moves it to `Retried`, after
/// which no further refresh is attempted for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// First send.
    Initial,
    /// The single resend after a successful refresh.
    Retried,
}

/// HTTP client core.
///
/// Cheap to clone; clones share the transport, session and refresh gate.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    session: SessionState,
    refresher: TokenRefresher,
    policy: RefreshPolicy,
    refresh_gate: Arc<Mutex<()>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("session", &self.session)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client core using `transport` for both API calls and refreshes.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, session: SessionState) -> Self {
        Self {
            refresher: TokenRefresher::new(Arc::clone(&transport)),
            transport,
            session,
            policy: RefreshPolicy::default(),
            refresh_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Sets how concurrent 401s share the refresh exchange.
    #[must_use]
    pub const fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The session this client authorizes against.
    #[must_use]
    pub const fn session(&self) -> &SessionState {
        &self.session
    }

    fn credentials(&self) -> &CredentialStore {
        self.session.credentials()
    }

    /// Sends a request, refreshing the session and retrying once on a 401.
    ///
    /// 2xx responses are returned unchanged. Any other outcome is an error.
    ///
    /// # Errors
    ///
    /// - `Transport` when no response could be obtained
    /// - `Status` for non-2xx responses not recovered by a refresh, including
    ///   a 401 on the retried request
    /// - `SessionExpired` when no refresh token was stored or the refresh
    ///   failed; the session has been logged out
    pub async fn request(&self, mut request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let sent_token = self.authorize(&mut request).await?;
        let mut attempt = Attempt::Initial;

        loop {
            debug!(
                request_id = %request.id,
                method = %request.method,
                path = %request.path,
                ?attempt,
                "sending request"
            );
            let response = self.transport.send(&request).await?;
            debug!(
                request_id = %request.id,
                status = response.status.as_u16(),
                elapsed_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX),
                "response received"
            );

            if response.is_success() {
                return Ok(response);
            }

            let refreshable = response.status.is_unauthorized()
                && request.auth == RequestAuth::Session
                && attempt == Attempt::Initial;
            if !refreshable {
                return Err(ClientError::from_response(response));
            }

            attempt = Attempt::Retried;
            let token = self.renew_session(sent_token.as_deref()).await?;
            request.set_bearer(&token);
        }
    }

    /// Sends a request and parses the 2xx body as JSON.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::request`], plus `MalformedResponse` if the body
    /// does not match `T`.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ClientError> {
        let path = request.path.clone();
        let response = self.request(request).await?;
        response
            .parse_json()
            .map_err(|e| ClientError::MalformedResponse(format!("{path}: {e}")))
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::request`].
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.request(ApiRequest::get(path)).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::request`].
    pub async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<ApiResponse, ClientError> {
        self.request(ApiRequest::post(path).with_json(body)).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::request`].
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.request(ApiRequest::delete(path)).await
    }

    /// Sets or strips the Authorization header according to the stored token.
    ///
    /// Returns the token that was attached.
    async fn authorize(&self, request: &mut ApiRequest) -> Result<Option<String>, ClientError> {
        if request.auth == RequestAuth::Anonymous {
            return Ok(None);
        }
        let token = self.credentials().access_token().await?;
        match &token {
            Some(token) => request.set_bearer(token),
            None => request.remove_header(AUTHORIZATION),
        }
        Ok(token)
    }

    /// Obtains a fresh access token after a 401, honouring the refresh policy.
    async fn renew_session(&self, sent_token: Option<&str>) -> Result<String, ClientError> {
        match self.policy {
            RefreshPolicy::Independent => self.refresh_session().await,
            RefreshPolicy::SingleFlight => {
                let _gate = self.refresh_gate.lock().await;
                let current = self.credentials().access_token().await?;
                if let Some(current) = current
                    && Some(current.as_str()) != sent_token
                {
                    debug!(
                        token = %token_preview(&current),
                        "token already refreshed by a concurrent request"
                    );
                    return Ok(current);
                }
                self.refresh_session().await
            }
        }
    }

    /// Runs the refresh exchange and applies its outcome.
    ///
    /// On success the new token is persisted and pushed to the session. On
    /// failure, or when no refresh token is stored, the session is logged out.
    async fn refresh_session(&self) -> Result<String, ClientError> {
        let Some(refresh_token) = self.credentials().refresh_token().await? else {
            warn!("received 401 without a stored refresh token");
            self.force_logout().await;
            return Err(ClientError::SessionExpired { cause: None });
        };

        match self.refresher.refresh(&refresh_token).await {
            Ok(token) => {
                self.credentials().update_access_token(&token).await?;
                self.session.update_access_token(token.clone());
                info!(token = %token_preview(&token), "access token refreshed");
                Ok(token)
            }
            Err(error) => {
                warn!(%error, "token refresh failed");
                self.force_logout().await;
                Err(ClientError::SessionExpired { cause: Some(error) })
            }
        }
    }

    async fn force_logout(&self) {
        if let Err(error) = self.session.logout().await {
            warn!(%error, "failed to clear stored credentials during logout");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::RefreshError;
    use crate::ports::TransportError;
    use crate::testing::{MemoryStore, ScriptedTransport};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use snapshop_domain::{Session, StatusCode, UserProfile};
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn signed_in(storage: Arc<MemoryStore>) -> SessionState {
        let credentials = CredentialStore::new(storage);
        credentials
            .save("old", Some("xyz"), &UserProfile::from_email("a@b.com"))
            .await
            .unwrap();
        SessionState::restore(credentials).await.unwrap()
    }

    fn ok() -> Result<ApiResponse, TransportError> {
        Ok(ApiResponse::json(200, &json!({"ok": true})))
    }

    fn unauthorized() -> Result<ApiResponse, TransportError> {
        Ok(ApiResponse::json(401, &json!({"msg": "Token has expired"})))
    }

    #[tokio::test]
    async fn test_no_authorization_header_without_token() {
        let transport = ScriptedTransport::queued(vec![ok()]);
        let session = SessionState::new(CredentialStore::new(MemoryStore::new()));
        let client = ApiClient::new(transport.clone(), session);

        let mut request = ApiRequest::post("/search");
        request.set_header("authorization", "Bearer stale");
        client.request(request).await.unwrap();

        assert!(transport.sent()[0].authorization().is_none());
    }

    #[tokio::test]
    async fn test_bearer_header_with_stored_token() {
        let transport = ScriptedTransport::queued(vec![ok()]);
        let client = ApiClient::new(transport.clone(), signed_in(MemoryStore::new()).await);

        let response = client.request(ApiRequest::get("/wishlist-protected")).await.unwrap();

        assert_eq!(response.status, StatusCode::new(200));
        assert_eq!(transport.sent()[0].authorization(), Some("Bearer old"));
    }

    #[tokio::test]
    async fn test_anonymous_request_carries_no_token_and_skips_refresh() {
        let transport = ScriptedTransport::queued(vec![Ok(ApiResponse::json(
            401,
            &json!({"error": "Invalid email or password"}),
        ))]);
        let client = ApiClient::new(transport.clone(), signed_in(MemoryStore::new()).await);

        let err = client
            .request(ApiRequest::post("/login").anonymous())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(err.server_message().as_deref(), Some("Invalid email or password"));
        assert_eq!(transport.sent().len(), 1);
        assert!(transport.sent()[0].authorization().is_none());
        assert!(client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_401_refreshes_once_and_retries_with_new_token() {
        let transport = ScriptedTransport::queued(vec![
            unauthorized(),
            Ok(ApiResponse::json(200, &json!({"access_token": "new"}))),
            Ok(ApiResponse::json(200, &json!({"wishlist": [], "count": 0}))),
        ]);
        let storage = MemoryStore::new();
        let client = ApiClient::new(transport.clone(), signed_in(storage.clone()).await);

        let response = client.request(ApiRequest::get("/wishlist-protected")).await.unwrap();

        assert_eq!(
            response.parse_json::<serde_json::Value>().unwrap(),
            json!({"wishlist": [], "count": 0})
        );
        let sent = transport.sent();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1].path, "/refresh");
        assert_eq!(sent[1].authorization(), Some("Bearer xyz"));
        assert_eq!(sent[2].path, "/wishlist-protected");
        assert_eq!(sent[2].authorization(), Some("Bearer new"));
        assert_eq!(sent[0].id, sent[2].id);
        assert_eq!(storage.value("token").as_deref(), Some("new"));
        assert_eq!(client.session().access_token().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_second_401_is_not_retried_again() {
        let transport = ScriptedTransport::queued(vec![
            unauthorized(),
            Ok(ApiResponse::json(200, &json!({"access_token": "new"}))),
            unauthorized(),
        ]);
        let client = ApiClient::new(transport.clone(), signed_in(MemoryStore::new()).await);

        let err = client
            .request(ApiRequest::get("/wishlist-protected"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(transport.sent_to("/refresh").len(), 1);
        assert_eq!(transport.sent().len(), 3);
        assert!(client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_401_without_refresh_token_logs_out_without_refresh_call() {
        let transport = ScriptedTransport::queued(vec![unauthorized()]);
        let storage = MemoryStore::new();
        let credentials = CredentialStore::new(storage.clone());
        credentials
            .save("old", None, &UserProfile::from_email("a@b.com"))
            .await
            .unwrap();
        let session = SessionState::restore(credentials).await.unwrap();
        let client = ApiClient::new(transport.clone(), session);

        let err = client
            .request(ApiRequest::get("/wishlist-protected"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::SessionExpired { cause: None }));
        assert!(transport.sent_to("/refresh").is_empty());
        assert_eq!(client.session().snapshot(), Session::anonymous());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_logs_out_and_does_not_retry() {
        let transport = ScriptedTransport::queued(vec![
            unauthorized(),
            Ok(ApiResponse::json(403, &json!({"msg": "revoked"}))),
        ]);
        let storage = MemoryStore::new();
        let client = ApiClient::new(transport.clone(), signed_in(storage.clone()).await);

        let err = client
            .request(ApiRequest::get("/wishlist-protected"))
            .await
            .unwrap_err();

        match err {
            ClientError::SessionExpired {
                cause: Some(RefreshError::Rejected { status, .. }),
            } => assert_eq!(status, StatusCode::new(403)),
            other => panic!("expected session expiry, got {other:?}"),
        }
        assert_eq!(transport.sent().len(), 2);
        assert_eq!(transport.sent_to("/wishlist-protected").len(), 1);
        assert!(!client.session().is_authenticated());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_other_errors_propagate_untouched() {
        let transport = ScriptedTransport::queued(vec![
            Ok(ApiResponse::json(500, &json!({"error": "Failed to fetch wishlist"}))),
            Err(TransportError::ConnectionFailed("reset".to_string())),
        ]);
        let client = ApiClient::new(transport.clone(), signed_in(MemoryStore::new()).await);

        let err = client
            .request(ApiRequest::get("/wishlist-protected"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::new(500)));

        let err = client
            .request(ApiRequest::get("/wishlist-protected"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(TransportError::ConnectionFailed(_))));
        assert!(transport.sent_to("/refresh").is_empty());
        assert!(client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_send_json_reports_malformed_body() {
        #[derive(Debug, serde::Deserialize)]
        struct Products {
            #[allow(dead_code)]
            products: Vec<serde_json::Value>,
        }
        let transport = ScriptedTransport::queued(vec![ok()]);
        let client = ApiClient::new(transport, signed_in(MemoryStore::new()).await);

        let err = client
            .send_json::<Products>(ApiRequest::post("/search"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    /// Answers 401 to any protected request carrying `Bearer old`, 200 otherwise,
    /// and counts refresh calls.
    fn expiring_backend(refreshes: Arc<AtomicUsize>) -> Arc<ScriptedTransport> {
        ScriptedTransport::with_handler(move |request| {
            if request.path == "/refresh" {
                let n = refreshes.fetch_add(1, Ordering::SeqCst) + 1;
                return Ok(ApiResponse::json(200, &json!({"access_token": format!("new-{n}")})));
            }
            if request.authorization() == Some("Bearer old") {
                return unauthorized();
            }
            ok()
        })
    }

    #[tokio::test]
    async fn test_concurrent_401s_refresh_independently_by_default() {
        let refreshes = Arc::new(AtomicUsize::new(0));
        let transport = expiring_backend(refreshes.clone());
        let client = ApiClient::new(transport, signed_in(MemoryStore::new()).await);

        let (a, b) = tokio::join!(
            client.request(ApiRequest::get("/wishlist-protected")),
            client.request(ApiRequest::post("/search")),
        );

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(refreshes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_single_flight_policy_shares_one_refresh() {
        let refreshes = Arc::new(AtomicUsize::new(0));
        let transport = expiring_backend(refreshes.clone());
        let client = ApiClient::new(transport.clone(), signed_in(MemoryStore::new()).await)
            .with_refresh_policy(RefreshPolicy::SingleFlight);

        let (a, b) = tokio::join!(
            client.request(ApiRequest::get("/wishlist-protected")),
            client.request(ApiRequest::post("/search")),
        );

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(refreshes.load(Ordering::SeqCst), 1);
        let retried: Vec<_> = transport
            .sent()
            .into_iter()
            .filter(|r| r.path != "/refresh" && r.authorization() == Some("Bearer new-1"))
            .collect();
        assert_eq!(retried.len(), 2);
    }
}
