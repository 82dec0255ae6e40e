use super::{ApiConfig, ApiError, ApiRequest, endpoints};
use crate::auth::{JwtExpiryCheck, NavigationSignal, NoNavigation, SessionStore, TokenExpiryCheck};
use crate::models::{RefreshTokenRequest, RefreshTokenResponse};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result of a call that went through the refresh flow.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    /// Decoded response body
    Ok(T),
    /// The access token was rejected and no usable refresh token was stored.
    /// The session has been cleared and the navigation signal fired.
    SessionExpired,
}

impl<T> ApiOutcome<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            ApiOutcome::Ok(value) => Some(value),
            ApiOutcome::SessionExpired => None,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiOutcome::SessionExpired)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        match self {
            ApiOutcome::Ok(value) => ApiOutcome::Ok(f(value)),
            ApiOutcome::SessionExpired => ApiOutcome::SessionExpired,
        }
    }
}

/// Authenticated client for the family task API.
///
/// Cloning is cheap; clones share the HTTP connection pool, the session
/// store and the refresh lock.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    expiry: Arc<dyn TokenExpiryCheck>,
    navigation: Arc<dyn NavigationSignal>,
    // Serializes refreshes so concurrent 401s spend the refresh token once.
    refresh_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.clone(),
            session,
            expiry: Arc::new(JwtExpiryCheck::with_leeway(config.expiry_leeway_secs)),
            navigation: Arc::new(NoNavigation),
            refresh_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Hook fired whenever the pipeline gives up on the session.
    pub fn with_navigation(mut self, navigation: impl NavigationSignal + 'static) -> Self {
        self.navigation = Arc::new(navigation);
        self
    }

    pub fn with_expiry_check(mut self, expiry: impl TokenExpiryCheck + 'static) -> Self {
        self.expiry = Arc::new(expiry);
        self
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one logical API call, recovering from an expired access token.
    ///
    /// - 2xx: the decoded body.
    /// - 401 with a usable refresh token: refresh, store the new access token,
    ///   and retry the same request once with it.
    /// - 401 without a usable refresh token: session cleared, navigation
    ///   signalled, `Ok(ApiOutcome::SessionExpired)`.
    /// - 401 and the refresh call fails: session cleared, navigation
    ///   signalled, `Err(ApiError::RefreshFailed)`.
    /// - 401 again on the retry: session cleared, navigation signalled,
    ///   `Err(ApiError::RetryRejected)`. No second refresh.
    /// - anything else: the error, unchanged.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<ApiOutcome<T>, ApiError> {
        let (stored, revision) = self.session.access_token_at();
        let token = request.token().map(str::to_owned).or(stored);

        match self.attempt(request, token.as_deref()).await {
            Ok(body) => Ok(ApiOutcome::Ok(body)),
            Err(e) if e.is_unauthorized() => {
                tracing::info!(
                    "{} {} was unauthorized, attempting token refresh",
                    request.method(),
                    request.endpoint()
                );

                let fresh = match self.recover_session(revision).await? {
                    Some(token) => token,
                    None => return Ok(ApiOutcome::SessionExpired),
                };

                let retry = request.clone().with_token(fresh.as_str());
                match self.attempt(&retry, Some(&fresh)).await {
                    Ok(body) => Ok(ApiOutcome::Ok(body)),
                    Err(e) if e.is_unauthorized() => {
                        tracing::warn!(
                            "{} {} rejected a freshly issued token, logging out",
                            request.method(),
                            request.endpoint()
                        );
                        self.end_session();
                        Err(ApiError::RetryRejected(Box::new(e)))
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Send exactly one HTTP request with `token` as bearer credential.
    ///
    /// No refresh handling: a 401 comes back as [`ApiError::Status`].
    pub async fn attempt<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = request.url(&self.base_url)?;
        tracing::debug!("API request: {} {}", request.method(), url);

        let mut builder = self
            .http
            .request(request.method().to_reqwest(), url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.payload() {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| {
            tracing::debug!("API transport error: {} {}: {}", request.method(), url, e);
            ApiError::Transport(e)
        })?;

        let status = resp.status();
        tracing::debug!("API response: {} {} -> {}", request.method(), url.path(), status);

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        let bytes = resp.bytes().await?;
        decode_body(&bytes)
    }

    /// Obtain a usable access token after a 401, or tear the session down.
    ///
    /// `revision` is the session revision observed when the failed request
    /// was built. If it moved while waiting for the lock, another call has
    /// already refreshed and its token is reused.
    async fn recover_session(&self, revision: u64) -> Result<Option<String>, ApiError> {
        let _guard = self.refresh_lock.lock().await;

        let (current, now) = self.session.access_token_at();
        if now != revision {
            if let Some(token) = current {
                tracing::debug!("Session changed during the request, reusing current access token");
                return Ok(Some(token));
            }
        }

        let refresh_token = match self.session.refresh_token() {
            Some(token) if !self.expiry.is_expired(&token) => token,
            _ => {
                tracing::warn!("Refresh token expired or missing, logging out");
                self.end_session();
                return Ok(None);
            }
        };

        match self.refresh_access_token(&refresh_token).await {
            Ok(access_token) => {
                self.session.set_access_token(access_token.as_str());
                tracing::info!("Access token refreshed");
                Ok(Some(access_token))
            }
            Err(e) => {
                tracing::error!("Token refresh failed: {}", e);
                self.end_session();
                Err(ApiError::RefreshFailed(Box::new(e)))
            }
        }
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Goes through [`attempt`](Self::attempt) only, so a rejected refresh
    /// never recurses into another refresh.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, ApiError> {
        let request = ApiRequest::post(endpoints::AUTH_REFRESH_TOKEN).with_json(
            &RefreshTokenRequest {
                refresh_token: refresh_token.to_string(),
            },
        )?;

        let stale = self.session.access_token();
        let resp: RefreshTokenResponse = self.attempt(&request, stale.as_deref()).await?;
        Ok(resp.data.access_token)
    }

    fn end_session(&self) {
        self.session.clear();
        self.navigation.go_to_login();
    }
}

/// Decode a response body; an empty body decodes as JSON `null`.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(bytes)?)
}
