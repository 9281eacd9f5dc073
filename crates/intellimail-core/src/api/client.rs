//! API client for communicating with the IntelliMail REST API.
//!
//! Every request goes through `ApiClient::send`, which attaches the stored
//! bearer token, applies the request timeout, and enforces the global
//! session policy: a 401 from any endpoint clears the token store, resets
//! the session and sends the user back to the login view.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::{AiApi, ApiError, AuthApi, EmailApi};
use crate::auth::session::SessionState;
use crate::auth::TokenStore;
use crate::navigation::{Navigator, Route};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout.
/// 30s tolerates a cold-starting backend without leaving the user hanging.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Which bearer token a request carries.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Bearer<'a> {
    /// Whatever the token store holds once startup hydration has finished
    Stored,
    /// A specific token, used while hydration itself is running
    Explicit(&'a str),
}

/// API client for the IntelliMail backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
///
/// Requests that carry the stored bearer token wait until the stored session
/// has been restored. Pass the client (or a clone) to
/// `SessionContext::hydrate` before issuing requests; until then they stay
/// pending.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    state: SessionState,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a new API client over the given token store.
    pub fn new(base_url: Url, store: Arc<TokenStore>, navigator: Arc<dyn Navigator>) -> Result<Self> {
        Self::with_timeout(base_url, store, navigator, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: Url,
        store: Arc<TokenStore>,
        navigator: Arc<dyn Navigator>,
        timeout: Duration,
    ) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot carry paths: {}", base_url);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            state: SessionState::new(store),
            navigator,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn emails(&self) -> EmailApi<'_> {
        EmailApi::new(self)
    }

    pub fn ai(&self) -> AiApi<'_> {
        AiApi::new(self)
    }

    pub(crate) fn session_state(&self) -> &SessionState {
        &self.state
    }

    /// Build an endpoint URL from path segments below the base URL.
    /// A trailing `""` segment produces a trailing slash.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidRequest(format!("Bad base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.client.request(method, self.endpoint(segments)?))
    }

    fn auth_headers(token: Option<&str>) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = token {
            match header::HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(header::AUTHORIZATION, value);
                }
                Err(_) => warn!("Stored access token is not a valid header value, sending without it"),
            }
        }
        headers
    }

    /// Send a request and parse a 2xx JSON body.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        bearer: Bearer<'_>,
    ) -> Result<T, ApiError> {
        let token = match bearer {
            Bearer::Stored => {
                self.state.wait_ready().await;
                self.state.access_token()
            }
            Bearer::Explicit(token) => Some(token.to_string()),
        };

        let request = request
            .headers(Self::auth_headers(token.as_deref()))
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, bearer = token.is_some(), "API request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(&path);
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%method, %path, %status, "API request failed");
            return Err(ApiError::from_status(status, &body));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", path, e))
            }
        })
    }

    /// Global policy for a rejected bearer token: end the session everywhere.
    fn handle_unauthorized(&self, path: &str) {
        warn!(path = path, "Backend rejected credentials, ending session");
        self.state.teardown();
        self.navigator.navigate(Route::Login);
    }
}
