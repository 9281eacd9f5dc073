//! OAuth login flow.
//!
//! `AuthFlowController` drives the login page through one round trip with
//! the provider. Two backend variants are supported, selected by where the
//! provider's redirect lands:
//!
//! - `/auth/callback?token=..&access_token=..` (server-redirect): the backend
//!   already exchanged the code and hands over finished tokens. Primary path.
//! - any other route with `?code=..` (code-exchange): the code is redeemed
//!   through `POST /auth/google/callback`.
//!
//! Either path ends in an authenticated session or `FlowState::Failed`. The
//! one-shot query parameters are always stripped from the visible location.
//! Dropping an in-flight `handle_redirect` future before the exchange
//! resolves leaves the session and token store untouched.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::decoder::{self, Identity, MalformedTokenError};
use super::session::{Credential, SessionContext};
use crate::navigation::{Navigator, Route};

/// Route the backend redirects to after a server-side exchange
pub const SERVER_CALLBACK_PATH: &str = "/auth/callback";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Authentication was cancelled or failed: {0}")]
    ProviderError(String),

    #[error("Missing authentication tokens")]
    MissingTokens,

    #[error("Authentication failed: {0}")]
    MalformedToken(#[from] MalformedTokenError),

    #[error("Authentication failed: {0}")]
    Exchange(String),

    #[error("Failed to initiate authentication: {0}")]
    AuthorizationUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    /// The user has been sent to the provider
    Redirecting { authorization_url: Url },
    /// A code is being redeemed with the backend
    Exchanging,
    /// Logged in through code exchange
    Authenticated,
    /// Logged in through server-redirect tokens
    AuthenticatedViaCallback,
    Failed(AuthFailure),
}

impl FlowState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, FlowState::Authenticated | FlowState::AuthenticatedViaCallback)
    }
}

/// Parameters read from a provider redirect, decided once per location.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Callback {
    ProviderError(String),
    Code(String),
    Tokens {
        identity_token: String,
        access_token: String,
    },
    MissingTokens,
    Nothing,
}

impl Callback {
    fn parse(location: &Url) -> Self {
        let params: HashMap<String, String> = location
            .query_pairs()
            .into_owned()
            .filter(|(_, value)| !value.is_empty())
            .collect();

        if let Some(error) = params.get("error") {
            return Callback::ProviderError(error.clone());
        }

        if is_server_callback(location) {
            match (params.get("token"), params.get("access_token")) {
                (Some(identity_token), Some(access_token)) => Callback::Tokens {
                    identity_token: identity_token.clone(),
                    access_token: access_token.clone(),
                },
                _ => Callback::MissingTokens,
            }
        } else {
            params
                .get("code")
                .map(|code| Callback::Code(code.clone()))
                .unwrap_or(Callback::Nothing)
        }
    }
}

fn is_server_callback(location: &Url) -> bool {
    location.path().trim_end_matches('/') == SERVER_CALLBACK_PATH
}

pub struct AuthFlowController {
    session: SessionContext,
    navigator: Arc<dyn Navigator>,
    state: FlowState,
    refresh_token: Option<String>,
}

impl AuthFlowController {
    pub fn new(session: SessionContext, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            session,
            navigator,
            state: FlowState::Idle,
            refresh_token: None,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Refresh token issued by the last successful code exchange
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Request the provider's authorization URL and send the user there.
    pub async fn begin_login(&mut self) -> &FlowState {
        let response = match self.session.api().auth().authorization_url().await {
            Ok(response) => response,
            Err(e) => {
                self.fail(AuthFailure::AuthorizationUrl(e.to_string()));
                return &self.state;
            }
        };

        match Url::parse(&response.authorization_url) {
            Ok(url) => {
                info!(host = url.host_str().unwrap_or(""), "Redirecting to OAuth provider");
                self.navigator.open_external(&url);
                self.state = FlowState::Redirecting {
                    authorization_url: url,
                };
            }
            Err(e) => self.fail(AuthFailure::AuthorizationUrl(e.to_string())),
        }
        &self.state
    }

    /// Handle the location the provider (or backend) redirected back to.
    ///
    /// A location without callback parameters leaves the state untouched.
    /// An authorization code is submitted at most once per `ApiClient`, across
    /// every controller built over it. Codes are not remembered across
    /// processes; the provider rejects a replayed code on its own.
    pub async fn handle_redirect(&mut self, location: &Url) -> &FlowState {
        let callback = Callback::parse(location);
        if callback == Callback::Nothing {
            return &self.state;
        }
        self.strip_query(location);

        match callback {
            Callback::ProviderError(error) => self.fail(AuthFailure::ProviderError(error)),
            Callback::MissingTokens => self.fail(AuthFailure::MissingTokens),
            Callback::Tokens {
                identity_token,
                access_token,
            } => self.accept_tokens(identity_token, access_token),
            Callback::Code(code) => self.exchange_code(code).await,
            Callback::Nothing => {}
        }
        &self.state
    }

    fn accept_tokens(&mut self, identity_token: String, access_token: String) {
        // Decode before persisting so a bad token never reaches storage
        match decoder::decode(&identity_token) {
            Ok(identity) => {
                self.session
                    .login(identity, Credential::new(access_token, Some(identity_token)));
                self.navigator.navigate(Route::Dashboard);
                self.state = FlowState::AuthenticatedViaCallback;
            }
            Err(e) => self.fail(AuthFailure::MalformedToken(e)),
        }
    }

    async fn exchange_code(&mut self, code: String) {
        if !self.session.api().session_state().claim_code(&code) {
            debug!("Authorization code already submitted, ignoring");
            return;
        }

        self.state = FlowState::Exchanging;
        match self.session.api().auth().exchange_code(&code).await {
            Ok(response) => {
                self.refresh_token = response.refresh_token;
                self.session.login(
                    Identity::from(response.user_info),
                    Credential::new(response.access_token, None),
                );
                self.navigator.navigate(Route::Dashboard);
                self.state = FlowState::Authenticated;
            }
            Err(e) => self.fail(AuthFailure::Exchange(e.to_string())),
        }
    }

    fn fail(&mut self, reason: AuthFailure) {
        warn!(reason = %reason, "Login failed");
        self.navigator.navigate(Route::Login);
        self.state = FlowState::Failed(reason);
    }

    fn strip_query(&self, location: &Url) {
        let mut clean = location.clone();
        clean.set_query(None);
        self.navigator.replace_location(&clean);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::auth::decoder::encode_for_test;
    use crate::auth::TokenStore;
    use crate::navigation::RecordingNavigator;
    use serde_json::json;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    /// Controller over an empty in-memory store. The backend address is
    /// never contacted by the server-redirect path.
    async fn controller() -> (AuthFlowController, Arc<TokenStore>, Arc<RecordingNavigator>) {
        let store = Arc::new(TokenStore::in_memory());
        let nav = Arc::new(RecordingNavigator::new());
        let api = ApiClient::new(url("http://127.0.0.1:9"), store.clone(), nav.clone()).unwrap();
        let session = SessionContext::hydrate(api).await;
        (AuthFlowController::new(session, nav.clone()), store, nav)
    }

    #[test]
    fn test_parse_code_exchange_route() {
        assert_eq!(
            Callback::parse(&url("http://localhost:3000/?code=123&scope=x")),
            Callback::Code("123".to_string())
        );
        assert_eq!(
            Callback::parse(&url("http://localhost:3000/login?error=access_denied&code=1")),
            Callback::ProviderError("access_denied".to_string())
        );
        assert_eq!(Callback::parse(&url("http://localhost:3000/login")), Callback::Nothing);
    }

    #[test]
    fn test_parse_server_redirect_route() {
        assert_eq!(
            Callback::parse(&url("http://localhost:3000/auth/callback?token=a.b.c&access_token=xyz")),
            Callback::Tokens {
                identity_token: "a.b.c".to_string(),
                access_token: "xyz".to_string()
            }
        );
        // A code on the server-redirect route does not trigger an exchange
        assert_eq!(
            Callback::parse(&url("http://localhost:3000/auth/callback/?code=123")),
            Callback::MissingTokens
        );
        assert_eq!(
            Callback::parse(&url("http://localhost:3000/auth/callback?token=a.b.c&access_token=")),
            Callback::MissingTokens
        );
    }

    #[tokio::test]
    async fn test_server_redirect_success() {
        let (mut flow, store, nav) = controller().await;
        let token = encode_for_test(&json!({"email": "a@x.com", "name": "A"}));
        let location = url(&format!(
            "http://localhost:3000/auth/callback?token={}&access_token=xyz",
            token
        ));

        let state = flow.handle_redirect(&location).await.clone();
        assert_eq!(state, FlowState::AuthenticatedViaCallback);

        let stored = store.load();
        assert_eq!(stored.access_token.as_deref(), Some("xyz"));
        assert_eq!(stored.identity_token.as_deref(), Some(token.as_str()));
        assert_eq!(nav.last_route(), Some(Route::Dashboard));
        assert_eq!(
            nav.last_location().unwrap().as_str(),
            "http://localhost:3000/auth/callback"
        );
        assert_eq!(flow.session.current().unwrap().email(), "a@x.com");
    }

    #[tokio::test]
    async fn test_server_redirect_error_param() {
        let (mut flow, store, nav) = controller().await;
        let state = flow
            .handle_redirect(&url("http://localhost:3000/auth/callback?error=access_denied"))
            .await
            .clone();

        assert_eq!(state, FlowState::Failed(AuthFailure::ProviderError("access_denied".into())));
        assert!(store.load().is_empty());
        assert!(!flow.session.is_authenticated());
        let visible = nav.last_location().unwrap();
        assert!(visible.query().is_none());
        assert_eq!(nav.last_route(), Some(Route::Login));
    }

    #[tokio::test]
    async fn test_server_redirect_malformed_token_persists_nothing() {
        let (mut flow, store, _nav) = controller().await;
        let state = flow
            .handle_redirect(&url("http://localhost:3000/auth/callback?token=not-a-jwt&access_token=xyz"))
            .await
            .clone();

        assert_eq!(
            state,
            FlowState::Failed(AuthFailure::MalformedToken(MalformedTokenError::SegmentCount(1)))
        );
        assert!(store.load().is_empty());
        assert!(!flow.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_server_redirect_missing_token() {
        let (mut flow, store, _nav) = controller().await;
        let state = flow
            .handle_redirect(&url("http://localhost:3000/auth/callback?access_token=xyz"))
            .await
            .clone();
        assert_eq!(state, FlowState::Failed(AuthFailure::MissingTokens));
        assert!(store.load().is_empty());
    }

    #[tokio::test]
    async fn test_location_without_params_is_ignored() {
        let (mut flow, _store, nav) = controller().await;
        let state = flow.handle_redirect(&url("http://localhost:3000/login")).await.clone();
        assert_eq!(state, FlowState::Idle);
        assert!(nav.events().is_empty());
    }
}
