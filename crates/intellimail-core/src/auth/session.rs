//! Session context: the process-wide authenticated-user state.
//!
//! The in-memory session and the durable token pair are kept in step by
//! `SessionState`: creation writes the tokens before publishing the session,
//! destruction clears the tokens before withdrawing it. `SessionContext` is
//! the public face, with `login`/`logout` as its only mutators.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::{watch, OnceCell};
use tracing::{debug, info, warn};

use super::decoder::{self, Identity, MalformedTokenError};
use super::token_store::TokenStore;
use crate::api::{ApiClient, ApiError};
use crate::models::UserInfo;

/// Credential material issued at login. Never mutated; a new login or a
/// refresh produces a whole new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Bearer token sent to the backend
    pub access_token: String,
    /// Signed identity token; absent for code-exchange logins
    pub identity_token: Option<String>,
}

impl Credential {
    pub fn new(access_token: impl Into<String>, identity_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            identity_token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub credential: Credential,
    pub identity: Identity,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(credential: Credential, identity: Identity) -> Self {
        Self {
            credential,
            identity,
            created_at: Utc::now(),
        }
    }

    pub fn email(&self) -> &str {
        &self.identity.email
    }

    pub fn display_name(&self) -> &str {
        &self.identity.display_name
    }
}

impl From<UserInfo> for Identity {
    fn from(user: UserInfo) -> Self {
        Identity::new(user.email, user.name)
    }
}

/// What consumers observe. `Hydrating` lasts until the persisted tokens
/// have been read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Hydrating,
    Anonymous,
    Authenticated(Session),
}

impl SessionStatus {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionStatus::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Shared core between the API client and the session context.
#[derive(Clone)]
pub(crate) struct SessionState {
    store: Arc<TokenStore>,
    status: Arc<watch::Sender<SessionStatus>>,
    hydrated: Arc<OnceCell<()>>,
    /// Authorization codes already submitted by any flow over this client
    redeemed_codes: Arc<Mutex<HashSet<String>>>,
}

impl SessionState {
    pub(crate) fn new(store: Arc<TokenStore>) -> Self {
        let (status, _) = watch::channel(SessionStatus::Hydrating);
        Self {
            store,
            status: Arc::new(status),
            hydrated: Arc::new(OnceCell::new()),
            redeemed_codes: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Record a code as submitted. False if it already was.
    pub(crate) fn claim_code(&self, code: &str) -> bool {
        match self.redeemed_codes.lock() {
            Ok(mut codes) => codes.insert(code.to_string()),
            Err(_) => false,
        }
    }

    pub(crate) fn store(&self) -> &TokenStore {
        &self.store
    }

    pub(crate) fn access_token(&self) -> Option<String> {
        self.store.access_token()
    }

    pub(crate) fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    pub(crate) async fn wait_ready(&self) {
        let mut rx = self.status.subscribe();
        // The sender lives as long as `self`, so this cannot fail
        let _ = rx
            .wait_for(|status| !matches!(status, SessionStatus::Hydrating))
            .await;
    }

    /// Persist, then publish.
    pub(crate) fn commit(&self, session: Session) {
        self.store.save(
            &session.credential.access_token,
            session.credential.identity_token.as_deref(),
        );
        self.status.send_replace(SessionStatus::Authenticated(session));
    }

    /// Clear storage, then withdraw.
    pub(crate) fn teardown(&self) {
        self.store.clear();
        self.status.send_replace(SessionStatus::Anonymous);
    }

    /// Withdraw for this run only; storage keeps its tokens for the next start.
    fn suspend(&self) {
        self.status.send_replace(SessionStatus::Anonymous);
    }
}

/// How startup restoration ended.
enum Restored {
    Session(Session),
    /// Stored tokens are unusable
    Discard,
    /// The server could not be asked; the tokens may still be good
    Deferred,
}

/// Token presence and decoded (untrusted) claims, without token values.
#[derive(Debug, Clone)]
pub struct SessionDiagnostics {
    pub access_token_present: bool,
    pub identity_token_present: bool,
    pub claims: Option<Result<Identity, MalformedTokenError>>,
    pub storage_degraded: bool,
    pub authenticated: bool,
}

#[derive(Clone)]
pub struct SessionContext {
    state: SessionState,
    api: ApiClient,
}

impl SessionContext {
    /// Build the context and restore any persisted session.
    ///
    /// Restoration runs once per `ApiClient` (clones included), even when
    /// called concurrently; later calls reuse its outcome.
    /// Requests that rely on the stored bearer token wait until it finishes.
    pub async fn hydrate(api: ApiClient) -> Self {
        let context = Self {
            state: api.session_state().clone(),
            api,
        };
        context.state.hydrated.get_or_init(|| context.restore()).await;
        context
    }

    async fn restore(&self) {
        let stored = self.state.store().load();
        debug!(
            access_token = if stored.access_token.is_some() { "present" } else { "missing" },
            identity_token = if stored.identity_token.is_some() { "present" } else { "missing" },
            "Restoring session"
        );

        let restored = match (stored.access_token, stored.identity_token) {
            (Some(access_token), Some(identity_token)) => {
                match decoder::decode(&identity_token) {
                    Ok(identity) if identity.is_expired() => {
                        info!("Stored identity token has expired");
                        Restored::Discard
                    }
                    Ok(identity) => Restored::Session(Session::new(
                        Credential::new(access_token, Some(identity_token)),
                        identity,
                    )),
                    Err(e) => {
                        warn!(error = %e, "Discarding undecodable identity token");
                        Restored::Discard
                    }
                }
            }
            (Some(access_token), None) => {
                // Code-exchange sessions carry no identity token; ask the server.
                match self.api.auth().current_user_with_token(&access_token).await {
                    Ok(user) => Restored::Session(Session::new(
                        Credential::new(access_token, None),
                        Identity::from(user),
                    )),
                    Err(e) if e.is_transient() => {
                        warn!(error = %e, "Backend unreachable, keeping stored token for next start");
                        Restored::Deferred
                    }
                    Err(e) => {
                        warn!(error = %e, "Could not restore session from access token");
                        Restored::Discard
                    }
                }
            }
            (None, Some(_)) => {
                debug!("Identity token without access token, discarding");
                Restored::Discard
            }
            (None, None) => Restored::Discard,
        };

        match restored {
            Restored::Session(session) => {
                info!(email = %session.identity.email, "Session restored");
                self.state.commit(session);
            }
            Restored::Discard => self.state.teardown(),
            Restored::Deferred => self.state.suspend(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn current(&self) -> Option<Session> {
        self.state.status().session().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// Watch for login/logout transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.state.subscribe()
    }

    /// Replace the current session with a new one.
    pub fn login(&self, identity: Identity, credential: Credential) -> Session {
        let session = Session::new(credential, identity);
        self.state.commit(session.clone());
        info!(email = %session.identity.email, "Logged in");
        session
    }

    /// End the session. Backend notification is best-effort; local teardown
    /// always happens. Safe to call repeatedly.
    pub async fn logout(&self) {
        if self.state.access_token().is_some() {
            if let Err(e) = self.api.auth().logout().await {
                warn!(error = %e, "Logout notification failed");
            }
        }
        self.state.teardown();
        info!("Logged out");
    }

    /// Trade a refresh token for a new bearer token, replacing the session.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Session, ApiError> {
        let current = self.current().ok_or(ApiError::Unauthorized)?;
        let refreshed = self.api.auth().refresh(refresh_token).await?;
        let credential = Credential::new(refreshed.access_token, current.credential.identity_token);
        Ok(self.login(current.identity, credential))
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        let stored = self.state.store().load();
        SessionDiagnostics {
            access_token_present: stored.access_token.is_some(),
            identity_token_present: stored.identity_token.is_some(),
            claims: stored.identity_token.as_deref().map(decoder::decode),
            storage_degraded: self.state.store().is_degraded(),
            authenticated: self.is_authenticated(),
        }
    }
}
