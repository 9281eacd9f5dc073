//! Application state for one CLI invocation.
//!
//! `App::new` wires the token store, API client, session context and login
//! flow together and restores any stored session before a command runs.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use intellimail_core::auth::{
    AuthFlowController, FileStorage, KeyringStorage, MemoryStorage, Session, SessionContext,
    StorageBackend, TokenStore,
};
use intellimail_core::config::{StorageKind, APP_NAME};
use intellimail_core::navigation::{Navigator, Route};
use intellimail_core::{ApiClient, Config};
use tracing::{debug, warn};
use url::Url;

/// Maps view changes onto terminal output.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        debug!(route = %route, "Navigate");
        if route == Route::Login {
            eprintln!("You are signed out. Run `intellimail login` to sign in.");
        }
    }

    fn open_external(&self, url: &Url) {
        println!("Open this address in your browser to sign in with Google:\n");
        println!("  {}\n", url);
    }

    fn replace_location(&self, url: &Url) {
        debug!(location = %url, "Callback parameters consumed");
    }
}

pub struct App {
    config: Config,
    session: SessionContext,
    flow: AuthFlowController,
}

impl App {
    pub async fn new(api_url: Option<&str>) -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        debug!(storage = ?config.storage, "Config loaded");

        let base_url = match api_url {
            Some(raw) => Url::parse(raw).with_context(|| format!("Invalid API base URL: {}", raw))?,
            None => config.api_base_url()?,
        };
        debug!(%base_url, "Backend configured");

        let store = Arc::new(TokenStore::new(Self::storage_backend(&config)));
        let navigator: Arc<dyn Navigator> = Arc::new(TerminalNavigator);
        let api = ApiClient::new(base_url, store, navigator.clone())?;
        let session = SessionContext::hydrate(api).await;
        debug!(authenticated = session.is_authenticated(), "Session hydrated");

        let flow = AuthFlowController::new(session.clone(), navigator);

        Ok(Self {
            config,
            session,
            flow,
        })
    }

    fn storage_backend(config: &Config) -> Box<dyn StorageBackend> {
        match config.storage {
            StorageKind::File => {
                let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
                Box::new(FileStorage::new(cache_dir))
            }
            StorageKind::Keyring => Box::new(KeyringStorage::new(APP_NAME)),
            StorageKind::Memory => Box::new(MemoryStorage::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        self.session.api()
    }

    pub fn flow_mut(&mut self) -> &mut AuthFlowController {
        &mut self.flow
    }

    /// The current session, or an error telling the user to sign in.
    pub fn require_session(&self) -> Result<Session> {
        self.session
            .current()
            .ok_or_else(|| anyhow::anyhow!("Not signed in. Run `intellimail login` first."))
    }

    /// Remember who signed in last. Failure only costs the login hint.
    pub fn remember_email(&mut self, email: &str) {
        self.config.last_email = Some(email.to_string());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }
}
