//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use intellimail_core::api::ApiClient;
use intellimail_core::auth::{SessionContext, TokenStore};
use intellimail_core::navigation::RecordingNavigator;
use url::Url;
use wiremock::MockServer;

pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Unsigned identity token with the given display claims.
pub fn identity_token(email: &str, name: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = serde_json::json!({ "email": email, "name": name });
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.c2lnbmF0dXJl", header, body)
}

pub struct Harness {
    pub server: MockServer,
    pub store: Arc<TokenStore>,
    pub nav: Arc<RecordingNavigator>,
    pub api: ApiClient,
}

impl Harness {
    pub async fn start() -> Self {
        Self::start_with(TokenStore::in_memory(), None).await
    }

    pub async fn start_with(store: TokenStore, timeout: Option<Duration>) -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(store);
        let nav = Arc::new(RecordingNavigator::new());
        let base = Url::parse(&server.uri()).unwrap();
        let api = match timeout {
            Some(timeout) => ApiClient::with_timeout(base, store.clone(), nav.clone(), timeout),
            None => ApiClient::new(base, store.clone(), nav.clone()),
        }
        .unwrap();
        Self {
            server,
            store,
            nav,
            api,
        }
    }

    /// Harness whose store already holds a valid session for `a@x.com`.
    pub async fn logged_in() -> Self {
        let store = TokenStore::in_memory();
        store.save("abc", Some(&identity_token("a@x.com", "A")));
        Self::start_with(store, None).await
    }

    pub async fn session(&self) -> SessionContext {
        SessionContext::hydrate(self.api.clone()).await
    }

    /// Requests the mock server has seen for a path.
    pub async fn requests_to(&self, path: &str) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|req| req.url.path() == path)
            .collect()
    }
}
