//! `/auth/*` endpoints.

use reqwest::Method;

use super::client::{ApiClient, Bearer};
use super::ApiError;
use crate::models::{
    AuthUrlResponse, CodeExchangeRequest, CodeExchangeResponse, CurrentUserResponse,
    LogoutResponse, RefreshRequest, RefreshResponse, UserInfo,
};

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Ask the backend for the OAuth provider's authorization URL
    pub async fn authorization_url(&self) -> Result<AuthUrlResponse, ApiError> {
        let request = self.client.request(Method::GET, &["auth", "google", "url"])?;
        self.client.send(request, Bearer::Stored).await
    }

    /// Redeem a one-time authorization code for a credential
    pub async fn exchange_code(&self, auth_code: &str) -> Result<CodeExchangeResponse, ApiError> {
        let body = CodeExchangeRequest {
            auth_code: auth_code.to_string(),
        };
        let request = self
            .client
            .request(Method::POST, &["auth", "google", "callback"])?
            .json(&body);
        self.client.send(request, Bearer::Stored).await
    }

    pub async fn current_user(&self) -> Result<UserInfo, ApiError> {
        let request = self.client.request(Method::GET, &["auth", "me"])?;
        let response: CurrentUserResponse = self.client.send(request, Bearer::Stored).await?;
        Ok(response.user)
    }

    /// Same as `current_user`, authenticated with a token that has not been
    /// published as the session yet.
    pub async fn current_user_with_token(&self, access_token: &str) -> Result<UserInfo, ApiError> {
        let request = self.client.request(Method::GET, &["auth", "me"])?;
        let response: CurrentUserResponse = self
            .client
            .send(request, Bearer::Explicit(access_token))
            .await?;
        Ok(response.user)
    }

    pub async fn logout(&self) -> Result<LogoutResponse, ApiError> {
        let request = self.client.request(Method::POST, &["auth", "logout"])?;
        self.client.send(request, Bearer::Stored).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let request = self
            .client
            .request(Method::POST, &["auth", "refresh"])?
            .json(&body);
        self.client.send(request, Bearer::Stored).await
    }
}
