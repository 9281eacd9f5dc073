//! `/emails/*` endpoints.

use reqwest::Method;

use super::client::{ApiClient, Bearer};
use super::ApiError;
use crate::models::{
    ActionResponse, EmailDetail, EmailListQuery, EmailSummary, EmailThread, SendEmailRequest,
    SendEmailResponse,
};

pub struct EmailApi<'a> {
    client: &'a ApiClient,
}

impl<'a> EmailApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &EmailListQuery) -> Result<Vec<EmailSummary>, ApiError> {
        let request = self
            .client
            .request(Method::GET, &["emails", ""])?
            .query(query);
        self.client.send(request, Bearer::Stored).await
    }

    pub async fn get(&self, email_id: &str) -> Result<EmailDetail, ApiError> {
        let request = self.client.request(Method::GET, &["emails", email_id])?;
        self.client.send(request, Bearer::Stored).await
    }

    pub async fn thread(&self, thread_id: &str) -> Result<EmailThread, ApiError> {
        let request = self
            .client
            .request(Method::GET, &["emails", "thread", thread_id])?;
        self.client.send(request, Bearer::Stored).await
    }

    pub async fn send(&self, email: &SendEmailRequest) -> Result<SendEmailResponse, ApiError> {
        let request = self
            .client
            .request(Method::POST, &["emails", "send"])?
            .json(email);
        self.client.send(request, Bearer::Stored).await
    }

    pub async fn mark_read(&self, email_id: &str) -> Result<ActionResponse, ApiError> {
        let request = self
            .client
            .request(Method::PUT, &["emails", email_id, "mark-read"])?;
        self.client.send(request, Bearer::Stored).await
    }
}
