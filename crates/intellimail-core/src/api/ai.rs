//! `/summarize/*` and `/reply/*` endpoints.

use reqwest::Method;

use super::client::{ApiClient, Bearer};
use super::ApiError;
use crate::models::{
    AvailableTones, RefineReplyRequest, RefinedReply, ReplyRequest, ReplyResponse,
    SummarizeRequest, Summary, ThreadSummaryRequest, ToneAnalysis, ToneAnalysisRequest,
};

pub struct AiApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AiApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn summarize(&self, email_id: &str, max_length: u32) -> Result<Summary, ApiError> {
        let body = SummarizeRequest {
            email_id: email_id.to_string(),
            max_length,
        };
        let request = self
            .client
            .request(Method::POST, &["summarize", ""])?
            .json(&body);
        self.client.send(request, Bearer::Stored).await
    }

    pub async fn summarize_thread(&self, thread_id: &str, max_length: u32) -> Result<Summary, ApiError> {
        let request = self
            .client
            .request(Method::POST, &["summarize", "thread", thread_id])?
            .json(&ThreadSummaryRequest { max_length });
        self.client.send(request, Bearer::Stored).await
    }

    pub async fn generate_reply(&self, reply: &ReplyRequest) -> Result<ReplyResponse, ApiError> {
        let request = self
            .client
            .request(Method::POST, &["reply", "generate"])?
            .json(reply);
        self.client.send(request, Bearer::Stored).await
    }

    pub async fn refine_reply(&self, refine: &RefineReplyRequest) -> Result<RefinedReply, ApiError> {
        let request = self
            .client
            .request(Method::POST, &["reply", "refine"])?
            .json(refine);
        self.client.send(request, Bearer::Stored).await
    }

    pub async fn analyze_tone(&self, text: &str) -> Result<ToneAnalysis, ApiError> {
        let body = ToneAnalysisRequest {
            text: text.to_string(),
        };
        let request = self
            .client
            .request(Method::POST, &["reply", "analyze-tone"])?
            .json(&body);
        self.client.send(request, Bearer::Stored).await
    }

    pub async fn tones(&self) -> Result<AvailableTones, ApiError> {
        let request = self.client.request(Method::GET, &["reply", "tones"])?;
        self.client.send(request, Bearer::Stored).await
    }
}
