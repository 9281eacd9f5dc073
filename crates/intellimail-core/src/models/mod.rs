//! Request and response types for the IntelliMail backend.
//!
//! - `auth`: OAuth URL, code exchange, current user, token refresh
//! - `email`: inbox listing, message detail, threads, sending
//! - `ai`: summaries, reply generation/refinement, tone analysis

pub mod ai;
pub mod auth;
pub mod email;

pub use ai::{
    AvailableTones, RefineReplyRequest, RefinedReply, ReplyLength, ReplyRequest, ReplyResponse,
    SummarizeRequest, Summary, ThreadSummaryRequest, Tone, ToneAnalysis, ToneAnalysisRequest,
};
pub use auth::{
    AuthUrlResponse, CodeExchangeRequest, CodeExchangeResponse, CurrentUserResponse,
    LogoutResponse, RefreshRequest, RefreshResponse, UserInfo,
};
pub use email::{
    ActionResponse, EmailDetail, EmailListQuery, EmailSummary, EmailThread, SendEmailRequest,
    SendEmailResponse,
};
