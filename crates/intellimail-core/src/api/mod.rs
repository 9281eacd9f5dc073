//! REST API client module for the IntelliMail backend.
//!
//! This module provides the `ApiClient`, the single path every backend
//! request goes through, and its endpoint groups:
//!
//! - `AuthApi`: OAuth URL, code exchange, current user, logout, refresh
//! - `EmailApi`: inbox, messages, threads, sending, read state
//! - `AiApi`: summaries, reply generation/refinement, tone analysis
//!
//! Requests carry the stored bearer token. A 401 from any endpoint ends
//! the whole session.

pub mod ai;
pub mod auth;
pub mod client;
pub mod emails;
pub mod error;

pub use ai::AiApi;
pub use auth::AuthApi;
pub use client::{ApiClient, REQUEST_TIMEOUT};
pub use emails::EmailApi;
pub use error::ApiError;
