//! IntelliMail core library.
//!
//! Provides the client-side session and authentication lifecycle for the
//! IntelliMail backend, plus the API client that depends on it:
//!
//! - `auth`: token storage, identity decoding, session context, OAuth flow
//! - `api`: REST client with bearer attachment and global 401 handling
//! - `models`: request/response types for the auth, email and AI endpoints
//! - `navigation`: the host seam for moving the user between views
//! - `config`: application configuration and directory layout

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod navigation;

pub use api::{ApiClient, ApiError};
pub use auth::{
    AuthFailure, AuthFlowController, Credential, FlowState, Identity, MalformedTokenError,
    Session, SessionContext, TokenStore,
};
pub use config::Config;
pub use navigation::{Navigator, Route};
