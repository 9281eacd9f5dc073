//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `TokenStore`: durable storage for the bearer and identity tokens
//! - `decoder`: display claims from the identity token (never a trust boundary)
//! - `SessionContext`: the authenticated-user state, hydrated once at startup
//! - `AuthFlowController`: the OAuth redirect round trip
//!
//! Sessions are persisted through the token store and restored on startup.

pub mod decoder;
pub mod flow;
pub mod session;
pub mod token_store;

pub use decoder::{decode, Identity, MalformedTokenError};
pub use flow::{AuthFailure, AuthFlowController, FlowState, SERVER_CALLBACK_PATH};
pub use session::{Credential, Session, SessionContext, SessionDiagnostics, SessionStatus};
pub use token_store::{
    FileStorage, KeyringStorage, MemoryStorage, StorageBackend, StorageError, StoredTokens,
    TokenStore,
};
