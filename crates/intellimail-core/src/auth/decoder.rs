//! Identity token decoding.
//!
//! Reads the display claims out of the signed identity token the backend
//! issues. The signature is NOT verified (no key exists client-side), so the
//! resulting `Identity` is for display only. Authorization always rests on
//! the bearer token, checked by the server.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// base64url that tolerates both padded and unpadded segments
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedTokenError {
    #[error("Identity token has {0} segments, expected 3")]
    SegmentCount(usize),

    #[error("Identity token payload is not valid base64url")]
    Base64,

    #[error("Identity token payload is not valid JSON: {0}")]
    Json(String),

    #[error("Identity token payload is missing the '{0}' claim")]
    MissingClaim(&'static str),
}

/// Display identity derived from the identity token's payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Identity {
    pub email: String,
    pub display_name: String,
    /// `exp` claim, when the token carries one
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: display_name.into(),
            expires_at: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| Utc::now() > exp).unwrap_or(false)
    }
}

#[derive(Deserialize)]
struct Claims {
    email: Option<String>,
    name: Option<String>,
    exp: Option<i64>,
}

/// Decode the display claims of an identity token.
pub fn decode(identity_token: &str) -> Result<Identity, MalformedTokenError> {
    let segments: Vec<&str> = identity_token.split('.').collect();
    if segments.len() != 3 {
        return Err(MalformedTokenError::SegmentCount(segments.len()));
    }

    let payload = BASE64URL
        .decode(segments[1])
        .map_err(|_| MalformedTokenError::Base64)?;
    let claims: Claims =
        serde_json::from_slice(&payload).map_err(|e| MalformedTokenError::Json(e.to_string()))?;

    let email = claims.email.ok_or(MalformedTokenError::MissingClaim("email"))?;
    let display_name = claims.name.ok_or(MalformedTokenError::MissingClaim("name"))?;

    Ok(Identity {
        email,
        display_name,
        expires_at: claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0)),
    })
}

#[cfg(test)]
pub(crate) fn encode_for_test(payload: &serde_json::Value) -> String {
    let header = BASE64URL.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = BASE64URL.encode(payload.to_string());
    format!("{}.{}.c2lnbmF0dXJl", header, body)
}
