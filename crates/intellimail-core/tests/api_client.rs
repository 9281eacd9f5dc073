//! Integration tests for the API client's single request path.
//!
//! Covers bearer attachment, the global 401 policy, and how other
//! failures are reported without ending the session.

mod common;

use std::time::Duration;

use common::{can_bind_localhost, identity_token, Harness};
use intellimail_core::api::ApiError;
use intellimail_core::auth::{MemoryStorage, StorageBackend, StoredTokens, TokenStore};
use intellimail_core::models::{EmailListQuery, ReplyLength, ReplyRequest, Tone};
use intellimail_core::navigation::Route;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_attaches_stored_bearer_token() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let h = Harness::logged_in().await;
    let _session = h.session().await;

    Mock::given(method("GET"))
        .and(path("/emails/"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "m1", "subject": "Hello", "sender": "b@x.com", "date": "2025-01-01",
            "snippet": "hi", "thread_id": "t1", "is_read": false
        }])))
        .expect(1)
        .mount(&h.server)
        .await;

    let emails = h.api.emails().list(&EmailListQuery::default()).await.unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].subject, "Hello");
}

#[tokio::test]
async fn test_omits_authorization_without_token() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let h = Harness::start().await;
    let _session = h.session().await;

    Mock::given(method("GET"))
        .and(path("/reply/tones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "available_tones": {"formal": "Formal and respectful"},
            "default_tone": "professional"
        })))
        .mount(&h.server)
        .await;

    let tones = h.api.ai().tones().await.unwrap();
    assert_eq!(tones.default_tone, "professional");

    let requests = h.requests_to("/reply/tones").await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_identity_token_alone_grants_no_access() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    // Decodable identity claims but no bearer token
    let backend = MemoryStorage::new();
    backend
        .write(&StoredTokens {
            access_token: None,
            identity_token: Some(identity_token("a@x.com", "A")),
        })
        .unwrap();
    let h = Harness::start_with(TokenStore::new(Box::new(backend)), None).await;
    let session = h.session().await;
    assert!(!session.is_authenticated());

    Mock::given(method("GET"))
        .and(path("/emails/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;

    let result = h.api.emails().list(&EmailListQuery::default()).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
    let requests = h.requests_to("/emails/").await;
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_unauthorized_from_email_endpoint_ends_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let h = Harness::logged_in().await;
    let session = h.session().await;
    assert!(session.is_authenticated());

    Mock::given(method("GET"))
        .and(path("/emails/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&h.server)
        .await;

    let result = h.api.emails().list(&EmailListQuery::default()).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert!(h.store.load().is_empty());
    assert!(session.current().is_none());
    assert_eq!(h.nav.last_route(), Some(Route::Login));
}

#[tokio::test]
async fn test_unauthorized_from_ai_endpoint_ends_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let h = Harness::logged_in().await;
    let session = h.session().await;

    Mock::given(method("POST"))
        .and(path("/summarize/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;

    let result = h.api.ai().summarize("m1", 150).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert!(h.store.load().is_empty());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_server_error_keeps_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let h = Harness::logged_in().await;
    let session = h.session().await;

    Mock::given(method("GET"))
        .and(path("/emails/m1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Failed to fetch email detail"))
        .mount(&h.server)
        .await;

    let result = h.api.emails().get("m1").await;
    match result {
        Err(ApiError::ServerError(body)) => assert!(body.contains("Failed to fetch")),
        other => panic!("expected server error, got {:?}", other),
    }
    assert!(session.is_authenticated());
    assert_eq!(h.store.access_token().as_deref(), Some("abc"));
    assert_eq!(h.nav.last_route(), None);
}

#[tokio::test]
async fn test_timeout_keeps_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let store = TokenStore::in_memory();
    store.save("abc", Some(&identity_token("a@x.com", "A")));
    let h = Harness::start_with(store, Some(Duration::from_millis(200))).await;
    let session = h.session().await;

    Mock::given(method("GET"))
        .and(path("/emails/thread/t1"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&h.server)
        .await;

    let result = h.api.emails().thread("t1").await;
    assert!(matches!(result, Err(ApiError::Timeout)));
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_list_sends_query_params() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let h = Harness::logged_in().await;
    let _session = h.session().await;

    Mock::given(method("GET"))
        .and(path("/emails/"))
        .and(query_param("query", "is:unread"))
        .and(query_param("max_results", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&h.server)
        .await;

    let query = EmailListQuery {
        max_results: Some(5),
        query: Some("is:unread".to_string()),
    };
    assert!(h.api.emails().list(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ai_request_bodies() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let h = Harness::logged_in().await;
    let _session = h.session().await;

    Mock::given(method("POST"))
        .and(path("/summarize/"))
        .and(body_json(json!({"email_id": "m1", "max_length": 150})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": "Lunch moved to Friday.",
            "key_points": ["Friday", "Noon"],
            "original_length": 80,
            "summary_length": 4,
            "compression_ratio": 0.05
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/reply/generate"))
        .and(body_json(json!({
            "email_id": "m1",
            "tone": "friendly",
            "length": "short",
            "custom_instructions": "Accept the invite"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "generated_reply": "Sounds great, see you Friday!",
            "tone_used": "friendly",
            "confidence_score": 0.9
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let summary = h.api.ai().summarize("m1", 150).await.unwrap();
    assert_eq!(summary.key_points, vec!["Friday", "Noon"]);

    let reply = h
        .api
        .ai()
        .generate_reply(&ReplyRequest {
            email_id: "m1".to_string(),
            tone: Tone::Friendly,
            length: ReplyLength::Short,
            custom_instructions: Some("Accept the invite".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(reply.generated_reply, "Sounds great, see you Friday!");
}

#[tokio::test]
async fn test_mark_read_uses_put() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let h = Harness::logged_in().await;
    let _session = h.session().await;

    Mock::given(method("PUT"))
        .and(path("/emails/m1/mark-read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "message": "Email marked as read"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    assert!(h.api.emails().mark_read("m1").await.unwrap().success);
}
