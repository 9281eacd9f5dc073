use serde::{Deserialize, Serialize};

/// Inbox list entry from `GET /emails/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct EmailSummary {
    pub id: String,
    pub subject: String,
    pub sender: String,
    pub date: String,
    #[serde(default)]
    pub snippet: String,
    pub thread_id: String,
    #[serde(default)]
    pub is_read: bool,
}

/// Full message from `GET /emails/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct EmailDetail {
    pub id: String,
    pub subject: String,
    pub sender: String,
    #[serde(default)]
    pub recipient: String,
    pub date: String,
    #[serde(default)]
    pub body: String,
    pub thread_id: String,
    #[serde(default)]
    pub is_read: bool,
}

/// Response from `GET /emails/thread/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct EmailThread {
    pub thread_id: String,
    pub emails: Vec<EmailDetail>,
    pub message_count: usize,
}

/// Query parameters for `GET /emails/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmailListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    /// Gmail search syntax, e.g. `is:unread from:boss`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Body of `POST /emails/send`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SendEmailResponse {
    pub success: bool,
    pub message_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Generic `{success, message}` acknowledgement (mark-read)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_skips_unset_params() {
        let query = EmailListQuery {
            max_results: None,
            query: Some("is:unread".to_string()),
        };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, serde_json::json!({"query": "is:unread"}));
    }

    #[test]
    fn test_parse_thread() {
        let json = r#"{"thread_id": "t1", "message_count": 1, "emails": [{"id": "m1", "subject": "Hi", "sender": "b@x.com", "recipient": "a@x.com", "date": "2025-01-01", "body": "hello", "thread_id": "t1", "is_read": true}]}"#;
        let thread: EmailThread = serde_json::from_str(json).unwrap();
        assert_eq!(thread.message_count, 1);
        assert_eq!(thread.emails[0].body, "hello");
    }
}
