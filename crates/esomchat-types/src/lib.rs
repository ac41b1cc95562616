//! Core types and structures for esomchat
//!
//! This crate provides the wire format spoken with the chat endpoint, the
//! message model kept in the conversation log, and the widget configuration
//! shared by every front end.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub mod config;

pub use config::{Position, WidgetConfig};

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of messages kept in the conversation log
pub const DEFAULT_MAX_HISTORY_ITEMS: usize = 20;

/// Storage key of the persisted conversation snapshot
pub const HISTORY_STORAGE_KEY: &str = "esom_chat_history";

/// Endpoint used when no API URL is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5001/api/chat";

/// Seconds before an outstanding request resolves to the failure path
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Bot reply shown whenever an exchange fails
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I couldn't process your request at this time. Please try again later.";

// ============================================================================
// Message Types
// ============================================================================

/// Author of a message in the conversation log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "assistant")]
    Bot,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(deserialize_with = "deserialize_null_default", default)]
    pub content: String,
    #[serde(deserialize_with = "deserialize_null_default", default)]
    pub timestamp: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, now_timestamp())
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Role::Bot, content, now_timestamp())
    }

    pub fn new(role: Role, content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Current time in the `YYYY-MM-DDTHH:MM:SS.mmmZ` form browsers produce
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ============================================================================
// Endpoint Types
// ============================================================================

/// Body posted to the chat endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub user_id: String,
    pub chat_history: Vec<Message>,
}

/// Citation attached to a reply
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub source_type: Option<String>,
}

impl Source {
    /// Title, falling back to the source type
    pub fn label(&self) -> Option<&str> {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.source_type.as_deref())
    }
}

/// Structured side-channel data of a reply. Rendered next to the reply text,
/// never stored in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ReplyExtras {
    #[serde(deserialize_with = "deserialize_null_default", default)]
    pub sources: Vec<Source>,
    #[serde(deserialize_with = "deserialize_ordered_pairs", default)]
    pub glossary_terms: Vec<(String, String)>,
    #[serde(deserialize_with = "deserialize_ordered_pairs", default)]
    pub market_data: Vec<(String, String)>,
}

impl ReplyExtras {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.glossary_terms.is_empty() && self.market_data.is_empty()
    }

    /// Labels of all sources that have a title or a type
    pub fn source_labels(&self) -> Vec<&str> {
        self.sources.iter().filter_map(Source::label).collect()
    }

    /// "Sources: a, b" line, if there is anything to cite
    pub fn sources_line(&self) -> Option<String> {
        let labels = self.source_labels();
        if labels.is_empty() {
            None
        } else {
            Some(format!("Sources: {}", labels.join(", ")))
        }
    }
}

/// Successful reply of the chat endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(flatten)]
    pub extras: ReplyExtras,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ChatReply {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            extras: ReplyExtras::default(),
            timestamp: None,
        }
    }

    /// Parse a response body
    pub fn from_json(body: &str) -> Result<Self, ChatError> {
        serde_json::from_str(body).map_err(|e| ChatError::Malformed(e.to_string()))
    }

    pub fn into_outcome(self) -> ExchangeOutcome {
        ExchangeOutcome::Reply(self)
    }
}

// ============================================================================
// Exchange Outcome
// ============================================================================

/// Reasons an exchange with the chat endpoint can fail
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response body: {0}")]
    Malformed(String),

    /// Milliseconds waited before giving up
    #[error("no response within {0}ms")]
    Timeout(u64),
}

/// Result of one request/response exchange
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeOutcome {
    Reply(ChatReply),
    Failed(ChatError),
}

impl ExchangeOutcome {
    pub fn is_reply(&self) -> bool {
        matches!(self, ExchangeOutcome::Reply(_))
    }
}

impl From<Result<ChatReply, ChatError>> for ExchangeOutcome {
    fn from(result: Result<ChatReply, ChatError>) -> Self {
        match result {
            Ok(reply) => ExchangeOutcome::Reply(reply),
            Err(err) => ExchangeOutcome::Failed(err),
        }
    }
}

// ============================================================================
// Display Helpers
// ============================================================================

/// Glossary heading: first letter upper-cased, followed by a colon
pub fn display_term(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => format!("{}{}:", first.to_uppercase(), chars.as_str()),
        None => ":".to_string(),
    }
}

// ============================================================================
// Serde Helpers
// ============================================================================

/// Treat an explicit `null` like a missing field
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read a JSON object into key/value pairs, keeping the order the endpoint
/// sent them in. Non-string values are kept in their JSON form; nulls are skipped.
pub fn deserialize_ordered_pairs<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of string values or null")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_some<D2: Deserializer<'de>>(self, deserializer: D2) -> Result<Self::Value, D2::Error> {
            deserializer.deserialize_any(PairsVisitor)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => continue,
                    other => other.to_string(),
                };
                pairs.push((key, value));
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_any(PairsVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_wire_format() {
        let msg = Message::new(Role::Bot, "GDP is...", "2024-01-01T00:00:00.000Z");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "role": "bot",
                "content": "GDP is...",
                "timestamp": "2024-01-01T00:00:00.000Z"
            })
        );
    }

    #[test]
    fn test_role_accepts_assistant_alias() {
        let msg: Message =
            serde_json::from_str(r#"{"role":"assistant","content":"hi","timestamp":"t"}"#).unwrap();
        assert_eq!(msg.role, Role::Bot);
    }

    #[test]
    fn test_message_null_content_is_empty() {
        let msg: Message = serde_json::from_str(r#"{"role":"user","content":null}"#).unwrap();
        assert_eq!(msg.content, "");
        assert_eq!(msg.timestamp, "");
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2024-01-01T00:00:00.000Z".len());
    }

    #[test]
    fn test_reply_minimal() {
        let reply = ChatReply::from_json(r#"{"response":"GDP is..."}"#).unwrap();
        assert_eq!(reply, ChatReply::new("GDP is..."));
        assert!(reply.extras.is_empty());
    }

    #[test]
    fn test_reply_with_extras_keeps_order() {
        let body = r#"{
            "response": "Rates are up.",
            "sources": [{"title": "Fed minutes"}, {"type": "market_data"}, {}],
            "glossary_terms": {"yield": "Return on a bond", "coupon": "Periodic interest"},
            "market_data": {"S&P 500": "5,000", "10Y": 4.2, "VIX": null},
            "timestamp": "2024-03-01T12:00:00Z"
        }"#;
        let reply = ChatReply::from_json(body).unwrap();

        assert_eq!(reply.extras.source_labels(), vec!["Fed minutes", "market_data"]);
        assert_eq!(
            reply.extras.glossary_terms,
            vec![
                ("yield".to_string(), "Return on a bond".to_string()),
                ("coupon".to_string(), "Periodic interest".to_string()),
            ]
        );
        assert_eq!(
            reply.extras.market_data,
            vec![
                ("S&P 500".to_string(), "5,000".to_string()),
                ("10Y".to_string(), "4.2".to_string()),
            ]
        );
        assert_eq!(reply.timestamp.as_deref(), Some("2024-03-01T12:00:00Z"));
    }

    #[test]
    fn test_reply_null_extras() {
        let reply = ChatReply::from_json(
            r#"{"response":"ok","sources":null,"glossary_terms":null,"market_data":null}"#,
        )
        .unwrap();
        assert!(reply.extras.is_empty());
    }

    #[test]
    fn test_reply_missing_response_is_malformed() {
        let err = ChatReply::from_json(r#"{"answer":"nope"}"#).unwrap_err();
        assert!(matches!(err, ChatError::Malformed(_)));

        let err = ChatReply::from_json("<html>502</html>").unwrap_err();
        assert!(matches!(err, ChatError::Malformed(_)));
    }

    #[test]
    fn test_sources_line() {
        let extras = ReplyExtras {
            sources: vec![
                Source { title: Some("IMF".into()), source_type: None },
                Source { title: Some(String::new()), source_type: Some("glossary".into()) },
            ],
            ..Default::default()
        };
        assert_eq!(extras.sources_line().as_deref(), Some("Sources: IMF, glossary"));
        assert_eq!(ReplyExtras::default().sources_line(), None);
    }

    #[test]
    fn test_display_term() {
        assert_eq!(display_term("inflation"), "Inflation:");
        assert_eq!(display_term("élan"), "Élan:");
        assert_eq!(display_term(""), ":");
    }

    #[test]
    fn test_outcome_from_result() {
        let ok: ExchangeOutcome = Ok::<_, ChatError>(ChatReply::new("x")).into();
        assert!(ok.is_reply());
        let failed: ExchangeOutcome = Err::<ChatReply, _>(ChatError::Timeout(30_000)).into();
        assert_eq!(failed, ExchangeOutcome::Failed(ChatError::Timeout(30_000)));
    }
}
