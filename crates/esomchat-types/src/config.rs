use serde::{Deserialize, Serialize};

use crate::{DEFAULT_API_URL, DEFAULT_MAX_HISTORY_ITEMS, DEFAULT_REQUEST_TIMEOUT_SECS, HISTORY_STORAGE_KEY};

/// Screen corner the widget is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    #[default]
    Right,
}

impl Position {
    /// CSS property name for the anchored side
    pub fn css_side(&self) -> &'static str {
        match self {
            Position::Left => "left",
            Position::Right => "right",
        }
    }
}

/// Options for a chat session, fixed at construction time.
///
/// Every field has a default, so a partial options object (JS literal or
/// TOML file) only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    pub api_url: String,
    pub bot_name: String,
    pub bot_avatar_url: Option<String>,
    pub user_avatar_url: Option<String>,
    pub welcome_message: String,
    pub placeholder_text: String,
    #[serde(alias = "chatbotPosition")]
    pub position: Position,
    pub primary_color: String,
    pub accent_color: String,
    pub font_size: String,
    pub show_sources: bool,
    pub max_history_items: usize,
    pub request_timeout_secs: u64,
    pub storage_key: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bot_name: "ESOM Finance AI".to_string(),
            bot_avatar_url: Some("assets/esom_logo_nobyline.png".to_string()),
            user_avatar_url: None,
            welcome_message: "Hello! I'm the ESOM Economics & Finance Assistant. \
                Ask me about economics, finance, or market data!"
                .to_string(),
            placeholder_text: "Ask something about economics or finance...".to_string(),
            position: Position::Right,
            primary_color: "#000000".to_string(),
            accent_color: "#f0ad4e".to_string(),
            font_size: "14px".to_string(),
            show_sources: true,
            max_history_items: DEFAULT_MAX_HISTORY_ITEMS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            storage_key: HISTORY_STORAGE_KEY.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Parse an options object, filling in defaults for missing fields
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Request timeout in seconds, never below one
    pub fn timeout_secs(&self) -> u64 {
        self.request_timeout_secs.max(1)
    }

    /// Initial shown when no bot avatar is configured
    pub fn bot_initial(&self) -> String {
        self.bot_name.chars().next().map(String::from).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = WidgetConfig::from_json("{}").unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.max_history_items, 20);
        assert_eq!(config.storage_key, "esom_chat_history");
    }

    #[test]
    fn test_partial_options() {
        let config = WidgetConfig::from_json(
            r#"{"apiUrl":"https://esom.example/api/chat","chatbotPosition":"left","showSources":false,"maxHistoryItems":6}"#,
        )
        .unwrap();
        assert_eq!(config.api_url, "https://esom.example/api/chat");
        assert_eq!(config.position, Position::Left);
        assert!(!config.show_sources);
        assert_eq!(config.max_history_items, 6);
        assert_eq!(config.bot_name, "ESOM Finance AI");
    }

    #[test]
    fn test_zero_timeout_clamped() {
        let config = WidgetConfig::from_json(r#"{"requestTimeoutSecs":0}"#).unwrap();
        assert_eq!(config.request_timeout_secs, 0);
        assert_eq!(config.timeout_secs(), 1);
        assert_eq!(WidgetConfig::default().timeout_secs(), 30);
    }

    #[test]
    fn test_bad_position_rejected() {
        assert!(WidgetConfig::from_json(r#"{"position":"top"}"#).is_err());
    }

    #[test]
    fn test_bot_initial() {
        let config = WidgetConfig {
            bot_name: "Ada".to_string(),
            ..Default::default()
        };
        assert_eq!(config.bot_initial(), "A");
        assert_eq!(config.position.css_side(), "right");
    }
}
