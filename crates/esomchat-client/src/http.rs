use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, log_enabled, Level};
use std::time::Duration;

use esomchat_core::ChatTransport;
use esomchat_types::{ChatError, ChatReply, ChatRequest, ExchangeOutcome, WidgetConfig};

/// Chat endpoint client over reqwest
pub struct HttpTransport {
    api_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_url: normalize_api_url(api_url),
            timeout,
            client,
        })
    }

    pub fn from_config(config: &WidgetConfig) -> Result<Self> {
        Self::new(&config.api_url, Duration::from_secs(config.timeout_secs()))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Post one request and decode the reply
    pub async fn post(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        log_request(&self.api_url, request);

        let response = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;
        debug!("Chat endpoint answered {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
                body: safe_truncate(&body, 200),
            });
        }

        ChatReply::from_json(&body)
    }

    fn classify(&self, err: reqwest::Error) -> ChatError {
        if err.is_timeout() {
            ChatError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}

#[async_trait(?Send)]
impl ChatTransport for HttpTransport {
    async fn exchange(&self, request: &ChatRequest) -> ExchangeOutcome {
        self.post(request).await.into()
    }
}

fn log_request(url: &str, request: &ChatRequest) {
    if !log_enabled!(Level::Debug) {
        return;
    }
    debug!(
        "POST {} user_id={} history={} message={:?}",
        url,
        request.user_id,
        request.chat_history.len(),
        safe_truncate(&request.message, 80)
    );
    if log_enabled!(Level::Trace) {
        match serde_json::to_string_pretty(request) {
            Ok(json) => log::trace!("Request body:\n{}", safe_truncate(&json, 5000)),
            Err(e) => log::trace!("Error serializing request: {}", e),
        }
    }
}

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Trim surrounding whitespace and a trailing slash from the endpoint URL
pub fn normalize_api_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_truncate() {
        assert_eq!(safe_truncate("short", 10), "short");
        assert_eq!(safe_truncate("abcdefghij", 6), "abc...");
        assert_eq!(safe_truncate("ééééé", 4), "é...");
        assert_eq!(safe_truncate("abcdef", 2), "...");
    }

    #[test]
    fn test_normalize_api_url() {
        assert_eq!(normalize_api_url(" http://localhost:5001/api/chat/ "), "http://localhost:5001/api/chat");
        assert_eq!(normalize_api_url("http://localhost:5001/api/chat"), "http://localhost:5001/api/chat");
    }

    #[test]
    fn test_from_config() {
        let config = WidgetConfig {
            api_url: "https://esom.example/api/chat/".to_string(),
            request_timeout_secs: 5,
            ..Default::default()
        };
        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(transport.api_url(), "https://esom.example/api/chat");
        assert_eq!(transport.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_timeout_from_config_is_clamped() {
        let config = WidgetConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(transport.timeout, Duration::from_secs(1));
    }
}
