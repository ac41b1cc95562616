use async_trait::async_trait;
use futures::future::{select, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;

use esomchat_core::ChatTransport;
use esomchat_types::{ChatError, ChatReply, ChatRequest, ExchangeOutcome, WidgetConfig};

/// Chat endpoint client over the browser fetch API
pub struct FetchTransport {
    api_url: String,
    timeout_ms: u32,
}

impl FetchTransport {
    pub fn new(api_url: impl Into<String>, timeout_ms: u32) -> Self {
        Self {
            api_url: api_url.into(),
            timeout_ms,
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        let timeout_ms = config.timeout_secs().saturating_mul(1000);
        Self::new(config.api_url.trim(), u32::try_from(timeout_ms).unwrap_or(u32::MAX))
    }

    async fn post(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        log::debug!(
            "POST {} user_id={} history={}",
            self.api_url,
            request.user_id,
            request.chat_history.len()
        );

        let response = Request::post(&self.api_url)
            .json(request)
            .map_err(|e| ChatError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        if !response.ok() {
            return Err(ChatError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        ChatReply::from_json(&body)
    }
}

#[async_trait(?Send)]
impl ChatTransport for FetchTransport {
    async fn exchange(&self, request: &ChatRequest) -> ExchangeOutcome {
        let fetch = Box::pin(self.post(request));
        let timer = Box::pin(TimeoutFuture::new(self.timeout_ms));

        match select(fetch, timer).await {
            Either::Left((result, _)) => result.into(),
            Either::Right(_) => ExchangeOutcome::Failed(ChatError::Timeout(u64::from(self.timeout_ms))),
        }
    }
}
