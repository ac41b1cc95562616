use async_trait::async_trait;
use std::rc::Rc;

use esomchat_types::{ChatRequest, ExchangeOutcome};

/// One request/response exchange with the chat endpoint.
///
/// Implementations never fail: every transport, status or decoding problem,
/// and every timeout, comes back as [`ExchangeOutcome::Failed`]. The future
/// is not required to be `Send` so the browser fetch API qualifies.
#[async_trait(?Send)]
pub trait ChatTransport {
    async fn exchange(&self, request: &ChatRequest) -> ExchangeOutcome;
}

#[async_trait(?Send)]
impl<T: ChatTransport + ?Sized> ChatTransport for Rc<T> {
    async fn exchange(&self, request: &ChatRequest) -> ExchangeOutcome {
        (**self).exchange(request).await
    }
}
