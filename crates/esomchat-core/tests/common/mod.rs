#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use esomchat_core::{ChatTransport, ChatView};
use esomchat_types::{
    ChatError, ChatReply, ChatRequest, ExchangeOutcome, Message, ReplyExtras, Role, WidgetConfig,
};

/// Transport that replays queued outcomes and records every request
#[derive(Default)]
pub struct ScriptedTransport {
    outcomes: RefCell<VecDeque<ExchangeOutcome>>,
    requests: RefCell<Vec<ChatRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(responses: &[&str]) -> Self {
        let transport = Self::new();
        for response in responses {
            transport.push_reply(ChatReply::new(*response));
        }
        transport
    }

    pub fn failing() -> Self {
        let transport = Self::new();
        transport.push_failure(ChatError::Transport("connection refused".to_string()));
        transport
    }

    pub fn push_reply(&self, reply: ChatReply) {
        self.outcomes.borrow_mut().push_back(ExchangeOutcome::Reply(reply));
    }

    pub fn push_failure(&self, err: ChatError) {
        self.outcomes.borrow_mut().push_back(ExchangeOutcome::Failed(err));
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[async_trait(?Send)]
impl ChatTransport for ScriptedTransport {
    async fn exchange(&self, request: &ChatRequest) -> ExchangeOutcome {
        self.requests.borrow_mut().push(request.clone());
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| ExchangeOutcome::Failed(ChatError::Transport("no scripted reply".to_string())))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Open(bool),
    Render(Role, String, Option<ReplyExtras>),
    TypingShown,
    TypingHidden,
    Cleared,
}

/// View that records what the session asked it to do
#[derive(Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn rendered(&self) -> Vec<(Role, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Render(role, content, _) => Some((*role, content.clone())),
                _ => None,
            })
            .collect()
    }
}

impl ChatView for RecordingView {
    fn set_open(&mut self, open: bool) {
        self.events.push(ViewEvent::Open(open));
    }

    fn render_message(&mut self, message: &Message, extras: Option<&ReplyExtras>) {
        self.events
            .push(ViewEvent::Render(message.role, message.content.clone(), extras.cloned()));
    }

    fn show_typing(&mut self) {
        self.events.push(ViewEvent::TypingShown);
    }

    fn hide_typing(&mut self) {
        self.events.push(ViewEvent::TypingHidden);
    }

    fn clear(&mut self) {
        self.events.push(ViewEvent::Cleared);
    }
}

pub fn test_config() -> WidgetConfig {
    WidgetConfig {
        welcome_message: "Welcome!".to_string(),
        ..Default::default()
    }
}

/// `count` alternating user/bot messages with distinct contents
pub fn numbered_history(count: usize) -> Vec<Message> {
    (0..count)
        .map(|n| {
            let role = if n % 2 == 0 { Role::User } else { Role::Bot };
            Message::new(role, format!("old {}", n), format!("2024-01-01T00:00:{:02}.000Z", n))
        })
        .collect()
}
