use log::{debug, error, info, warn};

use esomchat_types::{
    ChatRequest, ExchangeOutcome, Message, ReplyExtras, WidgetConfig, FALLBACK_REPLY,
};

use crate::history::ConversationLog;
use crate::store::{decode_snapshot, encode_snapshot, HistoryStore};
use crate::transport::ChatTransport;
use crate::view::ChatView;

/// Visible state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Closed,
    OpenIdle,
    OpenBusy,
}

/// Generate an identifier of the form `user_<unix-millis>_<random>`
pub fn generate_user_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let random = uuid::Uuid::new_v4().as_u128() % 1_000_000;
    format!("user_{}_{}", millis, random)
}

/// An accepted message whose request has not completed yet.
///
/// Returned by [`ChatSession::begin_send`]; hand it back to
/// [`ChatSession::finish_send`] together with the transport outcome.
#[derive(Debug)]
#[must_use = "an accepted exchange leaves the session busy until it is finished"]
pub struct PendingExchange {
    request: ChatRequest,
    user_seq: u64,
}

impl PendingExchange {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

/// One page load's worth of chat state: visibility, the busy flag, the
/// bounded conversation log and its durable snapshot.
pub struct ChatSession<S: HistoryStore, V: ChatView> {
    config: WidgetConfig,
    user_id: String,
    open: bool,
    busy: bool,
    replayed: bool,
    log: ConversationLog,
    store: S,
    view: V,
}

impl<S: HistoryStore, V: ChatView> ChatSession<S, V> {
    /// Create a session and pre-populate its log from the store
    pub fn new(config: WidgetConfig, store: S, view: V) -> Self {
        let log = ConversationLog::new(config.max_history_items);
        let mut session = Self {
            config,
            user_id: generate_user_id(),
            open: false,
            busy: false,
            replayed: false,
            log,
            store,
            view,
        };
        session.load_history();
        info!("Chat session {} started with {} stored messages", session.user_id, session.log.len());
        session
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn phase(&self) -> SessionPhase {
        match (self.open, self.busy) {
            (false, _) => SessionPhase::Closed,
            (true, false) => SessionPhase::OpenIdle,
            (true, true) => SessionPhase::OpenBusy,
        }
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Show the widget. The first open replays the stored log; an empty log
    /// is seeded with the welcome message, which is never persisted.
    pub fn open(&mut self) {
        if self.open {
            return;
        }
        self.open = true;
        self.view.set_open(true);

        if !self.replayed {
            self.replayed = true;
            for message in self.log.messages() {
                self.view.render_message(message, None);
            }
        }

        if self.log.is_empty() {
            let welcome = Message::bot(self.config.welcome_message.clone());
            self.append(welcome, false, None);
        }
    }

    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.view.set_open(false);
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Accept a message and build its request.
    ///
    /// Returns `None`, changing nothing, when the text is blank or a request
    /// is already in flight. Otherwise the user message is appended and the
    /// busy flag is raised before this returns.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingExchange> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if self.busy {
            debug!("Ignoring message while a request is in flight");
            return None;
        }

        let chat_history = self.log.snapshot();
        let user_seq = self.append(Message::user(text), false, None);
        self.busy = true;
        self.view.show_typing();

        debug!("Sending message with {} history entries", chat_history.len());
        Some(PendingExchange {
            request: ChatRequest {
                message: text.to_string(),
                user_id: self.user_id.clone(),
                chat_history,
            },
            user_seq,
        })
    }

    /// Complete an accepted exchange with its outcome. Always clears the busy flag.
    pub fn finish_send(&mut self, pending: PendingExchange, outcome: ExchangeOutcome) {
        self.view.hide_typing();

        match outcome {
            ExchangeOutcome::Reply(reply) => {
                let timestamp = reply
                    .timestamp
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(esomchat_types::now_timestamp);
                let mut extras = reply.extras;
                if !self.config.show_sources {
                    extras.sources.clear();
                }

                self.log.mark_durable(pending.user_seq);
                let message = Message::new(esomchat_types::Role::Bot, reply.response, timestamp);
                self.append(message, true, Some(&extras));
                self.busy = false;
                self.persist_history();
            }
            ExchangeOutcome::Failed(err) => {
                error!("Chat request failed: {}", err);
                self.append(Message::bot(FALLBACK_REPLY), false, None);
                self.busy = false;
            }
        }
    }

    /// Send a message and wait for the reply. Returns whether the message was
    /// accepted; failures are reported in the conversation, never to the caller.
    pub async fn send_message<T: ChatTransport + ?Sized>(&mut self, transport: &T, text: &str) -> bool {
        let Some(pending) = self.begin_send(text) else {
            return false;
        };
        let outcome = transport.exchange(pending.request()).await;
        self.finish_send(pending, outcome);
        true
    }

    /// Replace the log with the stored snapshot. A missing or unreadable
    /// snapshot leaves the log empty.
    pub fn load_history(&mut self) {
        let max_items = self.config.max_history_items;
        match self.store.load() {
            Ok(Some(snapshot)) => match decode_snapshot(&snapshot) {
                Ok(messages) => self.log = ConversationLog::from_snapshot(messages, max_items),
                Err(e) => {
                    warn!("Could not load chat history: {:#}", e);
                    self.log = ConversationLog::new(max_items);
                }
            },
            Ok(None) => self.log = ConversationLog::new(max_items),
            Err(e) => {
                warn!("Could not load chat history: {:#}", e);
                self.log = ConversationLog::new(max_items);
            }
        }
    }

    /// Write the durable part of the log to the store. Failures are logged only.
    pub fn persist_history(&self) {
        let result = encode_snapshot(&self.log.snapshot()).and_then(|json| self.store.save(&json));
        if let Err(e) = result {
            warn!("Could not save chat history: {:#}", e);
        }
    }

    /// Forget the conversation, on screen and in storage
    pub fn clear_history(&mut self) {
        self.log.clear();
        self.view.clear();
        self.persist_history();
    }

    fn append(&mut self, message: Message, durable: bool, extras: Option<&ReplyExtras>) -> u64 {
        self.view.render_message(&message, extras);
        self.log.push(message, durable)
    }
}
