//! # esomchat-core
//!
//! The conversation session manager behind the ESOM chat widget.
//!
//! ## Features
//!
//! - **Bounded log**: the conversation never grows past the configured
//!   maximum; the oldest entries are dropped first
//! - **Single request in flight**: the busy flag is raised before the first
//!   suspension point, so a double submit cannot slip through
//! - **Durable snapshot**: completed exchanges are written to a
//!   [`HistoryStore`] and reloaded on the next start
//! - **Host agnostic**: the network ([`ChatTransport`]), storage
//!   ([`HistoryStore`]) and rendering ([`ChatView`]) are traits, implemented
//!   by the browser widget and the terminal client
//!
//! ## Example
//!
//! ```rust,no_run
//! use esomchat_core::{ChatSession, ChatTransport, MemoryStore, NullView};
//! use esomchat_types::{ChatReply, ChatRequest, ExchangeOutcome, WidgetConfig};
//!
//! struct Echo;
//!
//! #[async_trait::async_trait(?Send)]
//! impl ChatTransport for Echo {
//!     async fn exchange(&self, request: &ChatRequest) -> ExchangeOutcome {
//!         ExchangeOutcome::Reply(ChatReply::new(request.message.clone()))
//!     }
//! }
//!
//! # async fn run() {
//! let mut session = ChatSession::new(WidgetConfig::default(), MemoryStore::new(), NullView);
//! session.open();
//! session.send_message(&Echo, "What is GDP?").await;
//! # }
//! ```

pub mod history;
pub mod session;
pub mod store;
pub mod transport;
pub mod view;

pub use history::{ConversationLog, LogEntry};
pub use session::{generate_user_id, ChatSession, PendingExchange, SessionPhase};
pub use store::{decode_snapshot, encode_snapshot, HistoryStore, MemoryStore};
pub use transport::ChatTransport;
pub use view::{ChatView, NullView};
