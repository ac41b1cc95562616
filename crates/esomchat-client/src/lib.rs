//! # esomchat-client
//!
//! Native HTTP transport for the ESOM chat endpoint.
//!
//! ## Example
//!
//! ```rust,no_run
//! use esomchat_client::HttpTransport;
//! use esomchat_core::{ChatSession, MemoryStore, NullView};
//! use esomchat_types::WidgetConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = WidgetConfig::default();
//!     let transport = HttpTransport::from_config(&config)?;
//!     let mut session = ChatSession::new(config, MemoryStore::new(), NullView);
//!
//!     session.send_message(&transport, "What is GDP?").await;
//!     println!("{:?}", session.log().last());
//!
//!     Ok(())
//! }
//! ```

pub mod http;

pub use http::{normalize_api_url, safe_truncate, HttpTransport};
