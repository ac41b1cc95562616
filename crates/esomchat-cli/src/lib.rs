//! Terminal front end for the ESOM chat endpoint

pub mod cli;
pub mod config;
pub mod repl;
pub mod store;
pub mod view;

pub use cli::Cli;
pub use config::{load_config_file, Settings};
pub use repl::{run_ask, run_repl, ReplCommand};
pub use store::{esomchat_dir, FileHistoryStore};
pub use view::TerminalView;
