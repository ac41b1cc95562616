use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

/// CLI arguments for esomchat
#[derive(Parser, Debug)]
#[command(name = "esomchat")]
#[command(about = "Terminal client for the ESOM economics & finance assistant")]
#[command(version)]
pub struct Cli {
    /// Chat endpoint (e.g., http://localhost:5001/api/chat)
    #[arg(long, value_name = "URL", env = "ESOMCHAT_API_URL")]
    pub api_url: Option<String>,

    /// TOML file with widget options (same keys as the browser options object)
    #[arg(long, value_name = "PATH", env = "ESOMCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Where the conversation snapshot is kept
    /// (default: ~/.esomchat/esom_chat_history.json)
    #[arg(long, value_name = "PATH")]
    pub history_file: Option<PathBuf>,

    /// Maximum number of messages kept in the history
    #[arg(long, value_name = "N")]
    pub max_history: Option<usize>,

    /// Seconds to wait for a reply before giving up
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Display name of the assistant
    #[arg(long, value_name = "NAME")]
    pub bot_name: Option<String>,

    /// Do not print the sources attached to replies
    #[arg(long)]
    pub no_sources: bool,

    /// Ask a single question, print the reply and exit
    #[arg(long, value_name = "TEXT")]
    pub ask: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub generate: Option<Shell>,
}
