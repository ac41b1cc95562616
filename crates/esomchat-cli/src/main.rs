use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;

use esomchat_cli::{run_ask, run_repl, Cli, FileHistoryStore, Settings, TerminalView};
use esomchat_client::HttpTransport;
use esomchat_core::ChatSession;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(shell) = cli.generate {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose);

    let settings = Settings::from_cli(&cli)?;
    log::debug!("Using endpoint {} and history file {}", settings.widget.api_url, settings.history_file.display());

    let transport = HttpTransport::from_config(&settings.widget).context("Failed to set up the chat client")?;
    let store = FileHistoryStore::new(&settings.history_file);
    let view = TerminalView::stdout(settings.widget.bot_name.clone());
    let mut session = ChatSession::new(settings.widget, store, view);

    if let Some(question) = cli.ask.as_deref() {
        if !run_ask(&mut session, &transport, question).await {
            eprintln!("{} No reply from {}", "❌".bright_red(), transport.api_url());
            std::process::exit(1);
        }
        return Ok(());
    }

    run_repl(&mut session, &transport).await
}
