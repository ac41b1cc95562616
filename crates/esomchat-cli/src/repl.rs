use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::Write;

use esomchat_core::{ChatSession, ChatTransport, HistoryStore};

use crate::view::TerminalView;

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Empty,
    Open,
    Close,
    Clear,
    History,
    Help,
    Quit,
    Send(String),
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "" => ReplCommand::Empty,
            "/open" => ReplCommand::Open,
            "/close" => ReplCommand::Close,
            "/clear" => ReplCommand::Clear,
            "/history" => ReplCommand::History,
            "/help" => ReplCommand::Help,
            "/quit" | "/exit" | "exit" | "quit" => ReplCommand::Quit,
            _ if line.starts_with('/') => ReplCommand::Unknown(line.to_string()),
            _ => ReplCommand::Send(line.to_string()),
        }
    }
}

fn print_help() {
    println!("{} Commands:", "💡".bright_yellow());
    println!("  /open     - Open the chat");
    println!("  /close    - Close the chat");
    println!("  /clear    - Forget the conversation");
    println!("  /history  - Show the stored conversation");
    println!("  /quit     - Leave");
}

fn print_history<S: HistoryStore, W: Write>(session: &ChatSession<S, TerminalView<W>>) {
    if session.log().is_empty() {
        println!("{}", "No messages yet.".bright_black());
        return;
    }
    for message in session.log().messages() {
        println!(
            "{} {} {}",
            message.timestamp.bright_black(),
            format!("[{}]", message.role).bright_magenta(),
            message.content
        );
    }
}

/// Interactive loop. Returns when the user quits or closes stdin.
pub async fn run_repl<S, W, T>(session: &mut ChatSession<S, TerminalView<W>>, transport: &T) -> Result<()>
where
    S: HistoryStore,
    W: Write,
    T: ChatTransport + ?Sized,
{
    let mut rl = DefaultEditor::new()?;

    session.open();
    session.view_mut().set_echo_user(false);
    println!("{}", "Type /help for commands.".bright_black());

    loop {
        let readline = rl.readline(&format!("{} ", "You:".bright_green().bold()));
        let line = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Open => session.open(),
            ReplCommand::Close => session.close(),
            ReplCommand::Clear => session.clear_history(),
            ReplCommand::History => print_history(session),
            ReplCommand::Help => print_help(),
            ReplCommand::Quit => break,
            ReplCommand::Unknown(command) => {
                eprintln!("{} Unknown command: {}", "❌".bright_red(), command);
            }
            ReplCommand::Send(text) => {
                let _ = rl.add_history_entry(text.as_str());
                if !session.is_open() {
                    session.open();
                }
                session.send_message(transport, &text).await;
            }
        }
    }

    println!("{}", "Goodbye!".bright_cyan());
    Ok(())
}

/// Ask one question and print the reply. Returns whether a real reply came back.
pub async fn run_ask<S, W, T>(session: &mut ChatSession<S, TerminalView<W>>, transport: &T, text: &str) -> bool
where
    S: HistoryStore,
    W: Write,
    T: ChatTransport + ?Sized,
{
    session.view_mut().set_echo_user(false);
    if !session.send_message(transport, text).await {
        return false;
    }
    // A failed exchange ends in a transient fallback reply
    session.log().entries().last().map_or(false, |entry| entry.durable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("  "), ReplCommand::Empty);
        assert_eq!(ReplCommand::parse("/open"), ReplCommand::Open);
        assert_eq!(ReplCommand::parse(" /close "), ReplCommand::Close);
        assert_eq!(ReplCommand::parse("/clear"), ReplCommand::Clear);
        assert_eq!(ReplCommand::parse("/history"), ReplCommand::History);
        assert_eq!(ReplCommand::parse("quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/nope"), ReplCommand::Unknown("/nope".to_string()));
        assert_eq!(
            ReplCommand::parse(" What is GDP? "),
            ReplCommand::Send("What is GDP?".to_string())
        );
    }
}
