use colored::Colorize;
use std::io::{self, Write};

use esomchat_core::ChatView;
use esomchat_types::{display_term, Message, ReplyExtras, Role};

/// Prints the conversation to a terminal
pub struct TerminalView<W: Write> {
    out: W,
    bot_name: String,
    echo_user: bool,
}

impl TerminalView<io::Stdout> {
    pub fn stdout(bot_name: impl Into<String>) -> Self {
        Self::new(io::stdout(), bot_name)
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, bot_name: impl Into<String>) -> Self {
        Self {
            out,
            bot_name: bot_name.into(),
            echo_user: true,
        }
    }

    /// Whether user messages are printed. Off once the user types them at
    /// the prompt themselves.
    pub fn set_echo_user(&mut self, echo: bool) {
        self.echo_user = echo;
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn write_message(&mut self, message: &Message, extras: Option<&ReplyExtras>) -> io::Result<()> {
        match message.role {
            Role::User => {
                if self.echo_user {
                    writeln!(self.out, "{} {}", "You:".bright_green().bold(), message.content)?;
                }
            }
            Role::Bot => {
                writeln!(
                    self.out,
                    "{} {}",
                    format!("{}:", self.bot_name).bright_cyan().bold(),
                    message.content
                )?;
                if let Some(extras) = extras {
                    self.write_extras(extras)?;
                }
            }
        }
        self.out.flush()
    }

    fn write_extras(&mut self, extras: &ReplyExtras) -> io::Result<()> {
        for (term, definition) in &extras.glossary_terms {
            writeln!(self.out, "  {} {}", display_term(term).bold(), definition)?;
        }
        for (key, value) in &extras.market_data {
            writeln!(self.out, "  {} {}", format!("{}:", key).yellow(), value)?;
        }
        if let Some(line) = extras.sources_line() {
            writeln!(self.out, "  {}", line.bright_black().italic())?;
        }
        Ok(())
    }

    fn report(result: io::Result<()>) {
        if let Err(e) = result {
            log::error!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn set_open(&mut self, open: bool) {
        let result = if open {
            writeln!(self.out, "{}", format!("── {} ──", self.bot_name).bright_cyan())
        } else {
            writeln!(self.out, "{}", "Chat closed. Type /open to reopen.".bright_black())
        };
        Self::report(result);
    }

    fn render_message(&mut self, message: &Message, extras: Option<&ReplyExtras>) {
        let result = self.write_message(message, extras);
        Self::report(result);
    }

    fn show_typing(&mut self) {
        let result = write!(self.out, "{}", format!("{} is typing...", self.bot_name).bright_black())
            .and_then(|_| self.out.flush());
        Self::report(result);
    }

    fn hide_typing(&mut self) {
        let result = write!(self.out, "\r\x1b[2K").and_then(|_| self.out.flush());
        Self::report(result);
    }

    fn clear(&mut self) {
        let result = writeln!(self.out, "{}", "History cleared.".bright_black());
        Self::report(result);
    }
}
