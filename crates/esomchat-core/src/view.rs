use esomchat_types::{Message, ReplyExtras};

/// Rendering side of a chat session.
///
/// The session calls `render_message` exactly once per message appended to
/// the log, in chronological order. Views are expected to keep the newest
/// message scrolled into view.
pub trait ChatView {
    fn set_open(&mut self, open: bool);

    fn render_message(&mut self, message: &Message, extras: Option<&ReplyExtras>);

    fn show_typing(&mut self);

    fn hide_typing(&mut self);

    /// Remove every rendered message
    fn clear(&mut self) {}
}

/// View that renders nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl ChatView for NullView {
    fn set_open(&mut self, _open: bool) {}

    fn render_message(&mut self, _message: &Message, _extras: Option<&ReplyExtras>) {}

    fn show_typing(&mut self) {}

    fn hide_typing(&mut self) {}
}
