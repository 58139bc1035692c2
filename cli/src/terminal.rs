//! Line-oriented views for the chat and contact widgets.
//!
//! View callbacks cannot fail, so write errors on the terminal are dropped.

use std::io::Write;

use widget::{ChatView, ContactView, Messages, StatusKind, Turn};

pub struct TerminalView<W: Write> {
    out: W,
    messages: Messages,
    input_enabled: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, messages: Messages) -> Self {
        Self { out, messages, input_enabled: true }
    }

    /// Whether the REPL should show a prompt and accept a line.
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn prompt(&mut self) {
        let _ = write!(self.out, "> ");
        let _ = self.out.flush();
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn render_turn(&mut self, turn: &Turn) {
        let label = self.messages.role_label(turn.role);
        let _ = writeln!(self.out, "{label} {}", turn.content);
    }

    fn set_typing(&mut self, visible: bool) {
        if visible {
            let _ = writeln!(self.out, "...");
        }
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn show_error(&mut self, message: &str) {
        for line in message.lines() {
            let _ = writeln!(self.out, "! {line}");
        }
    }
}

impl<W: Write> ContactView for TerminalView<W> {
    fn set_submit_enabled(&mut self, _enabled: bool) {}

    fn show_status(&mut self, message: &str, kind: StatusKind) {
        let marker = match kind {
            StatusKind::Pending => "…",
            StatusKind::Success => "✓",
            StatusKind::Error => "!",
        };
        for line in message.lines() {
            let _ = writeln!(self.out, "{marker} {line}");
        }
    }

    fn reset_form(&mut self) {}
}

#[cfg(test)]
#[path = "terminal_test.rs"]
mod tests;
