// Console message log.
// Collects the user-facing messages the session controller emits, newest last.

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

/// Keep at most this many messages.
const MAX_MESSAGES: usize = 200;

/// Console message level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Info,
    Warn,
    Error,
}

/// A user-facing message with its level and time.
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsoleMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(ConsoleLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::with_level(ConsoleLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(ConsoleLevel::Error, message)
    }

    fn with_level(level: ConsoleLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Scrollable message log.
#[derive(Debug, Default)]
pub struct Console {
    messages: Vec<ConsoleMessage>,
    /// List state for message scrolling.
    pub list_state: ListState,
}

impl Console {
    /// Append a message, dropping the oldest past the cap.
    pub fn push(&mut self, message: ConsoleMessage) {
        self.messages.push(message);
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
        self.scroll_to_bottom();
    }

    pub fn messages(&self) -> &[ConsoleMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn scroll_to_bottom(&mut self) {
        if !self.messages.is_empty() {
            self.list_state.select(Some(self.messages.len() - 1));
        }
    }

    /// Select previous message in list.
    pub fn select_prev(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => self.messages.len() - 1,
        };
        self.list_state.select(Some(i));
    }

    /// Select next message in list.
    pub fn select_next(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.messages.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_scrolls_to_newest() {
        let mut console = Console::default();
        console.push(ConsoleMessage::info("Login successful!"));
        console.push(ConsoleMessage::error("No cards available."));

        assert_eq!(console.list_state.selected(), Some(1));
        let latest = console.messages().last().unwrap();
        assert_eq!(latest.level, ConsoleLevel::Error);
        assert_eq!(latest.message, "No cards available.");
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut console = Console::default();
        for i in 0..(MAX_MESSAGES + 5) {
            console.push(ConsoleMessage::info(format!("message {}", i)));
        }

        assert_eq!(console.messages().len(), MAX_MESSAGES);
        assert_eq!(console.messages()[0].message, "message 5");
    }

    #[test]
    fn test_scroll_stays_in_bounds() {
        let mut console = Console::default();
        console.select_prev();
        assert_eq!(console.list_state.selected(), None);

        console.push(ConsoleMessage::info("a"));
        console.push(ConsoleMessage::warn("b"));
        console.select_next();
        assert_eq!(console.list_state.selected(), Some(1));
        console.select_prev();
        console.select_prev();
        assert_eq!(console.list_state.selected(), Some(0));
    }
}
