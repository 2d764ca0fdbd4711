// Token input fields.
// Single-line text buffers for the session and PIN tokens, wiped after submission.

use std::fmt;

use zeroize::{Zeroize, Zeroizing};

/// A single-line input that can be masked on screen.
#[derive(Default)]
pub struct TextInput {
    value: String,
    masked: bool,
}

impl TextInput {
    pub fn masked() -> Self {
        Self {
            value: String::new(),
            masked: true,
        }
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn toggle_mask(&mut self) {
        self.masked = !self.masked;
    }

    /// Text to draw: bullets when masked.
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Take the value out for submission, leaving the field empty.
    pub fn take(&mut self) -> Zeroizing<String> {
        Zeroizing::new(std::mem::take(&mut self.value))
    }

    pub fn clear(&mut self) {
        self.value.zeroize();
    }
}

impl fmt::Debug for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInput")
            .field("value", &"[REDACTED]")
            .field("len", &self.value.chars().count())
            .field("masked", &self.masked)
            .finish()
    }
}

impl Drop for TextInput {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}
