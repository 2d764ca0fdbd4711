// Secure PIN display handle.
// An opaque renderable returned by a PIN reveal; the PIN itself is never exposed to callers.

use std::fmt;

use ratatui::{prelude::*, widgets::*};
use zeroize::Zeroizing;

/// Renderable PIN view handed out by the SDK.
///
/// There is no accessor for the PIN: the only thing a holder can do is render
/// it. The digits are wiped from memory when the handle is dropped.
pub struct SecureDisplay {
    digits: Zeroizing<String>,
    color: Color,
}

impl SecureDisplay {
    pub(in crate::sdk) fn new(digits: &str, color: Color) -> Self {
        Self {
            digits: Zeroizing::new(digits.to_string()),
            color,
        }
    }
}

impl fmt::Debug for SecureDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureDisplay")
            .field("digits", &"[REDACTED]")
            .finish()
    }
}

impl Widget for &SecureDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spaced: Zeroizing<String> = Zeroizing::new(
            self.digits
                .chars()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join("  "),
        );

        let top = area.y + area.height.saturating_sub(1) / 2;
        let line_area = Rect::new(area.x, top, area.width, area.height.min(1));

        Paragraph::new(Line::from(Span::styled(
            spaced.as_str(),
            Style::default().fg(self.color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(line_area, buf);
    }
}
