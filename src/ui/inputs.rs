// Token input rendering.
// Bordered single-line fields with a cursor when focused.

use ratatui::{prelude::*, widgets::*};

use crate::state::TextInput;

/// Draw one token field.
pub fn draw_input(frame: &mut Frame, title: &str, input: &TextInput, focused: bool, area: Rect) {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", title));

    let mut spans = vec![Span::raw(input.display())];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    } else if input.is_empty() {
        spans.push(Span::styled(
            "Add token here...",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(widget, area);
}
