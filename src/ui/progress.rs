// Progress trail rendering.
// Shows the login → fetch → select → reveal steps with the current one highlighted.

use ratatui::{prelude::*, widgets::*};

use crate::state::{Operation, SessionState};

/// Render the state trail, with a spinner-style note while a request is pending.
pub fn draw_progress(
    frame: &mut Frame,
    state: SessionState,
    pending: Option<Operation>,
    area: Rect,
) {
    let current = state.step();
    let mut spans = Vec::new();

    for (i, step) in SessionState::FLOW.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        }

        let style = if i == current {
            // Current step is highlighted
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if i < current {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        spans.push(Span::styled(step.title(), style));
    }

    if let Some(op) = pending {
        let label = match op {
            Operation::FetchCards => "  ⏳ fetching cards",
            Operation::RevealPin => "  ⏳ requesting PIN",
        };
        spans.push(Span::styled(label, Style::default().fg(Color::Yellow)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" cardpin ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
