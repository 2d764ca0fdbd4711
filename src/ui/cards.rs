// Card rendering.
// Card picker list, card info panel, and the secure PIN display container.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::sdk::{CardState, CardSummary, SecureDisplay};
use crate::state::SelectableList;

/// Format a timestamp as relative time (e.g., "2m ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(*dt);

    if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

fn state_color(state: CardState) -> Color {
    match state {
        CardState::Active => Color::Green,
        CardState::Inactive => Color::Gray,
        CardState::Suspended => Color::Yellow,
        CardState::Revoked => Color::Red,
    }
}

fn panel(title: &str, focused: bool) -> Block<'static> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", title))
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, block: Block, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow))
        .block(block);
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, block: Block, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
    frame.render_widget(text, area);
}

/// Render the card list.
pub fn render_cards_list(
    frame: &mut Frame,
    list: &mut SelectableList<CardSummary>,
    title: &str,
    loading: bool,
    focused: bool,
    area: Rect,
) {
    let block = panel(title, focused);

    if loading {
        render_loading(frame, area, block, "Fetching cards");
        return;
    }
    if list.is_empty() {
        render_empty(frame, area, block, "Log in to load cards");
        return;
    }

    let items: Vec<ListItem> = list
        .items
        .iter()
        .map(|card| {
            ListItem::new(Line::from(vec![
                Span::styled(card.masked_pan(), Style::default().fg(Color::Cyan)),
                Span::raw(format!("  {}", card.cardholder_name)),
                Span::styled(
                    format!("  {}", card.expiry),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("  {}", card.state),
                    Style::default().fg(state_color(card.state)),
                ),
            ]))
        })
        .collect();

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut list.list_state);
}

/// Render the selected card's JSON summary.
pub fn render_card_info(frame: &mut Frame, card_info: Option<&str>, area: Rect) {
    let block = panel("Card info", false);
    match card_info {
        Some(json) => {
            let text = Paragraph::new(json)
                .style(Style::default().fg(Color::White))
                .block(block)
                .wrap(Wrap { trim: false });
            frame.render_widget(text, area);
        }
        None => render_empty(frame, area, block, "No card selected"),
    }
}

/// Render the secure display container, or a placeholder until a PIN is revealed.
pub fn render_secure_display(
    frame: &mut Frame,
    title: &str,
    display: Option<&SecureDisplay>,
    requesting: bool,
    area: Rect,
) {
    let block = panel(title, display.is_some());

    match display {
        Some(display) => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(display, inner);
        }
        None if requesting => render_loading(frame, area, block, "Requesting PIN"),
        None => render_empty(frame, area, block, "Select a card and enter a PIN token"),
    }
}
