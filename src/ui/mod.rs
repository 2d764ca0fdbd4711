// UI module for rendering the TUI.
// Lays out the progress trail, token inputs, card panels, console and status bar.

mod cards;
mod inputs;
mod progress;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Focus};
use crate::state::{ConsoleLevel, Operation};

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Progress trail
            Constraint::Min(10),   // Main content
            Constraint::Length(8), // Console
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    progress::draw_progress(
        frame,
        app.view.state,
        app.controller.pending(),
        chunks[0],
    );
    draw_content(frame, app, chunks[1]);
    draw_console(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw inputs and card list on the left, card info and PIN on the right.
fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Session token
            Constraint::Length(3), // PIN token
            Constraint::Min(3),    // Cards
        ])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(5)])
        .split(columns[1]);

    inputs::draw_input(
        frame,
        Focus::SessionToken.title(),
        &app.session_input,
        app.focus == Focus::SessionToken,
        left[0],
    );
    inputs::draw_input(
        frame,
        Focus::PinToken.title(),
        &app.pin_input,
        app.focus == Focus::PinToken,
        left[1],
    );

    let pending = app.controller.pending();
    let count = app.controller.cards().len();
    let cards_title = if app.controller.shows_picker() {
        format!("{} ({})", Focus::Cards.title(), count)
    } else {
        format!("{} ({}, first card is used)", Focus::Cards.title(), count)
    };
    cards::render_cards_list(
        frame,
        &mut app.view.cards,
        &cards_title,
        pending == Some(Operation::FetchCards),
        app.focus == Focus::Cards,
        left[2],
    );

    cards::render_card_info(frame, app.view.card_info.as_deref(), right[0]);
    let pin_title = match app.controller.selected_card() {
        Some(card) => format!("PIN for {}", card.masked_pan()),
        None => "PIN".to_string(),
    };
    cards::render_secure_display(
        frame,
        &pin_title,
        app.view.secure_display.as_ref(),
        pending == Some(Operation::RevealPin),
        right[1],
    );
}

/// Draw the console with controller messages.
fn draw_console(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Console ");

    if app.view.console.is_empty() {
        let text = Paragraph::new("Enter a session token to log in")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = app
        .view
        .console
        .messages()
        .iter()
        .map(|msg| {
            let (icon, color) = match msg.level {
                ConsoleLevel::Error => ("❌", Color::Red),
                ConsoleLevel::Warn => ("⚠️", Color::Yellow),
                ConsoleLevel::Info => ("ℹ️", Color::Cyan),
            };

            let time = cards::format_relative_time(&msg.timestamp);

            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", icon)),
                Span::styled(time, Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(msg.message.clone(), Style::default().fg(color)),
            ]))
        })
        .collect();

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut app.view.console.list_state);
}

/// Draw the status bar with keybinding hints.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = vec![
        Span::raw(" ↵ "),
        Span::styled("Submit", Style::default().fg(Color::DarkGray)),
        Span::raw("  Tab "),
        Span::styled("Focus", Style::default().fg(Color::DarkGray)),
    ];
    if app.focus == Focus::Cards {
        hints.push(Span::raw("  ↑↓ "));
        hints.push(Span::styled("Pick", Style::default().fg(Color::DarkGray)));
    }
    hints.extend([
        Span::raw("  ^R "),
        Span::styled("Refresh", Style::default().fg(Color::DarkGray)),
        Span::raw("  ^L "),
        Span::styled("Log out", Style::default().fg(Color::DarkGray)),
        Span::raw("  F1 "),
        Span::styled("Help", Style::default().fg(Color::DarkGray)),
        Span::raw("  Esc "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ]);

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 52;
    let popup_height = 16;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(
        popup_x,
        popup_y,
        popup_width.min(area.width),
        popup_height.min(area.height),
    );

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<14}", k), Style::default().fg(Color::Cyan)),
            Span::raw(what),
        ])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        key("Tab/Shift-Tab", "Move between fields"),
        key("Enter", "Log in / pick card / get PIN"),
        key("↑/↓ or j/k", "Highlight a card"),
        key("PgUp/PgDn", "Scroll console"),
        key("Ctrl-T", "Show/hide token text"),
        key("Ctrl-R", "Refresh cards"),
        key("Ctrl-L", "Log out"),
        key("F1", "Show/hide this help"),
        key("Esc / Ctrl-C", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" or ", Style::default().fg(Color::DarkGray)),
            Span::styled("F1", Style::default().fg(Color::Yellow)),
            Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use ratatui::backend::TestBackend;
    use tokio::runtime::Handle;

    use crate::sdk::{SandboxCardManager, SandboxFixture};
    use crate::state::{SessionController, ui_channel};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_draw_initial_screen() {
        let (ui, inbox) = ui_channel(Handle::current());
        let sdk = SandboxCardManager::new(SandboxFixture::demo()).with_latency(Duration::ZERO);
        let mut app = App::new(SessionController::new(Arc::new(sdk), ui), inbox);
        app.show_help = true;

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Logged out"));
        assert!(text.contains("Session token"));
        assert!(text.contains("Keyboard Shortcuts"));
    }
}
