// App state and main event loop.
// Routes keyboard input to the session controller and applies SDK completions between frames.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;

use crate::state::{ScreenView, SessionController, SessionState, TextInput, UiInbox};
use crate::ui;

/// How long to wait for terminal input before checking the inbox again.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Focused pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    SessionToken,
    Cards,
    PinToken,
}

impl Focus {
    pub fn title(&self) -> &'static str {
        match self {
            Focus::SessionToken => "Session token",
            Focus::Cards => "Cards",
            Focus::PinToken => "PIN token",
        }
    }

    /// Next pane; the card list is skipped when there is no picker.
    pub fn next(&self, picker: bool) -> Self {
        match self {
            Focus::SessionToken if picker => Focus::Cards,
            Focus::SessionToken => Focus::PinToken,
            Focus::Cards => Focus::PinToken,
            Focus::PinToken => Focus::SessionToken,
        }
    }

    pub fn prev(&self, picker: bool) -> Self {
        match self {
            Focus::SessionToken => Focus::PinToken,
            Focus::Cards => Focus::SessionToken,
            Focus::PinToken if picker => Focus::Cards,
            Focus::PinToken => Focus::SessionToken,
        }
    }
}

/// Main application state.
pub struct App {
    pub controller: SessionController,
    pub view: ScreenView,
    inbox: UiInbox,
    pub session_input: TextInput,
    pub pin_input: TextInput,
    pub focus: Focus,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: SessionController, inbox: UiInbox) -> Self {
        Self {
            controller,
            view: ScreenView::new(),
            inbox,
            session_input: TextInput::masked(),
            pin_input: TextInput::masked(),
            focus: Focus::default(),
            show_help: false,
            should_quit: false,
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            self.drain_completions();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Apply every SDK result that arrived since the last frame.
    pub fn drain_completions(&mut self) {
        while let Some(completion) = self.inbox.try_next() {
            let before = self.controller.state();
            // Failures are already on screen via the presenter.
            let _ = self.controller.complete(completion, &mut self.view);
            self.follow_state(before);
        }
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Dispatch a single key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let picker = self.controller.shows_picker();

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('l') if ctrl => {
                let before = self.controller.state();
                self.controller.log_out(&mut self.view);
                self.pin_input.clear();
                self.follow_state(before);
            }
            KeyCode::Char('r') if ctrl => {
                let _ = self.controller.fetch_cards(&mut self.view);
            }
            KeyCode::Char('t') if ctrl => {
                if let Some(input) = self.focused_input_mut() {
                    input.toggle_mask();
                }
            }
            KeyCode::F(1) => self.show_help = true,
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus = self.focus.next(picker),
            KeyCode::BackTab => self.focus = self.focus.prev(picker),
            KeyCode::PageUp => self.view.console.select_prev(),
            KeyCode::PageDown => self.view.console.select_next(),
            KeyCode::Enter => self.submit(),
            _ => match self.focus {
                Focus::Cards => match key.code {
                    KeyCode::Up | KeyCode::Char('k') => self.view.cards.select_prev(),
                    KeyCode::Down | KeyCode::Char('j') => self.view.cards.select_next(),
                    _ => {}
                },
                Focus::SessionToken | Focus::PinToken => {
                    if let Some(input) = self.focused_input_mut() {
                        match key.code {
                            KeyCode::Char(c) if !ctrl => input.push(c),
                            KeyCode::Backspace => input.backspace(),
                            _ => {}
                        }
                    }
                }
            },
        }
    }

    fn focused_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            Focus::SessionToken => Some(&mut self.session_input),
            Focus::PinToken => Some(&mut self.pin_input),
            Focus::Cards => None,
        }
    }

    /// Enter on the focused pane.
    fn submit(&mut self) {
        let before = self.controller.state();
        match self.focus {
            Focus::SessionToken => {
                let token = self.session_input.take();
                let _ = self.controller.submit_login(&token, &mut self.view);
            }
            Focus::Cards => {
                if let Some(id) = self.view.cards.selected_item().map(|c| c.id.clone()) {
                    let _ = self.controller.select_card(&id, &mut self.view);
                }
            }
            Focus::PinToken => {
                let token = self.pin_input.take();
                let _ = self.controller.request_pin(&token, &mut self.view);
            }
        }
        self.follow_state(before);
    }

    /// Move focus to where the next step of the flow happens.
    fn follow_state(&mut self, before: SessionState) {
        let now = self.controller.state();
        if now == before {
            return;
        }
        self.focus = match now {
            SessionState::LoggedOut => Focus::SessionToken,
            SessionState::CardsFetched if self.controller.shows_picker() => Focus::Cards,
            SessionState::CardsFetched | SessionState::CardSelected => Focus::PinToken,
            _ => self.focus,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::runtime::Handle;

    use crate::sdk::{SandboxCardManager, SandboxFixture};
    use crate::state::{SelectionMode, ui_channel};

    fn app(mode: SelectionMode) -> App {
        let (ui, inbox) = ui_channel(Handle::current());
        let sdk = SandboxCardManager::new(SandboxFixture::demo()).with_latency(Duration::ZERO);
        let controller = SessionController::new(Arc::new(sdk), ui).with_strategy(mode);
        App::new(controller, inbox)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Let spawned SDK calls finish, then apply them.
    async fn settle(app: &mut App) {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        app.drain_completions();
    }

    #[test]
    fn test_focus_cycle() {
        assert_eq!(Focus::SessionToken.next(true), Focus::Cards);
        assert_eq!(Focus::SessionToken.next(false), Focus::PinToken);
        assert_eq!(Focus::PinToken.next(true), Focus::SessionToken);
        assert_eq!(Focus::PinToken.prev(true), Focus::Cards);
        assert_eq!(Focus::PinToken.prev(false), Focus::SessionToken);
        assert_eq!(Focus::Cards.prev(true), Focus::SessionToken);
    }

    #[tokio::test]
    async fn test_keyboard_flow_reveals_pin() {
        let mut app = app(SelectionMode::Explicit);

        type_text(&mut app, "sandbox-session");
        press(&mut app, KeyCode::Enter);
        assert!(app.session_input.is_empty());
        settle(&mut app).await;

        assert_eq!(app.view.state, SessionState::CardsFetched);
        assert_eq!(app.focus, Focus::Cards);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view.state, SessionState::CardSelected);
        assert_eq!(
            app.controller.selected_card().unwrap().id.as_str(),
            "crd_sandbox_002"
        );
        assert_eq!(app.focus, Focus::PinToken);

        type_text(&mut app, "pin-token-1");
        press(&mut app, KeyCode::Enter);
        settle(&mut app).await;

        assert_eq!(app.view.state, SessionState::PinRevealed);
        assert!(app.view.secure_display.is_some());
    }

    #[tokio::test]
    async fn test_first_card_mode_focuses_pin() {
        let mut app = app(SelectionMode::FirstCard);

        type_text(&mut app, "sandbox-session");
        press(&mut app, KeyCode::Enter);
        settle(&mut app).await;

        assert_eq!(app.view.state, SessionState::CardSelected);
        assert_eq!(app.focus, Focus::PinToken);
    }

    #[tokio::test]
    async fn test_logout_key() {
        let mut app = app(SelectionMode::Explicit);
        type_text(&mut app, "sandbox-session");
        press(&mut app, KeyCode::Enter);
        settle(&mut app).await;

        app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));

        assert_eq!(app.view.state, SessionState::LoggedOut);
        assert_eq!(app.focus, Focus::SessionToken);
        assert!(app.view.cards.is_empty());
    }

    #[tokio::test]
    async fn test_help_and_quit() {
        let mut app = app(SelectionMode::Explicit);

        press(&mut app, KeyCode::F(1));
        assert!(app.show_help);
        type_text(&mut app, "x");
        assert!(app.session_input.is_empty());
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }
}
