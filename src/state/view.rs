// Screen view model.
// Presenter implementation holding everything the terminal UI draws.

use crate::sdk::{CardSummary, SecureDisplay};

use super::cards::{SelectableList, card_info_json};
use super::console::{Console, ConsoleMessage};
use super::session::{Presenter, SessionState};

/// What the screen currently shows.
#[derive(Debug, Default)]
pub struct ScreenView {
    pub state: SessionState,
    pub console: Console,
    pub cards: SelectableList<CardSummary>,
    /// Selected card rendered as JSON for the info panel.
    pub card_info: Option<String>,
    pub secure_display: Option<SecureDisplay>,
}

impl ScreenView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for ScreenView {
    fn on_state_changed(&mut self, state: SessionState) {
        self.state = state;
    }

    fn on_message(&mut self, message: ConsoleMessage) {
        self.console.push(message);
    }

    fn on_cards_available(&mut self, cards: &[CardSummary]) {
        self.cards.set_items(cards.to_vec());
    }

    fn on_selection_changed(&mut self, card: Option<&CardSummary>) {
        let Some(card) = card else {
            self.card_info = None;
            return;
        };

        self.cards.select_where(|c| c.id == card.id);
        self.card_info = match card_info_json(card) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::warn!(error = %e, "failed to format card info");
                None
            }
        };
    }

    fn on_secure_display_ready(&mut self, display: SecureDisplay) {
        self.secure_display = Some(display);
    }

    fn on_secure_display_cleared(&mut self) {
        self.secure_display = None;
    }
}
