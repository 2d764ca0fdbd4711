// Session/selection controller.
// State machine coordinating login, card fetch, card selection and PIN reveal.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::sdk::{CardId, CardManager, CardSummary, SdkError, SecureDisplay};

use super::console::ConsoleMessage;
use super::dispatch::{Completion, RequestId, UiContext, within};

/// Where the screen is in the login → fetch → select → reveal flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggingIn,
    LoggedIn,
    CardsFetched,
    CardSelected,
    PinRevealed,
}

impl SessionState {
    /// All states in flow order.
    pub const FLOW: [SessionState; 6] = [
        SessionState::LoggedOut,
        SessionState::LoggingIn,
        SessionState::LoggedIn,
        SessionState::CardsFetched,
        SessionState::CardSelected,
        SessionState::PinRevealed,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SessionState::LoggedOut => "Logged out",
            SessionState::LoggingIn => "Logging in",
            SessionState::LoggedIn => "Logged in",
            SessionState::CardsFetched => "Cards",
            SessionState::CardSelected => "Card selected",
            SessionState::PinRevealed => "PIN",
        }
    }

    /// Position in [`SessionState::FLOW`].
    pub fn step(&self) -> usize {
        Self::FLOW.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn is_logged_in(&self) -> bool {
        self.step() >= SessionState::LoggedIn.step()
    }

    pub fn has_cards(&self) -> bool {
        self.step() >= SessionState::CardsFetched.step()
    }
}

/// Which text field an input error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    SessionToken,
    PinToken,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputField::SessionToken => f.write_str("session token"),
            InputField::PinToken => f.write_str("single-use PIN token"),
        }
    }
}

/// Async SDK operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchCards,
    RevealPin,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::FetchCards => f.write_str("the card fetch"),
            Operation::RevealPin => f.write_str("the PIN request"),
        }
    }
}

/// Every failure the controller reports. None of them are fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Please enter a {0}.")]
    EmptyInput(InputField),

    #[error("Login failed. Please check your token.")]
    AuthenticationFailed,

    #[error("Failed to fetch cards: {0}")]
    FetchFailed(SdkError),

    #[error("No cards available.")]
    NoCardsAvailable,

    #[error("No card selected.")]
    NoCardSelected,

    #[error("Failed to fetch PIN: {0}")]
    PinRevealFailed(SdkError),

    #[error("Card {0} is not in the current card list.")]
    UnknownCard(CardId),

    #[error("Not logged in.")]
    NotLoggedIn,

    #[error("Still waiting for {0} to finish.")]
    Busy(Operation),
}

impl SessionError {
    /// Problems fixed by changing the input or waiting, as opposed to SDK failures.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            SessionError::EmptyInput(_)
                | SessionError::NoCardSelected
                | SessionError::UnknownCard(_)
                | SessionError::NotLoggedIn
                | SessionError::Busy(_)
        )
    }
}

/// Receives everything the controller wants shown.
pub trait Presenter {
    fn on_state_changed(&mut self, state: SessionState);
    fn on_message(&mut self, message: ConsoleMessage);
    fn on_cards_available(&mut self, cards: &[CardSummary]);
    fn on_selection_changed(&mut self, card: Option<&CardSummary>);
    fn on_secure_display_ready(&mut self, display: SecureDisplay);
    fn on_secure_display_cleared(&mut self);
}

/// Decides how a card gets selected after a fetch.
pub trait SelectionStrategy: Send + Sync {
    /// Card to select as soon as cards arrive, if any.
    fn initial_selection<'a>(&self, cards: &'a [CardSummary]) -> Option<&'a CardSummary>;

    /// Whether the user picks from a list.
    fn shows_picker(&self) -> bool;
}

/// Built-in selection strategies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// Pick a card from the list.
    #[default]
    Explicit,
    /// Use the first card returned.
    FirstCard,
}

impl SelectionStrategy for SelectionMode {
    fn initial_selection<'a>(&self, cards: &'a [CardSummary]) -> Option<&'a CardSummary> {
        match self {
            SelectionMode::Explicit => None,
            SelectionMode::FirstCard => cards.first(),
        }
    }

    fn shows_picker(&self) -> bool {
        matches!(self, SelectionMode::Explicit)
    }
}

/// Drives a [`CardManager`] through the login → fetch → select → reveal flow.
///
/// All methods run on the UI thread. Async SDK calls are spawned through the
/// [`UiContext`] and their results come back through [`SessionController::complete`].
/// Failures are reported to the presenter and returned; the state never moves
/// past the last stable state on error.
pub struct SessionController {
    sdk: Arc<dyn CardManager>,
    ui: UiContext,
    strategy: Box<dyn SelectionStrategy>,
    request_timeout: Option<Duration>,
    state: SessionState,
    cards: Vec<CardSummary>,
    selected: Option<CardId>,
    in_flight: Option<(RequestId, Operation)>,
    last_request: u64,
}

impl SessionController {
    pub fn new(sdk: Arc<dyn CardManager>, ui: UiContext) -> Self {
        Self {
            sdk,
            ui,
            strategy: Box::new(SelectionMode::default()),
            request_timeout: None,
            state: SessionState::LoggedOut,
            cards: Vec::new(),
            selected: None,
            in_flight: None,
            last_request: 0,
        }
    }

    pub fn with_strategy(mut self, strategy: impl SelectionStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cards(&self) -> &[CardSummary] {
        &self.cards
    }

    pub fn selected_card(&self) -> Option<&CardSummary> {
        let id = self.selected.as_ref()?;
        self.cards.iter().find(|c| &c.id == id)
    }

    /// Operation currently awaiting a result.
    pub fn pending(&self) -> Option<Operation> {
        self.in_flight.map(|(_, op)| op)
    }

    pub fn shows_picker(&self) -> bool {
        self.strategy.shows_picker()
    }

    /// Log in with a session token, then fetch cards.
    pub fn submit_login(
        &mut self,
        token: &str,
        view: &mut impl Presenter,
    ) -> Result<(), SessionError> {
        let token = token.trim();
        if token.is_empty() {
            return self.reject(SessionError::EmptyInput(InputField::SessionToken), view);
        }

        self.clear_session(view);
        self.set_state(SessionState::LoggingIn, view);
        info!(token_len = token.len(), "logging in");

        if !self.sdk.log_in_session(token) {
            self.set_state(SessionState::LoggedOut, view);
            return self.reject(SessionError::AuthenticationFailed, view);
        }

        self.set_state(SessionState::LoggedIn, view);
        view.on_message(ConsoleMessage::info("Login successful!"));
        self.fetch_cards(view)
    }

    /// End the session and return to the login step.
    pub fn log_out(&mut self, view: &mut impl Presenter) {
        self.sdk.log_out_session();
        self.clear_session(view);
        self.set_state(SessionState::LoggedOut, view);
        view.on_message(ConsoleMessage::info("Logged out."));
    }

    /// Start an async card fetch. Runs after login and on refresh.
    pub fn fetch_cards(&mut self, view: &mut impl Presenter) -> Result<(), SessionError> {
        if !self.state.is_logged_in() {
            return self.reject(SessionError::NotLoggedIn, view);
        }
        if let Some((_, op)) = self.in_flight {
            return self.reject(SessionError::Busy(op), view);
        }

        let request = self.begin(Operation::FetchCards);
        let sdk = Arc::clone(&self.sdk);
        let limit = self.request_timeout;
        self.ui.spawn(async move {
            let result = within(limit, sdk.get_cards()).await;
            Completion::Cards { request, result }
        });

        debug!(?request, "fetching cards");
        view.on_message(ConsoleMessage::info("Fetching cards..."));
        Ok(())
    }

    /// Select a card from the current list.
    pub fn select_card(
        &mut self,
        id: &CardId,
        view: &mut impl Presenter,
    ) -> Result<(), SessionError> {
        if !self.state.has_cards() {
            return self.reject(SessionError::NoCardsAvailable, view);
        }
        let Some(card) = self.cards.iter().find(|c| &c.id == id).cloned() else {
            return self.reject(SessionError::UnknownCard(id.clone()), view);
        };

        if let Some((request, Operation::RevealPin)) = self.in_flight {
            debug!(?request, "abandoning PIN request for previous card");
            self.in_flight = None;
        }

        info!(card = %card.id, "card selected");
        self.selected = Some(card.id.clone());
        view.on_secure_display_cleared();
        view.on_selection_changed(Some(&card));
        self.set_state(SessionState::CardSelected, view);
        Ok(())
    }

    /// Request a PIN display for the selected card with a single-use token.
    pub fn request_pin(
        &mut self,
        pin_token: &str,
        view: &mut impl Presenter,
    ) -> Result<(), SessionError> {
        let card = match (self.state, &self.selected) {
            (SessionState::CardSelected | SessionState::PinRevealed, Some(card)) => card.clone(),
            _ => return self.reject(SessionError::NoCardSelected, view),
        };
        let pin_token = pin_token.trim();
        if pin_token.is_empty() {
            return self.reject(SessionError::EmptyInput(InputField::PinToken), view);
        }
        if let Some((_, op)) = self.in_flight {
            return self.reject(SessionError::Busy(op), view);
        }

        if self.state == SessionState::PinRevealed {
            view.on_secure_display_cleared();
            self.set_state(SessionState::CardSelected, view);
        }

        let request = self.begin(Operation::RevealPin);
        let sdk = Arc::clone(&self.sdk);
        let limit = self.request_timeout;
        let token = Zeroizing::new(pin_token.to_string());
        self.ui.spawn(async move {
            let result = within(limit, sdk.get_pin(&card, &token)).await;
            Completion::Pin { request, result }
        });

        debug!(?request, "requesting PIN");
        view.on_message(ConsoleMessage::info("Requesting PIN..."));
        Ok(())
    }

    /// Apply the result of an async SDK call. Results for superseded requests are dropped.
    pub fn complete(
        &mut self,
        completion: Completion,
        view: &mut impl Presenter,
    ) -> Result<(), SessionError> {
        let request = completion.request();
        match self.in_flight {
            Some((current, _)) if current == request => self.in_flight = None,
            _ => {
                debug!(?request, "dropping stale completion");
                return Ok(());
            }
        }

        match completion {
            Completion::Cards { result, .. } => self.finish_fetch(result, view),
            Completion::Pin { result, .. } => self.finish_pin(result, view),
        }
    }

    fn finish_fetch(
        &mut self,
        result: Result<Vec<CardSummary>, SdkError>,
        view: &mut impl Presenter,
    ) -> Result<(), SessionError> {
        let cards = match result {
            Ok(cards) => cards,
            Err(e) => return self.reject(SessionError::FetchFailed(e), view),
        };

        self.selected = None;
        view.on_secure_display_cleared();
        view.on_selection_changed(None);
        self.cards = cards;
        view.on_cards_available(&self.cards);

        if self.cards.is_empty() {
            self.set_state(SessionState::LoggedIn, view);
            return self.reject(SessionError::NoCardsAvailable, view);
        }

        info!(count = self.cards.len(), "cards fetched");
        self.set_state(SessionState::CardsFetched, view);

        let initial = self
            .strategy
            .initial_selection(&self.cards)
            .map(|card| card.id.clone());
        match initial {
            Some(id) => self.select_card(&id, view),
            None => Ok(()),
        }
    }

    fn finish_pin(
        &mut self,
        result: Result<SecureDisplay, SdkError>,
        view: &mut impl Presenter,
    ) -> Result<(), SessionError> {
        match result {
            Ok(display) => {
                info!("PIN display ready");
                self.set_state(SessionState::PinRevealed, view);
                view.on_secure_display_ready(display);
                view.on_message(ConsoleMessage::info("PIN fetched successfully"));
                Ok(())
            }
            Err(e) => self.reject(SessionError::PinRevealFailed(e), view),
        }
    }

    fn begin(&mut self, op: Operation) -> RequestId {
        self.last_request += 1;
        let request = RequestId(self.last_request);
        self.in_flight = Some((request, op));
        request
    }

    /// Drop everything tied to the current session.
    fn clear_session(&mut self, view: &mut impl Presenter) {
        if let Some((request, op)) = self.in_flight.take() {
            debug!(?request, ?op, "abandoning in-flight request");
        }
        self.cards.clear();
        self.selected = None;
        view.on_secure_display_cleared();
        view.on_selection_changed(None);
        view.on_cards_available(&[]);
    }

    fn set_state(&mut self, state: SessionState, view: &mut impl Presenter) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "state change");
            self.state = state;
            view.on_state_changed(state);
        }
    }

    fn reject(&self, err: SessionError, view: &mut impl Presenter) -> Result<(), SessionError> {
        warn!(state = ?self.state, error = %err, "session operation failed");
        let text = err.to_string();
        view.on_message(if err.is_user_correctable() {
            ConsoleMessage::warn(text)
        } else {
            ConsoleMessage::error(text)
        });
        Err(err)
    }
}
