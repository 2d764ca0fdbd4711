// Sandbox card manager.
// Fixture-backed stand-in for the issuer, with simulated latency and single-use PIN tokens.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{AppError, Result};

use super::CardManager;
use super::display::SecureDisplay;
use super::types::{CardId, CardState, CardSummary, ExpiryDate, SdkError};

/// Default simulated network latency.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

/// A card in the sandbox fixture, with the PIN the issuer would reveal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxCard {
    #[serde(flatten)]
    pub summary: CardSummary,
    pub pin: String,
}

/// Sandbox data set: who may log in, which cards they see, which PIN tokens are valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SandboxFixture {
    #[serde(default)]
    pub session_tokens: Vec<String>,
    #[serde(default)]
    pub cards: Vec<SandboxCard>,
    #[serde(default)]
    pub pin_tokens: Vec<String>,
    /// When set, card and PIN requests fail as if the issuer were down.
    #[serde(default)]
    pub outage: Option<String>,
}

impl SandboxFixture {
    /// Load a fixture from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::FixtureNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                AppError::Io(e)
            }
        })?;
        serde_json::from_str(&contents).map_err(|source| AppError::Fixture {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Built-in fixture used when no file is configured.
    pub fn demo() -> Self {
        let card = |id: &str,
                    last4: &str,
                    name: &str,
                    month: u8,
                    year: u16,
                    state: CardState,
                    pin: &str| SandboxCard {
            summary: CardSummary {
                id: CardId::new(id),
                pan_last4: last4.to_string(),
                cardholder_name: name.to_string(),
                expiry: ExpiryDate { month, year },
                state,
            },
            pin: pin.to_string(),
        };

        Self {
            session_tokens: vec!["sandbox-session".to_string()],
            cards: vec![
                card(
                    "crd_sandbox_001",
                    "4242",
                    "Ada Lovelace",
                    9,
                    2028,
                    CardState::Active,
                    "1234",
                ),
                card(
                    "crd_sandbox_002",
                    "1881",
                    "Ada Lovelace",
                    2,
                    2027,
                    CardState::Active,
                    "8080",
                ),
                card(
                    "crd_sandbox_003",
                    "0005",
                    "Ada Lovelace",
                    11,
                    2026,
                    CardState::Suspended,
                    "0000",
                ),
            ],
            pin_tokens: (1..=5).map(|n| format!("pin-token-{}", n)).collect(),
            outage: None,
        }
    }
}

/// [`CardManager`] backed by a [`SandboxFixture`].
pub struct SandboxCardManager {
    session_tokens: HashSet<String>,
    cards: Vec<CardSummary>,
    pins: HashMap<CardId, Zeroizing<String>>,
    unused_pin_tokens: Mutex<HashSet<String>>,
    logged_in: Mutex<bool>,
    outage: Option<String>,
    latency: Duration,
    pin_color: Color,
}

impl SandboxCardManager {
    pub fn new(fixture: SandboxFixture) -> Self {
        let mut cards = Vec::with_capacity(fixture.cards.len());
        let mut pins = HashMap::new();
        for card in fixture.cards {
            pins.insert(card.summary.id.clone(), Zeroizing::new(card.pin));
            cards.push(card.summary);
        }

        Self {
            session_tokens: fixture.session_tokens.into_iter().collect(),
            cards,
            pins,
            unused_pin_tokens: Mutex::new(fixture.pin_tokens.into_iter().collect()),
            logged_in: Mutex::new(false),
            outage: fixture.outage,
            latency: DEFAULT_LATENCY,
            pin_color: Color::Blue,
        }
    }

    /// Set the simulated latency applied to async calls.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Set the text color used by revealed PIN displays.
    pub fn with_pin_color(mut self, color: Color) -> Self {
        self.pin_color = color;
        self
    }

    fn session(&self) -> MutexGuard<'_, bool> {
        self.logged_in.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_outage(&self) -> std::result::Result<(), SdkError> {
        match &self.outage {
            Some(reason) => Err(SdkError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn require_session(&self) -> std::result::Result<(), SdkError> {
        if *self.session() {
            Ok(())
        } else {
            Err(SdkError::Unauthenticated)
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl CardManager for SandboxCardManager {
    fn log_in_session(&self, token: &str) -> bool {
        let accepted = self.session_tokens.contains(token);
        *self.session() = accepted;
        accepted
    }

    fn log_out_session(&self) {
        *self.session() = false;
    }

    async fn get_cards(&self) -> std::result::Result<Vec<CardSummary>, SdkError> {
        self.simulate_latency().await;
        self.check_outage()?;
        self.require_session()?;
        Ok(self.cards.clone())
    }

    async fn get_pin(
        &self,
        card: &CardId,
        single_use_token: &str,
    ) -> std::result::Result<SecureDisplay, SdkError> {
        self.simulate_latency().await;
        self.check_outage()?;
        self.require_session()?;

        let summary = self
            .cards
            .iter()
            .find(|c| &c.id == card)
            .ok_or_else(|| SdkError::CardNotFound(card.clone()))?;
        if summary.state != CardState::Active {
            return Err(SdkError::CardNotActive {
                id: card.clone(),
                state: summary.state,
            });
        }

        let consumed = self
            .unused_pin_tokens
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(single_use_token);
        if !consumed {
            return Err(SdkError::InvalidPinToken);
        }

        let pin = self
            .pins
            .get(card)
            .ok_or_else(|| SdkError::CardNotFound(card.clone()))?;
        Ok(SecureDisplay::new(pin, self.pin_color))
    }
}
