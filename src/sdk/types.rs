// Card-management SDK data types.
// Card summaries as returned by the card fetch, and the SDK error surface.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque card identifier issued by the SDK.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Card expiry as a (month, year) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryDate {
    pub month: u8,
    pub year: u16,
}

impl fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

/// Lifecycle state of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    #[default]
    Active,
    Inactive,
    Suspended,
    Revoked,
}

impl CardState {
    pub fn label(&self) -> &'static str {
        match self {
            CardState::Active => "active",
            CardState::Inactive => "inactive",
            CardState::Suspended => "suspended",
            CardState::Revoked => "revoked",
        }
    }
}

impl fmt::Display for CardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A cardholder's card as returned by the card fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    pub id: CardId,
    pub pan_last4: String,
    pub cardholder_name: String,
    pub expiry: ExpiryDate,
    #[serde(default)]
    pub state: CardState,
}

impl CardSummary {
    /// Masked PAN for display, e.g. `•••• 4242`.
    pub fn masked_pan(&self) -> String {
        format!("•••• {}", self.pan_last4)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    #[error("no active session")]
    Unauthenticated,

    #[error("card {0} not found")]
    CardNotFound(CardId),

    #[error("card {id} is {state}")]
    CardNotActive { id: CardId, state: CardState },

    #[error("single-use token is invalid or already used")]
    InvalidPinToken,

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("card service unavailable: {0}")]
    Unavailable(String),
}
