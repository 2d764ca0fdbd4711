// Card-management SDK boundary.
// Defines the manager contract the session controller drives, plus a sandbox backend.

pub mod display;
pub mod sandbox;
pub mod types;

use async_trait::async_trait;

pub use display::SecureDisplay;
pub use sandbox::{SandboxCardManager, SandboxFixture};
pub use types::{CardId, CardState, CardSummary, SdkError};

/// Contract of the external card-management SDK.
///
/// Session validity, card data and PIN rendering all belong to the implementor.
/// Callers only ever see card summaries and opaque [`SecureDisplay`] handles.
#[async_trait]
pub trait CardManager: Send + Sync {
    /// Start a session with the given token. Synchronous, returns success.
    fn log_in_session(&self, token: &str) -> bool;

    /// End the current session, if any.
    fn log_out_session(&self);

    /// Fetch the cards of the logged-in cardholder.
    async fn get_cards(&self) -> Result<Vec<CardSummary>, SdkError>;

    /// Request a one-time PIN display for a card, authorized by a single-use token.
    async fn get_pin(
        &self,
        card: &CardId,
        single_use_token: &str,
    ) -> Result<SecureDisplay, SdkError>;
}
