//! UI event types.
//!
//! All inputs (terminal, timers, async results) become a `UiEvent` before the
//! reducer sees them. Async handlers send their results to the runtime inbox.

use crossterm::event::Event as CrosstermEvent;
use nexthire_core::api::ApiError;
use nexthire_core::role::Role;
use nexthire_core::session::SessionIdentity;

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic timer (spinner, notification expiry).
    Tick,

    Terminal(CrosstermEvent),

    /// Profile fetch finished for the resolution started at `epoch`.
    IdentityResolved {
        epoch: u64,
        result: Result<SessionIdentity, ApiError>,
    },

    /// Login request finished; on success the credential is already stored.
    LoginFinished { result: Result<Role, ApiError> },

    RegisterFinished { result: Result<(), ApiError> },

    /// The stored credential changed outside this process.
    CredentialChanged,
}
