//! Session identity store and the session context handed to guards.
//!
//! ## Resolution lifecycle
//!
//! ```text
//! begin_resolve() ──► loading = true, ticket(epoch, cancel)
//!        │
//!        ▼ (fetch /users/profile with the credential token)
//! complete(ticket, outcome)
//!        ├── epoch current  ──► identity = Some/None, loading = false
//!        └── epoch stale    ──► discarded (store was reset meanwhile)
//! ```
//!
//! `reset()` (logout) bumps the epoch and cancels the in-flight ticket, so a
//! fetch started before a logout can never repopulate the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::api::{ApiClient, ApiError};
use crate::credentials::{Credential, CredentialHolder};
use crate::role::Role;

/// Resolved user profile. Held in memory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Handle for one in-flight identity resolution.
#[derive(Debug, Clone)]
pub struct ResolveTicket {
    pub epoch: u64,
    pub cancel: CancellationToken,
}

/// In-memory identity cache for the current session.
#[derive(Debug, Default)]
pub struct SessionStore {
    identity: Option<SessionIdentity>,
    loading: bool,
    epoch: u64,
    in_flight: Option<CancellationToken>,
    last_error: Option<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.identity.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the most recent swallowed resolution failure.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Starts a resolution unless one is running or the identity is already known.
    pub fn begin_resolve(&mut self) -> Option<ResolveTicket> {
        if self.loading || self.identity.is_some() {
            return None;
        }

        let cancel = CancellationToken::new();
        self.loading = true;
        self.in_flight = Some(cancel.clone());
        tracing::debug!(epoch = self.epoch, "identity resolution started");
        Some(ResolveTicket {
            epoch: self.epoch,
            cancel,
        })
    }

    /// Applies the outcome of a resolution. Failures are swallowed.
    ///
    /// Returns false if the ticket is stale and the outcome was discarded.
    pub fn complete(&mut self, epoch: u64, outcome: Result<SessionIdentity, ApiError>) -> bool {
        if epoch != self.epoch {
            tracing::debug!(
                epoch,
                current = self.epoch,
                "discarding stale identity resolution"
            );
            return false;
        }

        self.loading = false;
        self.in_flight = None;
        match outcome {
            Ok(identity) => {
                tracing::debug!(user = %identity.id, "identity resolved");
                self.identity = Some(identity);
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!(kind = %e.kind, error = %e, "identity resolution failed");
                self.identity = None;
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    /// Clears the identity and invalidates any in-flight resolution.
    pub fn reset(&mut self) {
        if let Some(cancel) = self.in_flight.take() {
            cancel.cancel();
        }
        self.identity = None;
        self.loading = false;
        self.last_error = None;
        self.epoch = self.epoch.wrapping_add(1);
    }
}

/// Explicitly constructed session state shared by guards and navigation.
///
/// Created once at application start and reset on logout.
#[derive(Debug)]
pub struct SessionContext {
    pub credentials: CredentialHolder,
    pub store: SessionStore,
}

impl SessionContext {
    pub fn new(credentials: CredentialHolder) -> Self {
        Self {
            credentials,
            store: SessionStore::new(),
        }
    }

    pub fn credential(&self) -> Option<Credential> {
        self.credentials.get()
    }

    /// Clears the credential first, then the in-memory identity.
    ///
    /// A failure to remove the stored credential is logged, not returned:
    /// logout always completes from the caller's point of view.
    pub fn logout(&mut self) {
        if let Err(e) = self.credentials.clear() {
            tracing::error!(error = %e, "failed to clear stored credential");
        }
        self.store.reset();
    }

    /// Resolves the identity in one step (begin, fetch, complete).
    ///
    /// No-op if already resolved, already loading, or no credential is stored.
    pub async fn resolve(&mut self, api: &ApiClient) {
        let Some(credential) = self.credential() else {
            return;
        };
        let Some(ticket) = self.store.begin_resolve() else {
            return;
        };
        let outcome = fetch_identity(api, &credential.token, &ticket).await;
        self.store.complete(ticket.epoch, outcome);
    }
}

/// Fetches the profile, giving up early if the ticket is cancelled.
///
/// # Errors
/// Returns the API error, or a `Cancelled` error when the ticket is cancelled.
pub async fn fetch_identity(
    api: &ApiClient,
    token: &str,
    ticket: &ResolveTicket,
) -> Result<SessionIdentity, ApiError> {
    tokio::select! {
        () = ticket.cancel.cancelled() => Err(ApiError::cancelled()),
        result = api.fetch_profile(token) => result,
    }
}
