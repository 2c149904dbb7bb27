//! Async effect handlers. Each returns the event to feed back to the reducer.

use nexthire_core::api::{ApiClient, RegisterRequest};
use nexthire_core::credentials::CredentialHolder;
use nexthire_core::forms::{self, LoginInput};
use nexthire_core::session::{self, ResolveTicket};

use crate::events::UiEvent;

pub async fn resolve_identity(api: ApiClient, ticket: ResolveTicket, token: String) -> UiEvent {
    let result = session::fetch_identity(&api, &token, &ticket).await;
    UiEvent::IdentityResolved {
        epoch: ticket.epoch,
        result,
    }
}

pub async fn submit_login(
    api: ApiClient,
    credentials: CredentialHolder,
    input: LoginInput,
    ttl_days: u32,
) -> UiEvent {
    let result = forms::login(&api, &credentials, &input, ttl_days).await;
    if let Err(e) = &result {
        tracing::warn!(kind = %e.kind, error = %e, "login failed");
    }
    UiEvent::LoginFinished { result }
}

pub async fn submit_register(api: ApiClient, request: RegisterRequest) -> UiEvent {
    let result = api.register(&request).await;
    match &result {
        Ok(()) => tracing::info!(role = %request.role, "registered"),
        Err(e) => tracing::warn!(kind = %e.kind, error = %e, "registration failed"),
    }
    UiEvent::RegisterFinished { result }
}
