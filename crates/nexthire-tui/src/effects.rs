//! UI effect types.
//!
//! Effects are commands returned by the reducer for the runtime to execute.
//! They cover I/O and task spawning only; the reducer never performs either.

use nexthire_core::api::RegisterRequest;
use nexthire_core::forms::LoginInput;
use nexthire_core::session::ResolveTicket;

#[derive(Debug)]
pub enum UiEffect {
    Quit,

    /// Fetch the profile for `token`, reporting back with the ticket's epoch.
    ResolveIdentity { ticket: ResolveTicket, token: String },

    /// Log in and store the credential.
    SubmitLogin { input: LoginInput },

    SubmitRegister { request: RegisterRequest },
}
