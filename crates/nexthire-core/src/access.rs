//! Route access control.
//!
//! One guard covers both page kinds:
//!
//! - `Public` pages (landing, login, register) bounce a visitor who already
//!   holds a credential to their role dashboard.
//! - `Private` pages bounce a visitor without a credential to `/login`, and
//!   kick off identity resolution when the identity is not yet known.
//!
//! Guards read the credential and the session store but own neither. The host
//! performs the redirect and runs the resolve ticket.

use std::fmt;

use crate::router::LOGIN_PATH;
use crate::session::{ResolveTicket, SessionContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    Public,
    Private,
}

impl AccessPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessPolicy::Public => "public",
            AccessPolicy::Private => "private",
        }
    }
}

impl fmt::Display for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation requested by a guard. Always replaces the current history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    pub replace: bool,
}

impl Redirect {
    fn replace(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            replace: true,
        }
    }
}

/// Result of mounting a guard.
#[derive(Debug, Default)]
pub struct GuardOutcome {
    pub redirect: Option<Redirect>,
    /// Identity resolution the host must run and feed back into the store.
    pub resolve: Option<ResolveTicket>,
}

/// What a guarded route shows right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardView {
    /// Redirect pending; render nothing.
    Nothing,
    /// Identity is loading; render a blocking wait indicator only.
    Waiting,
    /// Render the page, with the navigation surface when `navigation` is set.
    Page { navigation: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteGuard {
    policy: AccessPolicy,
}

impl RouteGuard {
    pub fn new(policy: AccessPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(self) -> AccessPolicy {
        self.policy
    }

    /// Evaluates the guard for a freshly entered route.
    ///
    /// Called on every navigation, including moves between two private pages,
    /// so a cleared identity is fetched again. Resolution is skipped while one
    /// is already in flight.
    pub fn mount(self, ctx: &mut SessionContext) -> GuardOutcome {
        let credential = ctx.credential();

        match (self.policy, credential) {
            (AccessPolicy::Public, Some(credential)) => {
                let to = credential.role.dashboard_path();
                tracing::info!(role = %credential.role, %to, "authenticated visitor on public page");
                GuardOutcome {
                    redirect: Some(Redirect::replace(to)),
                    resolve: None,
                }
            }
            (AccessPolicy::Public, None) => GuardOutcome::default(),
            (AccessPolicy::Private, None) => {
                tracing::info!(to = LOGIN_PATH, "no credential on private page");
                GuardOutcome {
                    redirect: Some(Redirect::replace(LOGIN_PATH)),
                    resolve: None,
                }
            }
            (AccessPolicy::Private, Some(_)) => GuardOutcome {
                redirect: None,
                resolve: ctx.store.begin_resolve(),
            },
        }
    }

    /// Current rendering decision. Re-read after every store change.
    pub fn view(self, ctx: &SessionContext) -> GuardView {
        let has_credential = ctx.credential().is_some();

        match self.policy {
            AccessPolicy::Public if has_credential => GuardView::Nothing,
            AccessPolicy::Public => GuardView::Page { navigation: false },
            AccessPolicy::Private if !has_credential => GuardView::Nothing,
            AccessPolicy::Private if ctx.store.is_loading() => GuardView::Waiting,
            // Rendered even when resolution failed; identity fields stay empty.
            AccessPolicy::Private => GuardView::Page { navigation: true },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::credentials::CredentialHolder;
    use crate::role::Role;

    fn ctx_with(role: Option<Role>) -> SessionContext {
        let ctx = SessionContext::new(CredentialHolder::memory());
        if let Some(role) = role {
            ctx.credentials.set("abc", role, 7).unwrap();
        }
        ctx
    }

    #[test]
    fn test_public_guard_redirects_authenticated_visitor() {
        let mut ctx = ctx_with(Some(Role::Recruiter));
        let guard = RouteGuard::new(AccessPolicy::Public);

        let outcome = guard.mount(&mut ctx);

        assert_eq!(
            outcome.redirect,
            Some(Redirect::replace("/recruiter/dashboard"))
        );
        assert!(outcome.resolve.is_none());
        assert_eq!(guard.view(&ctx), GuardView::Nothing);
    }

    #[test]
    fn test_public_guard_redirects_job_seeker_to_hyphenated_dashboard() {
        let mut ctx = ctx_with(Some(Role::JobSeeker));
        let outcome = RouteGuard::new(AccessPolicy::Public).mount(&mut ctx);
        assert_eq!(outcome.redirect.unwrap().to, "/job-seeker/dashboard");
    }

    #[test]
    fn test_public_guard_renders_for_anonymous_visitor() {
        let mut ctx = ctx_with(None);
        let guard = RouteGuard::new(AccessPolicy::Public);

        let outcome = guard.mount(&mut ctx);

        assert!(outcome.redirect.is_none());
        assert_eq!(guard.view(&ctx), GuardView::Page { navigation: false });
    }

    #[test]
    fn test_private_guard_redirects_to_login_without_credential() {
        let mut ctx = ctx_with(None);
        let guard = RouteGuard::new(AccessPolicy::Private);

        let outcome = guard.mount(&mut ctx);

        assert_eq!(outcome.redirect, Some(Redirect::replace("/login")));
        assert!(outcome.resolve.is_none());
        assert!(!ctx.store.is_loading());
        assert_eq!(guard.view(&ctx), GuardView::Nothing);
    }

    #[test]
    fn test_private_guard_waits_then_renders_after_failure() {
        let mut ctx = ctx_with(Some(Role::JobSeeker));
        let guard = RouteGuard::new(AccessPolicy::Private);

        let ticket = guard.mount(&mut ctx).resolve.unwrap();
        assert_eq!(guard.view(&ctx), GuardView::Waiting);

        ctx.store
            .complete(ticket.epoch, Err(ApiError::http_status(500, "")));
        assert_eq!(guard.view(&ctx), GuardView::Page { navigation: true });
        assert!(ctx.store.identity().is_none());
    }

    #[test]
    fn test_second_private_mount_does_not_start_another_resolve() {
        let mut ctx = ctx_with(Some(Role::Recruiter));
        let guard = RouteGuard::new(AccessPolicy::Private);

        assert!(guard.mount(&mut ctx).resolve.is_some());
        let second = guard.mount(&mut ctx);

        assert!(second.redirect.is_none());
        assert!(second.resolve.is_none());
    }
}
