//! Headless navigation: route, guard, redirects and identity in one call.

use anyhow::{Result, bail};

use crate::access::{GuardView, RouteGuard};
use crate::api::ApiClient;
use crate::nav::{self, MenuItem};
use crate::role::Role;
use crate::router::{History, MAX_REDIRECTS, Route};
use crate::session::{SessionContext, SessionIdentity, fetch_identity};

/// Outcome of a finished navigation.
#[derive(Debug, Clone)]
pub struct Screen {
    pub location: String,
    /// Each redirect target taken, in order.
    pub redirects: Vec<String>,
    pub route: Route,
    /// None for unguarded pages (not found).
    pub view: Option<GuardView>,
    pub identity: Option<SessionIdentity>,
    /// Navigation entries and the active index, when the view includes them.
    pub menu: Option<(Vec<MenuItem>, Option<usize>)>,
}

impl Screen {
    /// True when the page body is shown (guard allowed it, or no guard).
    pub fn renders_page(&self) -> bool {
        matches!(self.view, None | Some(GuardView::Page { .. }))
    }
}

pub struct Navigator {
    ctx: SessionContext,
    api: ApiClient,
    history: History,
}

impl Navigator {
    pub fn new(ctx: SessionContext, api: ApiClient) -> Self {
        Self {
            ctx,
            api,
            history: History::new("/"),
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Pushes `path` and settles it.
    ///
    /// # Errors
    /// Returns an error if the redirect chain does not settle.
    pub async fn visit(&mut self, path: &str) -> Result<Screen> {
        self.history.push(path);
        self.settle().await
    }

    /// Logs out and lands on the login page, replacing the current entry.
    ///
    /// # Errors
    /// Returns an error if the redirect chain does not settle.
    pub async fn logout(&mut self) -> Result<Screen> {
        let to = nav::logout(&mut self.ctx);
        self.history.replace(to);
        self.settle().await
    }

    async fn settle(&mut self) -> Result<Screen> {
        let mut redirects = Vec::new();

        loop {
            let route = Route::parse(self.history.current());
            let Some(policy) = route.policy() else {
                tracing::debug!(path = %route, "unguarded route");
                return Ok(self.screen(route, None, redirects));
            };

            let guard = RouteGuard::new(policy);
            let outcome = guard.mount(&mut self.ctx);

            if let Some(redirect) = outcome.redirect {
                if redirects.len() >= MAX_REDIRECTS {
                    bail!(
                        "Too many redirects while navigating to {}",
                        self.history.current()
                    );
                }
                if redirect.replace {
                    self.history.replace(&redirect.to);
                } else {
                    self.history.push(&redirect.to);
                }
                redirects.push(redirect.to);
                continue;
            }

            if let Some(ticket) = outcome.resolve
                && let Some(credential) = self.ctx.credential()
            {
                let result = fetch_identity(&self.api, &credential.token, &ticket).await;
                self.ctx.store.complete(ticket.epoch, result);
            }

            let view = guard.view(&self.ctx);
            return Ok(self.screen(route, Some(view), redirects));
        }
    }

    fn screen(&self, route: Route, view: Option<GuardView>, redirects: Vec<String>) -> Screen {
        let identity = self.ctx.store.identity().cloned();
        let menu = match view {
            Some(GuardView::Page { navigation: true }) => {
                let role = menu_role(identity.as_ref(), &self.ctx);
                let items = nav::menu(role).to_vec();
                let active = nav::active_index(&items, self.history.current());
                Some((items, active))
            }
            _ => None,
        };

        Screen {
            location: self.history.current().to_string(),
            redirects,
            route,
            view,
            identity,
            menu,
        }
    }
}

/// Role driving the menu: the resolved identity's, else the credential's.
pub fn menu_role(identity: Option<&SessionIdentity>, ctx: &SessionContext) -> Option<Role> {
    identity
        .map(|i| i.role)
        .or_else(|| ctx.credential().map(|c| c.role))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::credentials::CredentialHolder;

    fn navigator(server: &MockServer, role: Option<Role>) -> Navigator {
        let holder = CredentialHolder::memory();
        if let Some(role) = role {
            holder.set("abc", role, 7).unwrap();
        }
        let api = ApiClient::new(server.uri(), None).unwrap();
        Navigator::new(SessionContext::new(holder), api)
    }

    async fn mount_profile(server: &MockServer, role: &str, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/users/profile"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"_id": "u1", "name": "Ada", "email": "ada@b.co", "role": role}
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_authenticated_visit_to_landing_redirects_to_dashboard() {
        let server = MockServer::start().await;
        mount_profile(&server, "recruiter", 1).await;
        let mut nav = navigator(&server, Some(Role::Recruiter));

        let screen = nav.visit("/").await.unwrap();

        assert_eq!(screen.location, "/recruiter/dashboard");
        assert_eq!(screen.redirects, ["/recruiter/dashboard"]);
        assert_eq!(screen.view, Some(GuardView::Page { navigation: true }));
        assert_eq!(screen.identity.unwrap().name, "Ada");
        // Landing page was replaced, not stacked.
        assert_eq!(nav.history().len(), 2);
    }

    #[tokio::test]
    async fn test_anonymous_visit_to_private_page_redirects_to_login() {
        let server = MockServer::start().await;
        mount_profile(&server, "recruiter", 0).await;
        let mut nav = navigator(&server, None);

        let screen = nav.visit("/recruiter/jobs").await.unwrap();

        assert_eq!(screen.location, "/login");
        assert_eq!(screen.route, Route::Login);
        assert_eq!(screen.view, Some(GuardView::Page { navigation: false }));
        assert!(screen.menu.is_none());
    }

    #[tokio::test]
    async fn test_failed_profile_still_renders_shell_and_menu() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profile"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        let mut nav = navigator(&server, Some(Role::JobSeeker));

        let screen = nav.visit("/job-seeker/dashboard").await.unwrap();

        assert!(screen.renders_page());
        assert!(screen.identity.is_none());
        let (items, active) = screen.menu.unwrap();
        assert_eq!(items[1].label, "Browse Jobs");
        assert_eq!(active, Some(0));
        assert!(nav.context().store.last_error().is_some());
    }

    #[tokio::test]
    async fn test_identity_fetched_once_across_private_navigations() {
        let server = MockServer::start().await;
        mount_profile(&server, "recruiter", 1).await;
        let mut nav = navigator(&server, Some(Role::Recruiter));

        nav.visit("/recruiter/dashboard").await.unwrap();
        let screen = nav.visit("/recruiter/jobs/edit/9").await.unwrap();

        assert_eq!(screen.route.title(), "Edit Job");
        assert!(screen.identity.is_some());
    }

    #[tokio::test]
    async fn test_logout_then_private_visit_returns_to_login() {
        let server = MockServer::start().await;
        mount_profile(&server, "recruiter", 1).await;
        let mut nav = navigator(&server, Some(Role::Recruiter));
        nav.visit("/recruiter/applications").await.unwrap();

        let screen = nav.logout().await.unwrap();
        assert_eq!(screen.location, "/login");
        assert!(nav.context().credential().is_none());
        assert!(screen.identity.is_none());

        let screen = nav.visit("/recruiter/dashboard").await.unwrap();
        assert_eq!(screen.location, "/login");

        let again = nav.logout().await.unwrap();
        assert_eq!(again.location, "/login");
    }

    #[tokio::test]
    async fn test_unknown_path_renders_not_found_without_guard() {
        let server = MockServer::start().await;
        let mut nav = navigator(&server, None);

        let screen = nav.visit("/somewhere/else").await.unwrap();

        assert_eq!(screen.location, "/somewhere/else");
        assert!(screen.view.is_none());
        assert!(screen.renders_page());
    }

    #[tokio::test]
    async fn test_other_namespace_is_reachable_with_any_credential() {
        let server = MockServer::start().await;
        mount_profile(&server, "job_seeker", 1).await;
        let mut nav = navigator(&server, Some(Role::JobSeeker));

        let screen = nav.visit("/recruiter/profile").await.unwrap();

        assert_eq!(screen.location, "/recruiter/profile");
        // Menu follows the user's role, not the namespace.
        let (items, active) = screen.menu.unwrap();
        assert_eq!(items[0].path, "/job-seeker/dashboard");
        assert_eq!(active, None);
    }
}
