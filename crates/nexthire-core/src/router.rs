//! Path routing table and navigation history.

use std::fmt;

use crate::access::AccessPolicy;
use crate::role::Role;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";

/// Longest redirect chain a host follows for one navigation.
pub const MAX_REDIRECTS: usize = 8;

/// A resolved page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard(Role),
    /// Recruiter: own postings. Job seeker: open jobs.
    Jobs(Role),
    AddJob,
    EditJob { job_id: String },
    JobInfo { job_id: String },
    Applications(Role),
    Profile(Role),
    NotFound { path: String },
}

impl Route {
    /// Resolves a path. Query strings, fragments and trailing slashes are ignored.
    pub fn parse(raw: &str) -> Self {
        let path = normalize(raw);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            [namespace, rest @ ..] => match Role::from_path_segment(namespace) {
                Some(role) => Self::parse_private(role, rest).unwrap_or(Route::NotFound { path }),
                None => Route::NotFound { path },
            },
        }
    }

    fn parse_private(role: Role, rest: &[&str]) -> Option<Self> {
        let route = match (role, rest) {
            (_, ["dashboard"]) => Route::Dashboard(role),
            (_, ["jobs"]) => Route::Jobs(role),
            (_, ["applications"]) => Route::Applications(role),
            (_, ["profile"]) => Route::Profile(role),
            (Role::Recruiter, ["jobs", "add"]) => Route::AddJob,
            (Role::Recruiter, ["jobs", "edit", id]) => Route::EditJob {
                job_id: (*id).to_string(),
            },
            (Role::JobSeeker, ["jobs", id]) => Route::JobInfo {
                job_id: (*id).to_string(),
            },
            _ => return None,
        };
        Some(route)
    }

    /// Canonical path of this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => HOME_PATH.to_string(),
            Route::Login => LOGIN_PATH.to_string(),
            Route::Register => REGISTER_PATH.to_string(),
            Route::Dashboard(role) => role.dashboard_path(),
            Route::Jobs(role) => format!("/{}/jobs", role.path_segment()),
            Route::AddJob => "/recruiter/jobs/add".to_string(),
            Route::EditJob { job_id } => format!("/recruiter/jobs/edit/{job_id}"),
            Route::JobInfo { job_id } => format!("/job-seeker/jobs/{job_id}"),
            Route::Applications(role) => format!("/{}/applications", role.path_segment()),
            Route::Profile(role) => format!("/{}/profile", role.path_segment()),
            Route::NotFound { path } => path.clone(),
        }
    }

    /// Guard wrapping this page. None for pages rendered unguarded.
    pub fn policy(&self) -> Option<AccessPolicy> {
        match self {
            Route::Home | Route::Login | Route::Register => Some(AccessPolicy::Public),
            Route::NotFound { .. } => None,
            _ => Some(AccessPolicy::Private),
        }
    }

    /// Role namespace of a private route.
    pub fn namespace(&self) -> Option<Role> {
        match self {
            Route::Dashboard(role)
            | Route::Jobs(role)
            | Route::Applications(role)
            | Route::Profile(role) => Some(*role),
            Route::AddJob | Route::EditJob { .. } => Some(Role::Recruiter),
            Route::JobInfo { .. } => Some(Role::JobSeeker),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Next Hire",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Dashboard(_) => "Dashboard",
            Route::Jobs(Role::Recruiter) => "My Jobs",
            Route::Jobs(Role::JobSeeker) => "Browse Jobs",
            Route::AddJob => "Add Job",
            Route::EditJob { .. } => "Edit Job",
            Route::JobInfo { .. } => "Job Details",
            Route::Applications(_) => "Applications",
            Route::Profile(_) => "Profile",
            Route::NotFound { .. } => "Page Not Found",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Strips query/fragment and trailing slashes; guarantees a leading slash.
pub fn normalize(raw: &str) -> String {
    let path = raw
        .trim()
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// One row of the routing table.
#[derive(Debug, Clone, Copy)]
pub struct RouteEntry {
    pub pattern: &'static str,
    pub policy: AccessPolicy,
    pub title: &'static str,
}

const fn entry(pattern: &'static str, policy: AccessPolicy, title: &'static str) -> RouteEntry {
    RouteEntry {
        pattern,
        policy,
        title,
    }
}

const ROUTES: &[RouteEntry] = {
    use AccessPolicy::{Private, Public};
    &[
        entry("/", Public, "Next Hire"),
        entry("/login", Public, "Login"),
        entry("/register", Public, "Register"),
        entry("/recruiter/dashboard", Private, "Dashboard"),
        entry("/recruiter/jobs", Private, "My Jobs"),
        entry("/recruiter/jobs/add", Private, "Add Job"),
        entry("/recruiter/jobs/edit/:jobId", Private, "Edit Job"),
        entry("/recruiter/applications", Private, "Applications"),
        entry("/recruiter/profile", Private, "Profile"),
        entry("/job-seeker/dashboard", Private, "Dashboard"),
        entry("/job-seeker/jobs", Private, "Browse Jobs"),
        entry("/job-seeker/jobs/:jobId", Private, "Job Details"),
        entry("/job-seeker/applications", Private, "Applications"),
        entry("/job-seeker/profile", Private, "Profile"),
    ]
};

/// Routing table in declaration order.
pub fn table() -> &'static [RouteEntry] {
    ROUTES
}

/// Stack of visited paths.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new(initial: &str) -> Self {
        Self {
            entries: vec![normalize(initial)],
        }
    }

    pub fn current(&self) -> &str {
        self.entries.last().map_or(HOME_PATH, String::as_str)
    }

    pub fn push(&mut self, path: &str) {
        self.entries.push(normalize(path));
    }

    /// Replaces the current entry, so going back skips it.
    pub fn replace(&mut self, path: &str) {
        let path = normalize(path);
        match self.entries.last_mut() {
            Some(last) => *last = path,
            None => self.entries.push(path),
        }
    }

    /// Pops the current entry. Returns the new current path, or None at the start.
    pub fn back(&mut self) -> Option<&str> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop();
        Some(self.current())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_public_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/register/"), Route::Register);
        assert_eq!(Route::parse("/login?next=/x"), Route::Login);
    }

    #[test]
    fn test_parse_private_routes() {
        assert_eq!(
            Route::parse("/recruiter/dashboard"),
            Route::Dashboard(Role::Recruiter)
        );
        assert_eq!(
            Route::parse("/job-seeker/jobs"),
            Route::Jobs(Role::JobSeeker)
        );
        assert_eq!(Route::parse("/recruiter/jobs/add"), Route::AddJob);
        assert_eq!(
            Route::parse("/recruiter/jobs/edit/42"),
            Route::EditJob {
                job_id: "42".into()
            }
        );
        assert_eq!(
            Route::parse("/job-seeker/jobs/42"),
            Route::JobInfo {
                job_id: "42".into()
            }
        );
        assert_eq!(
            Route::parse("/job-seeker/profile"),
            Route::Profile(Role::JobSeeker)
        );
    }

    #[test]
    fn test_job_subpaths_follow_their_own_namespace_patterns() {
        assert_eq!(
            Route::parse("/job-seeker/jobs/add"),
            Route::JobInfo {
                job_id: "add".into()
            }
        );
        assert!(matches!(
            Route::parse("/recruiter/jobs/42"),
            Route::NotFound { .. }
        ));
        assert!(matches!(
            Route::parse("/job_seeker/dashboard"),
            Route::NotFound { .. }
        ));
    }

    #[test]
    fn test_path_roundtrips_for_table_entries() {
        for entry in table() {
            let concrete = entry.pattern.replace(":jobId", "7");
            let route = Route::parse(&concrete);
            assert_eq!(route.path(), concrete);
            assert_eq!(route.policy(), Some(entry.policy));
            assert_eq!(route.title(), entry.title);
        }
    }

    #[test]
    fn test_unknown_path_is_unguarded() {
        let route = Route::parse("/nowhere");
        assert_eq!(route.policy(), None);
        assert_eq!(route.path(), "/nowhere");
    }

    #[test]
    fn test_history_replace_skips_entry_on_back() {
        let mut history = History::new("/");
        history.push("/login");
        history.replace("/recruiter/dashboard");

        assert_eq!(history.current(), "/recruiter/dashboard");
        assert_eq!(history.back(), Some("/"));
        assert_eq!(history.back(), None);
        assert_eq!(history.len(), 1);
    }
}
