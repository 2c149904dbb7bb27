//! Role-specific navigation menu.

use crate::role::Role;
use crate::router::LOGIN_PATH;
use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
}

const RECRUITER_MENU: [MenuItem; 4] = [
    MenuItem {
        label: "Dashboard",
        path: "/recruiter/dashboard",
    },
    MenuItem {
        label: "My Jobs",
        path: "/recruiter/jobs",
    },
    MenuItem {
        label: "Applications",
        path: "/recruiter/applications",
    },
    MenuItem {
        label: "Profile",
        path: "/recruiter/profile",
    },
];

const JOB_SEEKER_MENU: [MenuItem; 4] = [
    MenuItem {
        label: "Dashboard",
        path: "/job-seeker/dashboard",
    },
    MenuItem {
        label: "Browse Jobs",
        path: "/job-seeker/jobs",
    },
    MenuItem {
        label: "Applications",
        path: "/job-seeker/applications",
    },
    MenuItem {
        label: "Profile",
        path: "/job-seeker/profile",
    },
];

pub const LOGOUT_LABEL: &str = "Logout";

/// Menu entries for a role. Unknown role falls back to the job seeker menu.
pub fn menu(role: Option<Role>) -> &'static [MenuItem] {
    match role {
        Some(Role::Recruiter) => &RECRUITER_MENU,
        Some(Role::JobSeeker) | None => &JOB_SEEKER_MENU,
    }
}

/// Index of the entry matching `current_path`, if any.
pub fn active_index(items: &[MenuItem], current_path: &str) -> Option<usize> {
    items.iter().position(|item| item.path == current_path)
}

/// Activated menu row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Navigate(&'static str),
    Logout,
}

/// Rows as presented: the role's entries followed by logout.
pub fn actions(role: Option<Role>) -> Vec<(&'static str, MenuAction)> {
    menu(role)
        .iter()
        .map(|item| (item.label, MenuAction::Navigate(item.path)))
        .chain(std::iter::once((LOGOUT_LABEL, MenuAction::Logout)))
        .collect()
}

/// Clears the session and returns where to go next (replacing history).
///
/// The credential is removed before the caller navigates, so the login page's
/// guard never sees a stale credential.
pub fn logout(ctx: &mut SessionContext) -> &'static str {
    ctx.logout();
    tracing::info!("logged out");
    LOGIN_PATH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialHolder;

    #[test]
    fn test_menus_have_four_entries_in_order() {
        let labels: Vec<_> = menu(Some(Role::Recruiter)).iter().map(|i| i.label).collect();
        assert_eq!(labels, ["Dashboard", "My Jobs", "Applications", "Profile"]);

        let labels: Vec<_> = menu(Some(Role::JobSeeker)).iter().map(|i| i.label).collect();
        assert_eq!(labels, ["Dashboard", "Browse Jobs", "Applications", "Profile"]);
    }

    #[test]
    fn test_unknown_role_falls_back_to_job_seeker_menu() {
        assert_eq!(menu(None), menu(Some(Role::JobSeeker)));
    }

    #[test]
    fn test_active_entry_matches_current_path() {
        let items = menu(Some(Role::Recruiter));
        assert_eq!(active_index(items, "/recruiter/applications"), Some(2));
        assert_eq!(active_index(items, "/recruiter/jobs/add"), None);
    }

    #[test]
    fn test_logout_is_always_last() {
        let rows = actions(Some(Role::Recruiter));
        assert_eq!(rows.len(), 5);
        assert_eq!(rows.last().map(|r| &r.1), Some(&MenuAction::Logout));
    }

    #[test]
    fn test_logout_clears_credential_before_returning_login() {
        let mut ctx = SessionContext::new(CredentialHolder::memory());
        ctx.credentials.set("abc", Role::Recruiter, 7).unwrap();

        assert_eq!(logout(&mut ctx), "/login");
        assert!(ctx.credential().is_none());
        assert_eq!(logout(&mut ctx), "/login");
    }
}
