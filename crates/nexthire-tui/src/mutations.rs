//! State mutations requested by overlays and pages.
//!
//! Overlay key handlers only see `&TuiState`; they describe the change here
//! and the reducer applies it.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateMutation {
    Navigate { path: String, replace: bool },
    Back,
    /// Clear the session, then go to the login page.
    Logout,
}

impl StateMutation {
    pub fn push(path: impl Into<String>) -> Self {
        StateMutation::Navigate {
            path: path.into(),
            replace: false,
        }
    }
}
