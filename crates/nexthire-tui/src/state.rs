//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── session: SessionContext  (credential holder + identity store)
//! │   ├── history: History         (visited paths)
//! │   ├── route / guard            (current page and its access policy)
//! │   ├── form: Option<FormState>  (login/register pages)
//! │   ├── watcher: CredentialWatcher
//! │   └── notice: Option<Notice>   (transient notification)
//! └── overlay: Option<Overlay>
//! ```
//!
//! Overlay handlers get `&mut Overlay` and `&TuiState` at the same time.

use std::time::{Duration, Instant};

use nexthire_core::access::{GuardView, RouteGuard};
use nexthire_core::config::Config;
use nexthire_core::credentials::{CredentialHolder, CredentialWatcher};
use nexthire_core::role::Role;
use nexthire_core::router::{History, Route};
use nexthire_core::session::{SessionContext, SessionIdentity};

use crate::form::FormState;
use crate::overlays::Overlay;

/// How long a notification stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub shown_at: Instant,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= NOTICE_TTL
    }
}

pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(config: Config, credentials: CredentialHolder) -> Self {
        Self {
            tui: TuiState::new(config, credentials),
            overlay: None,
        }
    }
}

pub struct TuiState {
    pub config: Config,
    pub session: SessionContext,
    pub history: History,
    pub route: Route,
    /// None for unguarded pages.
    pub guard: Option<RouteGuard>,
    pub form: Option<FormState>,
    pub watcher: CredentialWatcher,
    pub notice: Option<Notice>,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl TuiState {
    pub fn new(config: Config, credentials: CredentialHolder) -> Self {
        let watcher = CredentialWatcher::new(&credentials);
        Self {
            config,
            session: SessionContext::new(credentials),
            history: History::new("/"),
            route: Route::Home,
            guard: None,
            form: None,
            watcher,
            notice: None,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    pub fn location(&self) -> &str {
        self.history.current()
    }

    /// None for unguarded pages, which always render.
    pub fn view(&self) -> Option<GuardView> {
        self.guard.map(|guard| guard.view(&self.session))
    }

    pub fn shows_navigation(&self) -> bool {
        matches!(self.view(), Some(GuardView::Page { navigation: true }))
    }

    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.session.store.identity()
    }

    /// Role for the menu: the identity's, else the stored credential's.
    pub fn menu_role(&self) -> Option<Role> {
        nexthire_core::navigator::menu_role(self.identity(), &self.session)
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }
}
