//! Modal overlays.
//!
//! Overlays take over keyboard input while open. Each one owns its state, key
//! handler and render function.
//!
//! - `nav_menu.rs`: role menu with logout (private pages only)
//! - `goto.rs`: address bar for typing a path
//! - `render_utils.rs`: shared container/input/hint rendering

pub mod goto;
pub mod nav_menu;
pub mod render_utils;

use crossterm::event::KeyEvent;
pub use goto::GotoState;
pub use nav_menu::NavMenuState;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::mutations::StateMutation;
use crate::state::TuiState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayRequest {
    NavMenu,
    Goto,
}

#[derive(Debug)]
pub enum OverlayTransition {
    Stay,
    Close,
    Open(OverlayRequest),
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub mutations: Vec<StateMutation>,
}

impl OverlayUpdate {
    fn new(transition: OverlayTransition) -> Self {
        Self {
            transition,
            mutations: Vec::new(),
        }
    }

    pub fn stay() -> Self {
        Self::new(OverlayTransition::Stay)
    }

    pub fn close() -> Self {
        Self::new(OverlayTransition::Close)
    }

    pub fn open(request: OverlayRequest) -> Self {
        Self::new(OverlayTransition::Open(request))
    }

    #[must_use]
    pub fn with_mutations(mut self, mutations: Vec<StateMutation>) -> Self {
        self.mutations = mutations;
        self
    }
}

#[derive(Debug)]
pub enum Overlay {
    NavMenu(NavMenuState),
    Goto(GotoState),
}

impl Overlay {
    /// Builds the overlay for `request`, or None if it cannot open here.
    pub fn open(request: OverlayRequest, tui: &TuiState) -> Option<Self> {
        match request {
            OverlayRequest::NavMenu => NavMenuState::open(tui).map(Overlay::NavMenu),
            OverlayRequest::Goto => Some(Overlay::Goto(GotoState::open(tui.location()))),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, tui: &TuiState) {
        match self {
            Overlay::NavMenu(m) => m.render(frame, area, tui),
            Overlay::Goto(g) => g.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::NavMenu(m) => m.handle_key(tui, key),
            Overlay::Goto(g) => g.handle_key(key),
        }
    }
}
