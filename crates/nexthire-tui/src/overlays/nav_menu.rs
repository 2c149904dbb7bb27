//! Navigation menu overlay: the role's pages followed by logout.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use nexthire_core::nav::{self, MenuAction};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};

use super::{OverlayRequest, OverlayUpdate};
use super::render_utils::{InputHint, OverlayConfig, render_overlay};
use crate::mutations::StateMutation;
use crate::state::TuiState;

#[derive(Debug, Clone)]
pub struct NavMenuState {
    pub selected: usize,
}

impl NavMenuState {
    /// Opens on the active entry. Only available where the page shows navigation.
    pub fn open(tui: &TuiState) -> Option<Self> {
        if !tui.shows_navigation() {
            return None;
        }
        let items = nav::menu(tui.menu_role());
        let selected = nav::active_index(items, tui.location()).unwrap_or(0);
        Some(Self { selected })
    }

    pub fn handle_key(&mut self, tui: &TuiState, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let rows = nav::actions(tui.menu_role());

        match key.code {
            KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                OverlayUpdate::stay()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < rows.len() {
                    self.selected += 1;
                }
                OverlayUpdate::stay()
            }
            KeyCode::Char('g') => OverlayUpdate::open(OverlayRequest::Goto),
            KeyCode::Enter => {
                let mutation = match rows.get(self.selected).map(|(_, action)| action) {
                    Some(MenuAction::Navigate(path)) => StateMutation::push(*path),
                    Some(MenuAction::Logout) => StateMutation::Logout,
                    None => return OverlayUpdate::close(),
                };
                OverlayUpdate::close().with_mutations(vec![mutation])
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, tui: &TuiState) {
        let rows = nav::actions(tui.menu_role());
        let hints = [
            InputHint::new("↑↓", "select"),
            InputHint::new("Enter", "open"),
            InputHint::new("g", "go to"),
            InputHint::new("Esc", "close"),
        ];
        let height = u16::try_from(rows.len()).unwrap_or(u16::MAX).saturating_add(3);
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: "Menu",
                border_color: Color::Cyan,
                width: 44,
                height,
                hints: &hints,
            },
        );

        let location = tui.location();
        let items: Vec<ListItem> = rows
            .iter()
            .map(|(label, action)| {
                let active = matches!(action, MenuAction::Navigate(path) if *path == location);
                let marker = if active { "● " } else { "  " };
                let style = match action {
                    MenuAction::Logout => Style::default().fg(Color::Red),
                    MenuAction::Navigate(_) if active => Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                    MenuAction::Navigate(_) => Style::default(),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Cyan)),
                    Span::styled(*label, style),
                ]))
            })
            .collect();

        let list = List::new(items).highlight_style(Style::default().bg(Color::DarkGray));
        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));
        frame.render_stateful_widget(list, layout.body, &mut list_state);
    }
}
