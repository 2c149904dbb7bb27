//! Address bar overlay.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use super::OverlayUpdate;
use super::render_utils::{InputHint, OverlayConfig, render_input_line, render_overlay};
use crate::mutations::StateMutation;

#[derive(Debug, Clone)]
pub struct GotoState {
    pub input: String,
    pub error: Option<String>,
}

impl GotoState {
    /// Starts pre-filled with the current location.
    pub fn open(location: &str) -> Self {
        Self {
            input: location.to_string(),
            error: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if !matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Char('u') if ctrl => {
                self.input.clear();
                OverlayUpdate::stay()
            }
            KeyCode::Enter => {
                let path = self.input.trim();
                if path.is_empty() {
                    self.error = Some("Path cannot be empty".to_string());
                    OverlayUpdate::stay()
                } else {
                    OverlayUpdate::close().with_mutations(vec![StateMutation::push(path)])
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                OverlayUpdate::stay()
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                OverlayUpdate::stay()
            }
            _ => OverlayUpdate::stay(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let hints = [
            InputHint::new("Enter", "go"),
            InputHint::new("Ctrl+U", "clear"),
            InputHint::new("Esc", "cancel"),
        ];
        let layout = render_overlay(
            frame,
            area,
            &OverlayConfig {
                title: "Go to",
                border_color: Color::Yellow,
                width: 60,
                height: 5,
                hints: &hints,
            },
        );

        let input_area = Rect::new(layout.body.x, layout.body.y, layout.body.width, 1);
        render_input_line(frame, input_area, "> ", &self.input, Color::Yellow);

        if let Some(error) = &self.error {
            let error_area = Rect::new(layout.body.x, layout.body.y + 1, layout.body.width, 1);
            frame.render_widget(
                Paragraph::new(Line::styled(error.as_str(), Style::default().fg(Color::Red))),
                error_area,
            );
        }
    }
}
