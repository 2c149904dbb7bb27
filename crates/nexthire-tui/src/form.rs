//! Login and registration form state and key handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use nexthire_core::api::RegisterRequest;
use nexthire_core::forms::{self, LoginInput};
use nexthire_core::role::Role;
use nexthire_core::router::{LOGIN_PATH, REGISTER_PATH};

use crate::effects::UiEffect;
use crate::mutations::StateMutation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Register,
}

#[derive(Debug, Clone)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
    pub secret: bool,
}

impl TextField {
    fn new(label: &'static str, secret: bool) -> Self {
        Self {
            label,
            value: String::new(),
            secret,
        }
    }
}

/// Result of a key press on a form.
#[derive(Debug, Default)]
pub struct FormUpdate {
    pub effects: Vec<UiEffect>,
    pub mutations: Vec<StateMutation>,
}

impl FormUpdate {
    fn effect(effect: UiEffect) -> Self {
        Self {
            effects: vec![effect],
            mutations: Vec::new(),
        }
    }

    fn mutation(mutation: StateMutation) -> Self {
        Self {
            effects: Vec::new(),
            mutations: vec![mutation],
        }
    }
}

/// Text fields followed by a role selector. `focus == fields.len()` is the selector.
#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: FormKind,
    pub fields: Vec<TextField>,
    pub role: Role,
    pub focus: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

impl FormState {
    pub fn login() -> Self {
        Self::with_fields(
            FormKind::Login,
            vec![TextField::new("Email", false), TextField::new("Password", true)],
        )
    }

    pub fn register() -> Self {
        Self::with_fields(
            FormKind::Register,
            vec![
                TextField::new("Name", false),
                TextField::new("Email", false),
                TextField::new("Password", true),
            ],
        )
    }

    fn with_fields(kind: FormKind, fields: Vec<TextField>) -> Self {
        Self {
            kind,
            fields,
            role: Role::JobSeeker,
            focus: 0,
            error: None,
            submitting: false,
        }
    }

    pub fn role_focused(&self) -> bool {
        self.focus == self.fields.len()
    }

    fn value(&self, label: &str) -> String {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % (self.fields.len() + 1);
    }

    fn focus_prev(&mut self) {
        let count = self.fields.len() + 1;
        self.focus = (self.focus + count - 1) % count;
    }

    fn toggle_role(&mut self) {
        self.role = match self.role {
            Role::JobSeeker => Role::Recruiter,
            Role::Recruiter => Role::JobSeeker,
        };
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if !matches!(key.code, KeyCode::Enter) {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc => FormUpdate::mutation(StateMutation::Back),
            KeyCode::Char('r') if ctrl && self.kind == FormKind::Login => {
                FormUpdate::mutation(StateMutation::push(REGISTER_PATH))
            }
            KeyCode::Char('l') if ctrl && self.kind == FormKind::Register => {
                FormUpdate::mutation(StateMutation::push(LOGIN_PATH))
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                FormUpdate::default()
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                FormUpdate::default()
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if self.role_focused() => {
                self.toggle_role();
                FormUpdate::default()
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.value.pop();
                }
                FormUpdate::default()
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.value.push(c);
                }
                FormUpdate::default()
            }
            _ => FormUpdate::default(),
        }
    }

    fn submit(&mut self) -> FormUpdate {
        if self.submitting {
            return FormUpdate::default();
        }

        let effect = match self.kind {
            FormKind::Login => {
                let input = LoginInput {
                    email: self.value("Email"),
                    password: self.value("Password"),
                    role: self.role,
                };
                input
                    .validate()
                    .map(|()| UiEffect::SubmitLogin { input })
            }
            FormKind::Register => {
                let request = RegisterRequest {
                    name: self.value("Name").trim().to_string(),
                    email: self.value("Email").trim().to_string(),
                    password: self.value("Password"),
                    role: self.role,
                };
                forms::validate_register(&request)
                    .map(|()| UiEffect::SubmitRegister { request })
            }
        };

        match effect {
            Ok(effect) => {
                self.submitting = true;
                FormUpdate::effect(effect)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                FormUpdate::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut FormState, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_login_submit_emits_effect_with_selected_role() {
        let mut form = FormState::login();
        type_text(&mut form, "ada@b.co");
        form.handle_key(key(KeyCode::Tab));
        type_text(&mut form, "password1");
        form.handle_key(key(KeyCode::Tab));
        assert!(form.role_focused());
        form.handle_key(key(KeyCode::Right));

        let update = form.handle_key(key(KeyCode::Enter));

        assert!(form.submitting);
        match update.effects.as_slice() {
            [UiEffect::SubmitLogin { input }] => {
                assert_eq!(input.email, "ada@b.co");
                assert_eq!(input.role, Role::Recruiter);
            }
            other => panic!("unexpected effects: {other:?}"),
        }

        // A second Enter while submitting does nothing.
        assert!(form.handle_key(key(KeyCode::Enter)).effects.is_empty());
    }

    #[test]
    fn test_login_validation_error_blocks_submit() {
        let mut form = FormState::login();
        type_text(&mut form, "not-an-email");

        let update = form.handle_key(key(KeyCode::Enter));

        assert!(update.effects.is_empty());
        assert_eq!(form.error.as_deref(), Some("Invalid email address"));
        assert!(!form.submitting);
    }

    #[test]
    fn test_register_requires_name() {
        let mut form = FormState::register();
        form.handle_key(key(KeyCode::Tab));
        type_text(&mut form, "ada@b.co");

        form.handle_key(key(KeyCode::Enter));

        assert_eq!(form.error.as_deref(), Some("Name is required"));
    }

    #[test]
    fn test_space_types_into_text_fields() {
        let mut form = FormState::register();
        type_text(&mut form, "Ada L");
        assert_eq!(form.fields[0].value, "Ada L");
    }

    #[test]
    fn test_focus_wraps_around() {
        let mut form = FormState::login();
        form.handle_key(key(KeyCode::BackTab));
        assert!(form.role_focused());
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focus, 0);
    }
}
