//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use nexthire_core::access::RouteGuard;
use nexthire_core::forms::{LOGIN_FAILED, LOGIN_SUCCESS, REGISTER_FAILED, REGISTER_SUCCESS};
use nexthire_core::nav;
use nexthire_core::router::{HOME_PATH, LOGIN_PATH, MAX_REDIRECTS, REGISTER_PATH, Route};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::form::{FormKind, FormState};
use crate::mutations::StateMutation;
use crate::overlays::{Overlay, OverlayRequest, OverlayTransition};
use crate::state::{AppState, Notice, TuiState};

pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            if app.tui.notice.as_ref().is_some_and(Notice::is_expired) {
                app.tui.notice = None;
            }
            vec![]
        }
        UiEvent::Terminal(Event::Key(key)) if key.kind == KeyEventKind::Press => {
            handle_key(app, key)
        }
        UiEvent::Terminal(_) => vec![],
        UiEvent::IdentityResolved { epoch, result } => {
            app.tui.session.store.complete(epoch, result);
            vec![]
        }
        UiEvent::LoginFinished { result } => {
            if let Some(form) = app.tui.form.as_mut() {
                form.submitting = false;
            }
            match result {
                Ok(role) => {
                    app.tui.watcher.sync(&app.tui.session.credentials);
                    app.tui.notify(Notice::success(LOGIN_SUCCESS));
                    navigate(&mut app.tui, &role.dashboard_path(), false)
                }
                Err(e) => {
                    app.tui.notify(Notice::error(e.user_message(LOGIN_FAILED)));
                    vec![]
                }
            }
        }
        UiEvent::RegisterFinished { result } => {
            if let Some(form) = app.tui.form.as_mut() {
                form.submitting = false;
            }
            match result {
                Ok(()) => {
                    app.tui.notify(Notice::success(REGISTER_SUCCESS));
                    navigate(&mut app.tui, LOGIN_PATH, false)
                }
                Err(e) => {
                    app.tui.notify(Notice::error(e.user_message(REGISTER_FAILED)));
                    vec![]
                }
            }
        }
        UiEvent::CredentialChanged => {
            tracing::info!(path = app.tui.location(), "stored credential changed, remounting");
            app.overlay = None;
            app.tui.session.store.reset();
            settle(&mut app.tui)
        }
    }
}

/// Enters the first page.
pub fn start(app: &mut AppState, path: &str) -> Vec<UiEffect> {
    app.tui.history.replace(path);
    settle(&mut app.tui)
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') && app.overlay.is_none() {
        return vec![UiEffect::Quit];
    }

    if let Some(overlay) = app.overlay.as_mut() {
        let update = overlay.handle_key(&app.tui, key);
        match update.transition {
            OverlayTransition::Stay => {}
            OverlayTransition::Close => app.overlay = None,
            OverlayTransition::Open(request) => app.overlay = Overlay::open(request, &app.tui),
        }
        return apply_mutations(app, update.mutations);
    }

    if let Some(form) = app.tui.form.as_mut() {
        let update = form.handle_key(key);
        let mut effects = update.effects;
        effects.extend(apply_mutations(app, update.mutations));
        return effects;
    }

    match key.code {
        KeyCode::Char('q') => vec![UiEffect::Quit],
        KeyCode::Char('g') => {
            open_overlay(app, OverlayRequest::Goto);
            vec![]
        }
        KeyCode::Char('m') => {
            open_overlay(app, OverlayRequest::NavMenu);
            vec![]
        }
        KeyCode::Char('b') | KeyCode::Backspace => apply_mutations(app, vec![StateMutation::Back]),
        KeyCode::Char('l') if app.tui.route == Route::Home => navigate(&mut app.tui, LOGIN_PATH, false),
        KeyCode::Char('r') if app.tui.route == Route::Home => {
            navigate(&mut app.tui, REGISTER_PATH, false)
        }
        KeyCode::Char('h') if matches!(app.tui.route, Route::NotFound { .. }) => {
            navigate(&mut app.tui, HOME_PATH, false)
        }
        _ => vec![],
    }
}

fn open_overlay(app: &mut AppState, request: OverlayRequest) {
    app.overlay = Overlay::open(request, &app.tui);
}

fn apply_mutations(app: &mut AppState, mutations: Vec<StateMutation>) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    for mutation in mutations {
        effects.extend(apply_mutation(app, mutation));
    }
    effects
}

fn apply_mutation(app: &mut AppState, mutation: StateMutation) -> Vec<UiEffect> {
    match mutation {
        StateMutation::Navigate { path, replace } => navigate(&mut app.tui, &path, replace),
        StateMutation::Back => {
            if app.tui.history.back().is_some() {
                settle(&mut app.tui)
            } else {
                vec![]
            }
        }
        StateMutation::Logout => {
            app.overlay = None;
            let to = nav::logout(&mut app.tui.session);
            app.tui.watcher.sync(&app.tui.session.credentials);
            navigate(&mut app.tui, to, true)
        }
    }
}

/// Moves to `path` and evaluates its guard.
pub fn navigate(tui: &mut TuiState, path: &str, replace: bool) -> Vec<UiEffect> {
    if replace {
        tui.history.replace(path);
    } else {
        tui.history.push(path);
    }
    settle(tui)
}

/// Mounts the guard of the current location, following redirects.
fn settle(tui: &mut TuiState) -> Vec<UiEffect> {
    let mut effects = Vec::new();

    for _ in 0..=MAX_REDIRECTS {
        let route = Route::parse(tui.location());
        let Some(policy) = route.policy() else {
            enter(tui, route, None);
            return effects;
        };

        let guard = RouteGuard::new(policy);
        let outcome = guard.mount(&mut tui.session);

        if let Some(redirect) = outcome.redirect {
            if redirect.replace {
                tui.history.replace(&redirect.to);
            } else {
                tui.history.push(&redirect.to);
            }
            continue;
        }

        if let Some(ticket) = outcome.resolve {
            match tui.session.credential() {
                Some(credential) => effects.push(UiEffect::ResolveIdentity {
                    ticket,
                    token: credential.token,
                }),
                // Removed between the guard check and here.
                None => tui.session.store.reset(),
            }
        }

        enter(tui, route, Some(guard));
        return effects;
    }

    tracing::warn!(path = tui.location(), "redirect limit reached");
    tui.notify(Notice::error("Too many redirects"));
    effects
}

fn enter(tui: &mut TuiState, route: Route, guard: Option<RouteGuard>) {
    let kind = match route {
        Route::Login => Some(FormKind::Login),
        Route::Register => Some(FormKind::Register),
        _ => None,
    };
    tui.form = match (kind, tui.form.take()) {
        (Some(kind), Some(form)) if form.kind == kind => Some(form),
        (Some(FormKind::Login), _) => Some(FormState::login()),
        (Some(FormKind::Register), _) => Some(FormState::register()),
        (None, _) => None,
    };
    tracing::debug!(path = %route, "entered route");
    tui.route = route;
    tui.guard = guard;
}
