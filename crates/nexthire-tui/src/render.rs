//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.

use nexthire_core::access::GuardView;
use nexthire_core::nav;
use nexthire_core::role::Role;
use nexthire_core::router::Route;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::common::{mask, truncate_end};
use crate::form::FormState;
use crate::state::{AppState, NoticeKind, TuiState};

const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];
/// Ticks per spinner frame.
const SPINNER_SPEED_DIVISOR: usize = 2;
const SIDEBAR_WIDTH: u16 = 26;

pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(state, frame, chunks[0]);
    render_body(state, frame, chunks[1]);
    render_notice(state, frame, chunks[2]);
    render_key_hints(app, frame, chunks[3]);

    if let Some(overlay) = &app.overlay {
        overlay.render(frame, chunks[1], state);
    }
}

fn render_header(state: &TuiState, frame: &mut Frame, area: Rect) {
    let who = match (state.identity(), state.session.credential()) {
        (Some(identity), _) => format!("{} · {}", identity.name, identity.role.label()),
        (None, Some(credential)) => format!("Signed in · {}", credential.role.label()),
        (None, None) => "Guest".to_string(),
    };

    let left = Line::from(vec![
        Span::styled(
            " Next Hire ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            truncate_end(state.location(), area.width.saturating_sub(40) as usize),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(left), area);
    frame.render_widget(
        Paragraph::new(Span::styled(format!("{who} "), Style::default().fg(Color::Cyan)))
            .alignment(Alignment::Right),
        area,
    );
}

fn render_body(state: &TuiState, frame: &mut Frame, area: Rect) {
    match state.view() {
        Some(GuardView::Nothing) => {}
        Some(GuardView::Waiting) => render_waiting(state, frame, area),
        Some(GuardView::Page { navigation: true }) => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
                .split(area);
            render_sidebar(state, frame, chunks[0]);
            render_page(state, frame, chunks[1]);
        }
        Some(GuardView::Page { navigation: false }) | None => render_page(state, frame, area),
    }
}

fn render_waiting(state: &TuiState, frame: &mut Frame, area: Rect) {
    let idx = (state.spinner_frame / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len();
    let line = Line::from(vec![
        Span::styled(SPINNER_FRAMES[idx], Style::default().fg(Color::Cyan)),
        Span::raw(" Loading your session…"),
    ]);
    let y = area.y + area.height / 2;
    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center),
        Rect::new(area.x, y, area.width, 1),
    );
}

fn render_sidebar(state: &TuiState, frame: &mut Frame, area: Rect) {
    let items = nav::menu(state.menu_role());
    let active = nav::active_index(items, state.location());

    let mut lines: Vec<Line> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if Some(i) == active {
                Line::from(Span::styled(
                    format!("● {}", item.label),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("  {}", item.label))
            }
        })
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        format!("  {}", nav::LOGOUT_LABEL),
        Style::default().fg(Color::Red),
    )));

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_page(state: &TuiState, frame: &mut Frame, area: Rect) {
    let inner = Rect::new(
        area.x + 2,
        area.y + 1,
        area.width.saturating_sub(4),
        area.height.saturating_sub(1),
    );

    let mut lines = vec![
        Line::from(Span::styled(
            state.route.title(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];

    if let Some(form) = &state.form {
        lines.extend(form_lines(form));
    } else {
        lines.extend(page_lines(state));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn page_lines(state: &TuiState) -> Vec<Line<'static>> {
    let muted = Style::default().fg(Color::DarkGray);
    let name = state.identity().map(|i| i.name.clone());

    match &state.route {
        Route::Home => vec![
            Line::raw("Find your next job, or your next hire."),
            Line::raw(""),
            Line::styled("l  Login    r  Register", muted),
        ],
        Route::Dashboard(_) => vec![Line::raw(match name {
            Some(name) => format!("Welcome back, {name}."),
            None => "Welcome back.".to_string(),
        })],
        Route::Jobs(Role::Recruiter) => vec![Line::raw("Job postings you manage.")],
        Route::Jobs(Role::JobSeeker) => vec![Line::raw("Open positions.")],
        Route::AddJob => vec![Line::raw("Post a new job.")],
        Route::EditJob { job_id } | Route::JobInfo { job_id } => {
            vec![Line::styled(format!("Job {job_id}"), muted)]
        }
        Route::Applications(Role::Recruiter) => {
            vec![Line::raw("Applications received for your jobs.")]
        }
        Route::Applications(Role::JobSeeker) => vec![Line::raw("Jobs you have applied to.")],
        Route::Profile(_) => profile_lines(state),
        Route::NotFound { path } => vec![
            Line::raw(format!("Nothing lives at {path}.")),
            Line::raw(""),
            Line::styled("h  Home", muted),
        ],
        Route::Login | Route::Register => vec![],
    }
}

fn profile_lines(state: &TuiState) -> Vec<Line<'static>> {
    let muted = Style::default().fg(Color::DarkGray);
    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<14}"), muted),
            Span::raw(value),
        ])
    };

    let Some(identity) = state.identity() else {
        return vec![Line::styled("Profile unavailable.", muted)];
    };

    let mut lines = vec![
        field("Name", identity.name.clone()),
        field("Email", identity.email.clone()),
        field("Role", identity.role.label().to_string()),
    ];
    if let Some(created) = identity.created_at {
        lines.push(field("Member since", created.format("%Y-%m-%d").to_string()));
    }
    lines
}

fn form_lines(form: &FormState) -> Vec<Line<'static>> {
    let focused = Style::default().fg(Color::Yellow);
    let muted = Style::default().fg(Color::DarkGray);

    let mut lines = Vec::new();
    for (i, field) in form.fields.iter().enumerate() {
        let is_focused = form.focus == i;
        let value = if field.secret {
            mask(&field.value)
        } else {
            field.value.clone()
        };
        let cursor = if is_focused { "█" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<10}", field.label),
                if is_focused { focused } else { muted },
            ),
            Span::raw(value),
            Span::styled(cursor, focused),
        ]));
    }

    let role_style = if form.role_focused() { focused } else { muted };
    let options: Vec<Span> = Role::all()
        .iter()
        .flat_map(|role| {
            let selected = *role == form.role;
            let marker = if selected { "(•) " } else { "( ) " };
            let style = if selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                muted
            };
            [Span::styled(marker, style), Span::styled(format!("{}   ", role.label()), style)]
        })
        .collect();
    let mut role_line = vec![Span::styled(format!("{:<10}", "Role"), role_style)];
    role_line.extend(options);
    lines.push(Line::from(role_line));
    lines.push(Line::raw(""));

    if form.submitting {
        lines.push(Line::styled("Submitting…", muted));
    } else if let Some(error) = &form.error {
        lines.push(Line::styled(error.clone(), Style::default().fg(Color::Red)));
    }
    lines
}

fn render_notice(state: &TuiState, frame: &mut Frame, area: Rect) {
    let Some(notice) = &state.notice else {
        return;
    };
    let color = match notice.kind {
        NoticeKind::Success => Color::Green,
        NoticeKind::Error => Color::Red,
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            truncate_end(&notice.message, area.width as usize),
            Style::default().fg(color),
        ))
        .alignment(Alignment::Center),
        area,
    );
}

fn render_key_hints(app: &AppState, frame: &mut Frame, area: Rect) {
    let state = &app.tui;
    let hints: &[(&str, &str)] = if app.overlay.is_some() {
        &[]
    } else if let Some(form) = &state.form {
        match form.kind {
            crate::form::FormKind::Login => &[
                ("Tab", "next"),
                ("Enter", "submit"),
                ("Ctrl+R", "register"),
                ("Esc", "back"),
                ("Ctrl+C", "quit"),
            ],
            crate::form::FormKind::Register => &[
                ("Tab", "next"),
                ("Enter", "submit"),
                ("Ctrl+L", "login"),
                ("Esc", "back"),
                ("Ctrl+C", "quit"),
            ],
        }
    } else if state.shows_navigation() {
        &[("m", "menu"), ("g", "go to"), ("b", "back"), ("q", "quit")]
    } else {
        &[("g", "go to"), ("b", "back"), ("q", "quit")]
    };

    let mut spans = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            format!(" {action}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
