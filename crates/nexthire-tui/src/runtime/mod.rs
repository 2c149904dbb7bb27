//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! All side effects happen here; the reducer only produces `UiEffect`s.
//!
//! ## Inbox Pattern
//!
//! Async handlers send their result `UiEvent` to `inbox_tx`. The runtime
//! drains `inbox_rx` every frame alongside terminal input and timer ticks.
//!
//! ## Cross-process credential changes
//!
//! Every tick the runtime polls the `CredentialWatcher`. When another process
//! logs in or out, a `CredentialChanged` event re-mounts the current route.

mod handlers;

use std::future::Future;
use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use nexthire_core::api::ApiClient;
use nexthire_core::config::Config;
use nexthire_core::credentials::CredentialHolder;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick cadence while something is animating (spinner, pending request).
pub const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Tick cadence when idle. Also bounds how quickly external logins are noticed.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(250);

type UiEventSender = mpsc::UnboundedSender<UiEvent>;
type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    api: ApiClient,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Enters the alternate screen. Must be called inside a tokio runtime.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(config: Config, credentials: CredentialHolder, api: ApiClient) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            state: AppState::new(config, credentials),
            api,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs the event loop starting at `start_path`, then restores the terminal.
    ///
    /// # Errors
    /// Returns an error if drawing or reading terminal input fails.
    pub fn run(&mut self, start_path: &str) -> Result<()> {
        let effects = update::start(&mut self.state, start_path);
        self.execute_effects(effects);

        let result = self.event_loop();
        let restored = terminal::restore_terminal();
        result.and(restored)
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let events = self.collect_events()?;

            for event in events {
                dirty = true;
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let busy = self.state.tui.session.store.is_loading()
            || self.state.tui.form.as_ref().is_some_and(|f| f.submitting);
        let tick_interval = if busy {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            let tui = &mut self.state.tui;
            if tui.watcher.poll(&tui.session.credentials) {
                events.push(UiEvent::CredentialChanged);
            }
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns `f` and delivers its result event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::ResolveIdentity { ticket, token } => {
                let api = self.api.clone();
                self.spawn_effect(move || handlers::resolve_identity(api, ticket, token));
            }
            UiEffect::SubmitLogin { input } => {
                let api = self.api.clone();
                let credentials = self.state.tui.session.credentials.clone();
                let ttl_days = self.state.tui.config.credential_ttl_days();
                self.spawn_effect(move || {
                    handlers::submit_login(api, credentials, input, ttl_days)
                });
            }
            UiEffect::SubmitRegister { request } => {
                let api = self.api.clone();
                self.spawn_effect(move || handlers::submit_register(api, request));
            }
        }
    }
}
