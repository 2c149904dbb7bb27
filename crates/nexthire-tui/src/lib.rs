//! Full-screen terminal client for Next Hire.

pub mod common;
pub mod effects;
pub mod events;
pub mod form;
pub mod mutations;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
use nexthire_core::api::ApiClient;
use nexthire_core::config::Config;
use nexthire_core::credentials::CredentialHolder;
pub use runtime::TuiRuntime;

/// Runs the interactive client starting at `start_path`.
///
/// # Errors
/// Returns an error if stdout is not a terminal, the backend URL is invalid,
/// or the terminal fails.
pub async fn run(config: &Config, start_path: &str) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The interactive client requires a terminal.\n\
             Use `nexthire visit <PATH>` for non-interactive navigation."
        );
    }

    let api = ApiClient::from_config(config)?;
    let credentials = CredentialHolder::from_config(config);
    tracing::info!(base_url = api.base_url(), start_path, "starting interactive client");

    let mut runtime = TuiRuntime::new(config.clone(), credentials, api)?;
    runtime.run(start_path)
}
