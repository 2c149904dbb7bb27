use anyhow::Result;
use nexthire_core::config::Config;

#[cfg(feature = "tui")]
pub async fn run(config: &Config, path: &str) -> Result<()> {
    nexthire_tui::run(config, path).await
}

#[cfg(not(feature = "tui"))]
pub async fn run(_config: &Config, _path: &str) -> Result<()> {
    anyhow::bail!(
        "This build does not include the interactive client.\n\
         Use `nexthire visit <PATH>` for non-interactive navigation."
    )
}
