use std::io::{BufRead, IsTerminal};

use anyhow::{Context, Result, bail};
use nexthire_core::api::{ApiClient, RegisterRequest};
use nexthire_core::config::Config;
use nexthire_core::credentials::CredentialHolder;
use nexthire_core::forms::{self, LoginInput};
use nexthire_core::role::Role;
use nexthire_core::router::LOGIN_PATH;

use super::visit;

pub async fn login(
    config: &Config,
    email: String,
    role: Role,
    password: Option<String>,
) -> Result<()> {
    let input = LoginInput {
        email,
        password: read_password(password)?,
        role,
    };
    input.validate()?;

    let api = ApiClient::from_config(config)?;
    let credentials = CredentialHolder::from_config(config);
    match forms::login(&api, &credentials, &input, config.credential_ttl_days()).await {
        Ok(role) => {
            println!("{}", forms::LOGIN_SUCCESS);
            println!("Location: {}", role.dashboard_path());
            Ok(())
        }
        Err(e) => {
            tracing::warn!(kind = %e.kind, error = %e, "login failed");
            bail!("{}", e.user_message(forms::LOGIN_FAILED))
        }
    }
}

pub async fn register(
    config: &Config,
    name: String,
    email: String,
    role: Role,
    password: Option<String>,
) -> Result<()> {
    let request = RegisterRequest {
        name,
        email,
        password: read_password(password)?,
        role,
    };
    forms::validate_register(&request)?;

    let api = ApiClient::from_config(config)?;
    match api.register(&request).await {
        Ok(()) => {
            tracing::info!(role = %role, "registered");
            println!("{}", forms::REGISTER_SUCCESS);
            println!("Location: {LOGIN_PATH}");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(kind = %e.kind, error = %e, "registration failed");
            bail!("{}", e.user_message(forms::REGISTER_FAILED))
        }
    }
}

pub async fn logout(config: &Config) -> Result<()> {
    let mut navigator = visit::navigator(config)?;
    let screen = navigator.logout().await?;
    println!("Logged out.");
    println!("Location: {}", screen.location);
    Ok(())
}

pub async fn whoami(config: &Config) -> Result<()> {
    let mut navigator = visit::navigator(config)?;
    let Some(credential) = navigator.context().credential() else {
        println!("Not logged in.");
        return Ok(());
    };

    let screen = navigator.visit(&credential.role.dashboard_path()).await?;
    match &screen.identity {
        Some(identity) => {
            println!("Name: {}", identity.name);
            println!("Email: {}", identity.email);
            println!("Role: {}", identity.role.label());
            if let Some(created) = identity.created_at {
                println!("Member since: {}", created.format("%Y-%m-%d"));
            }
        }
        None => {
            println!("Role: {}", credential.role.label());
            let reason = navigator.context().store.last_error().unwrap_or("unknown error");
            println!("Identity unavailable: {reason}");
        }
    }
    Ok(())
}

/// Uses `password` if given, else reads one line from stdin.
fn read_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
    }
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
