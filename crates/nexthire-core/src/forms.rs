//! Login and registration: field validation and submission.

use anyhow::{Result, bail};

use crate::api::{ApiClient, ApiError, RegisterRequest};
use crate::credentials::CredentialHolder;
use crate::role::Role;

pub const MIN_PASSWORD_LEN: usize = 8;

pub const LOGIN_SUCCESS: &str = "Login successful!";
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const REGISTER_SUCCESS: &str = "Registration successful! Please login.";
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";

/// Checks an email address the way the login form does: non-empty with an `@`.
///
/// # Errors
/// Returns the message to show next to the field.
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        bail!("Email is required");
    }
    if !email.contains('@') {
        bail!("Invalid email address");
    }
    Ok(())
}

/// # Errors
/// Returns the message to show next to the field.
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        bail!("Password must be at least {MIN_PASSWORD_LEN} characters");
    }
    Ok(())
}

/// # Errors
/// Returns the message to show next to the field.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Name is required");
    }
    Ok(())
}

/// Completed login form.
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl LoginInput {
    /// # Errors
    /// Returns the first failing field's message.
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

/// Validates a registration form.
///
/// # Errors
/// Returns the first failing field's message.
pub fn validate_register(request: &RegisterRequest) -> Result<()> {
    validate_name(&request.name)?;
    validate_email(&request.email)?;
    validate_password(&request.password)
}

/// Logs in and stores the credential. Returns the role whose dashboard to open.
///
/// The credential's role is the one the user selected on the form.
///
/// # Errors
/// Returns the API error, or a `Storage` error if the credential could not be
/// saved (nothing is stored and the user is not logged in).
pub async fn login(
    api: &ApiClient,
    credentials: &CredentialHolder,
    input: &LoginInput,
    ttl_days: u32,
) -> Result<Role, ApiError> {
    let token = api
        .login(input.email.trim(), &input.password, input.role)
        .await?;
    if let Err(e) = credentials.set(&token, input.role, ttl_days) {
        tracing::error!(error = %e, "failed to store credential");
        return Err(ApiError::storage(&e));
    }
    tracing::info!(role = %input.role, "logged in");
    Ok(input.role)
}
