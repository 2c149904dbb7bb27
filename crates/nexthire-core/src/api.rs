//! Backend API client.
//!
//! Covers the endpoints the session core consumes: login, register and the
//! profile lookup used to resolve the session identity.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::role::Role;
use crate::session::SessionIdentity;

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = Config::DEFAULT_BACKEND_URL;

/// Environment variable overriding the backend base URL.
pub const BACKEND_URL_ENV: &str = "NEXTHIRE_BACKEND_URL";

/// Categories of API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Non-2xx response
    HttpStatus,
    /// Request timed out
    Timeout,
    /// Connection failure (refused, DNS, TLS...)
    Network,
    /// Response body did not have the expected shape
    Parse,
    /// Caller gave up on the request
    Cancelled,
    /// Request succeeded but its result could not be persisted locally
    Storage,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::Cancelled => write!(f, "cancelled"),
            ApiErrorKind::Storage => write!(f, "storage"),
        }
    }
}

/// Structured error from the backend.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status, for `HttpStatus` errors
    pub status: Option<u16>,
    /// One-line summary suitable for logs
    pub message: String,
    /// `message` field of the error body, if the backend sent one
    pub server_message: Option<String>,
}

impl ApiError {
    fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            server_message: None,
        }
    }

    /// Creates an HTTP status error, extracting `{"message": ...}` from the body.
    pub fn http_status(status: u16, body: &str) -> Self {
        let server_message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| json.get("message")?.as_str().map(str::to_string))
            .filter(|m| !m.trim().is_empty());
        let message = match &server_message {
            Some(msg) => format!("HTTP {status}: {msg}"),
            None => format!("HTTP {status}"),
        };
        Self {
            kind: ApiErrorKind::HttpStatus,
            status: Some(status),
            message,
            server_message,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    pub fn cancelled() -> Self {
        Self::new(ApiErrorKind::Cancelled, "Request cancelled")
    }

    /// Wraps a local persistence failure (e.g. the credential file).
    pub fn storage(err: &anyhow::Error) -> Self {
        Self::new(ApiErrorKind::Storage, format!("Could not save login: {err:#}"))
    }

    fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ApiErrorKind::Timeout, format!("Request timed out: {err}"))
        } else if err.is_decode() {
            Self::new(ApiErrorKind::Parse, format!("Failed to read response: {err}"))
        } else {
            Self::new(ApiErrorKind::Network, format!("Request failed: {err}"))
        }
    }

    /// Text to show the user: the backend's own message if any, else `fallback`.
    /// Storage errors always show their own message.
    pub fn user_message(&self, fallback: &str) -> String {
        if self.kind == ApiErrorKind::Storage {
            return self.message.clone();
        }
        self.server_message
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    role: Role,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// Payload for `POST /users/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    user: SessionIdentity,
}

/// Resolves the backend base URL.
///
/// Resolution order:
/// 1. `NEXTHIRE_BACKEND_URL` env var (if set and non-empty)
/// 2. `config_base_url` (if Some and non-empty)
/// 3. Default: `http://localhost:5000/api`
///
/// # Errors
/// Returns an error if the selected URL is malformed.
pub fn resolve_base_url(config_base_url: Option<&str>) -> Result<String> {
    resolve_base_url_from(std::env::var(BACKEND_URL_ENV).ok().as_deref(), config_base_url)
}

fn resolve_base_url_from(env_url: Option<&str>, config_base_url: Option<&str>) -> Result<String> {
    let chosen = [env_url, config_base_url]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BASE_URL);

    url::Url::parse(chosen).with_context(|| format!("Invalid backend URL: {chosen}"))?;
    Ok(chosen.trim_end_matches('/').to_string())
}

/// Backend API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for `base_url` with an optional per-request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Creates a client from config (env override, config value, default).
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = resolve_base_url(config.backend_url.as_deref())?;
        Self::new(base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Authenticates and returns the session token.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status, or a body without a token.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> Result<String, ApiError> {
        let request = self.http.post(self.url("/users/login")).json(&LoginRequest {
            email,
            password,
            role,
        });
        let response: LoginResponse = send_json(request).await?;
        response
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::parse("Login response did not contain a token"))
    }

    /// Creates a new account.
    ///
    /// # Errors
    /// Returns an error on transport failure or non-2xx status.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let request = self.http.post(self.url("/users/register")).json(request);
        send(request).await.map(|_| ())
    }

    /// Fetches the identity behind `token`.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status (e.g. 401), or a malformed body.
    pub async fn fetch_profile(&self, token: &str) -> Result<SessionIdentity, ApiError> {
        let request = self
            .http
            .get(self.url("/users/profile"))
            .bearer_auth(token)
            .header(reqwest::header::COOKIE, format!("token={token}"));
        let response: ProfileResponse = send_json(request).await?;
        Ok(response.user)
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<String, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::from_reqwest(&e))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::from_reqwest(&e))?;

    if !status.is_success() {
        return Err(ApiError::http_status(status.as_u16(), &body));
    }
    Ok(body)
}

async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ApiError> {
    let body = send(request).await?;
    serde_json::from_str(&body).map_err(|e| ApiError::parse(format!("Malformed response: {e}")))
}
