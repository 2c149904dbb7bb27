//! Next Hire client core (credentials, session, routing, backend API).

pub mod access;
pub mod api;
pub mod config;
pub mod credentials;
pub mod forms;
pub mod logging;
pub mod nav;
pub mod navigator;
pub mod role;
pub mod router;
pub mod session;
