//! User authentication HTTP service.
//!
//! Exposes the keystone auth manager over a small REST surface:
//! registration, login, refresh-token rotation, and the authenticated
//! current-user profile.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
