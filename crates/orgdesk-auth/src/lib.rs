//! # orgdesk-auth
//!
//! Session and authorization core for the orgdesk dashboard.
//!
//! This crate provides:
//! - [`AuthSessionManager`]: restore, login, logout, register and profile
//!   updates for the account using one client
//! - [`Session`]: the in-memory snapshot, observable through a
//!   `tokio::sync::watch` channel
//! - [`RouteGuard`]: render / defer / redirect decisions for protected and
//!   admin-only regions
//!
//! ## Session states
//!
//! | State | Entered when | Guard decision |
//! |-------|--------------|----------------|
//! | `Loading` | startup, or any operation in flight | defer |
//! | `Unauthenticated` | nothing restored, login/register failed, logout | redirect to login |
//! | `Authenticated` | restore/login/register succeeded | render, or landing for non-admins on admin regions |
//!
//! ## Known weakness
//!
//! Passwords are stored and compared in plaintext and there is no attempt
//! throttling. This matches the existing account table; fixing it means
//! migrating that table.

pub mod error;
pub mod guard;
pub mod manager;
pub mod session;

#[cfg(test)]
mod testing;

pub use error::{AuthError, AuthErrorKind};
pub use guard::{GuardDecision, Requirement, RouteGuard};
pub use manager::AuthSessionManager;
pub use session::{Session, SessionState};
