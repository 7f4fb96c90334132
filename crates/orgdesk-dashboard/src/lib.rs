//! # orgdesk-dashboard
//!
//! Admin web dashboard for student-organization officers.
//!
//! This crate provides:
//! - Login and logout, with a cookie binding each browser to a session slot
//! - First-login profile setup and the profile editor
//! - Guarded navigation regions, some of them admin-only
//!
//! ## Tech Stack
//!
//! - Axum for HTTP server
//! - Alpine.js for interactivity (minimal JS)
//! - Tailwind CSS for styling

pub mod auth;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod server;
pub mod state;
pub mod templates;

pub use error::DashboardError;
pub use routes::create_router;
pub use server::DashboardServer;
pub use state::AppState;
