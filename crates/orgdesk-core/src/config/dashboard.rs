//! Dashboard configuration.
//!
//! This module defines configuration for the admin dashboard web UI.

use serde::{Deserialize, Serialize};

/// Configuration for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Host to bind the dashboard to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Where unauthenticated visitors are sent.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Default area for authenticated accounts, also used when an account
    /// lacks the role a region requires.
    #[serde(default = "default_landing_path")]
    pub landing_path: String,

    /// First-login onboarding form.
    #[serde(default = "default_setup_path")]
    pub setup_path: String,

    /// Name of the cookie binding a browser to its session slot.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Add the `Secure` attribute to the session cookie.
    #[serde(default)]
    pub secure_cookie: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            login_path: default_login_path(),
            landing_path: default_landing_path(),
            setup_path: default_setup_path(),
            cookie_name: default_cookie_name(),
            secure_cookie: false,
        }
    }
}

impl DashboardConfig {
    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_landing_path() -> String {
    "/organizations".to_string()
}

fn default_setup_path() -> String {
    "/profile-setup".to_string()
}

fn default_cookie_name() -> String {
    "orgdesk_session".to_string()
}
