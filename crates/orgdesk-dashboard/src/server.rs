//! Dashboard server implementation.

use crate::error::DashboardError;
use crate::routes;
use crate::state::AppState;
use tokio::net::TcpListener;

/// The dashboard server.
pub struct DashboardServer {
    state: AppState,
}

impl DashboardServer {
    /// Create a new dashboard server over the given state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Start the dashboard server and serve until ctrl-c.
    pub async fn run(&self) -> Result<(), DashboardError> {
        let addr = self.bind_address();
        tracing::info!(
            address = %addr,
            project = self.state.project_name(),
            "Starting orgdesk dashboard"
        );

        let app = routes::create_router(self.state.clone());

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| DashboardError::StartupFailed(e.to_string()))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DashboardError::StartupFailed(e.to_string()))?;

        tracing::info!("Dashboard stopped");
        Ok(())
    }

    /// Get the configured bind address.
    pub fn bind_address(&self) -> String {
        self.state.config().dashboard.bind_address()
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
