//! `orgdesk serve` - start the web dashboard.

use anyhow::{Context, Result};
use clap::Args;
use orgdesk_core::OrgdeskConfig;
use orgdesk_dashboard::{AppState, DashboardServer};
use orgdesk_store::{connect_store, create_slot};

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Override `dashboard.host`.
    #[arg(long)]
    pub host: Option<String>,

    /// Override `dashboard.port`.
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    fn apply(self, config: &mut OrgdeskConfig) {
        if let Some(host) = self.host {
            config.dashboard.host = host;
        }
        if let Some(port) = self.port {
            config.dashboard.port = port;
        }
    }
}

pub async fn run(mut config: OrgdeskConfig, args: ServeArgs) -> Result<()> {
    args.apply(&mut config);

    let store = connect_store(&config.credential_store)
        .await
        .context("Failed to open credential store")?;
    let slot = create_slot(&config.session).context("Failed to open session slot")?;

    let server = DashboardServer::new(AppState::new(config, store, slot));
    println!("🚀 Dashboard listening on http://{}", server.bind_address());
    server.run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = OrgdeskConfig::default();
        ServeArgs {
            host: Some("0.0.0.0".into()),
            port: None,
        }
        .apply(&mut config);
        assert_eq!(config.dashboard.bind_address(), "0.0.0.0:8080");
    }
}
