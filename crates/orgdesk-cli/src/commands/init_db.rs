//! `orgdesk init-db` - create the account table in Postgres.

use anyhow::{Context, Result, bail};
use orgdesk_core::{CredentialBackend, OrgdeskConfig};
use orgdesk_store::PgCredentialStore;

pub async fn run(config: &OrgdeskConfig) -> Result<()> {
    let store_config = &config.credential_store;
    if store_config.backend != CredentialBackend::Postgres {
        bail!("init-db only applies to the postgres credential backend");
    }
    if !store_config.table_is_valid() {
        bail!("invalid table name '{}'", store_config.table);
    }
    let url = store_config
        .resolve_database_url()
        .context("credential_store needs database_url or database_url_env")?;

    let store = PgCredentialStore::connect(&url, &store_config.table, 1)
        .await
        .context("Failed to connect to Postgres")?;
    store.ensure_table().await?;

    println!("✅ Table '{}' is ready", store_config.table);
    Ok(())
}
