//! Postgres-backed account table.

use crate::credential::CredentialStore;
use crate::error::StoreError;
use async_trait::async_trait;
use orgdesk_core::{Account, AccountId, AccountPatch, AccountStatus, Credential, NewAccount};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

const COLUMNS: &str = "id, username, password, first_name, last_name, email, position_title, \
     organization_id, is_admin, status, is_setup_complete, bio, profile_picture_url, \
     created_at, updated_at";

/// Account table in Postgres.
///
/// The table name is validated by the caller (see
/// `CredentialStoreConfig::table_is_valid`) because it is interpolated into SQL.
pub struct PgCredentialStore {
    pool: PgPool,
    table: String,
}

impl PgCredentialStore {
    pub async fn connect(
        database_url: &str,
        table: &str,
        max_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await?;
        Ok(Self::from_pool(pool, table))
    }

    pub fn from_pool(pool: PgPool, table: &str) -> Self {
        Self {
            pool,
            table: table.to_string(),
        }
    }

    /// Create the account table if it does not exist yet.
    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        let ddl = format!(
            r#"
            create table if not exists {table} (
              id uuid primary key,
              username text not null unique,
              password text,
              first_name text not null default '',
              last_name text not null default '',
              email text not null default '',
              position_title text not null default '',
              organization_id uuid,
              is_admin boolean not null default false,
              status text not null default 'active',
              is_setup_complete boolean not null default false,
              bio text,
              profile_picture_url text,
              created_at timestamptz not null default now(),
              updated_at timestamptz not null default now()
            )
            "#,
            table = self.table
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        tracing::info!(table = %self.table, "Ensured credential table exists");
        Ok(())
    }
}

fn row_to_credential(row: &PgRow) -> Result<Credential, StoreError> {
    let malformed = |e: sqlx::Error| StoreError::MalformedRow(e.to_string());

    let status: String = row.try_get("status").map_err(malformed)?;
    let status = status
        .parse::<AccountStatus>()
        .map_err(StoreError::MalformedRow)?;

    let account = Account {
        id: row.try_get("id").map_err(malformed)?,
        username: row.try_get("username").map_err(malformed)?,
        first_name: row.try_get("first_name").map_err(malformed)?,
        last_name: row.try_get("last_name").map_err(malformed)?,
        email: row.try_get("email").map_err(malformed)?,
        position_title: row.try_get("position_title").map_err(malformed)?,
        organization_id: row.try_get("organization_id").map_err(malformed)?,
        is_admin: row.try_get("is_admin").map_err(malformed)?,
        status,
        is_setup_complete: row.try_get("is_setup_complete").map_err(malformed)?,
        bio: row.try_get("bio").map_err(malformed)?,
        profile_picture_url: row.try_get("profile_picture_url").map_err(malformed)?,
        created_at: row.try_get("created_at").map_err(malformed)?,
        updated_at: row.try_get("updated_at").map_err(malformed)?,
    };

    Ok(Credential {
        account,
        password: row.try_get("password").map_err(malformed)?,
    })
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        let sql = format!("select {} from {} where username = $1", COLUMNS, self.table);
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_credential).transpose()
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let status = account.effective_status();
        let sql = format!(
            r#"
            insert into {} (id, username, password, first_name, last_name, email,
                            position_title, organization_id, is_admin, status,
                            is_setup_complete, bio, profile_picture_url)
            values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            returning {}
            "#,
            self.table, COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(&account.username)
            .bind(&account.password)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(&account.email)
            .bind(&account.position_title)
            .bind(account.organization_id)
            .bind(account.is_admin)
            .bind(status.as_str())
            .bind(account.is_setup_complete)
            .bind(&account.bio)
            .bind(&account.profile_picture_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(row_to_credential(&row)?.account)
    }

    async fn update(&self, id: AccountId, patch: &AccountPatch) -> Result<(), StoreError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("update {} set ", self.table));
        {
            let mut set = builder.separated(", ");
            if let Some(v) = &patch.username {
                set.push("username = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.password {
                set.push("password = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.first_name {
                set.push("first_name = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.last_name {
                set.push("last_name = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.email {
                set.push("email = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.position_title {
                set.push("position_title = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = patch.organization_id {
                set.push("organization_id = ").push_bind_unseparated(v);
            }
            if let Some(v) = patch.is_admin {
                set.push("is_admin = ").push_bind_unseparated(v);
            }
            if let Some(v) = patch.status {
                set.push("status = ").push_bind_unseparated(v.as_str());
            }
            if let Some(v) = patch.is_setup_complete {
                set.push("is_setup_complete = ").push_bind_unseparated(v);
            }
            if let Some(v) = &patch.bio {
                set.push("bio = ").push_bind_unseparated(v.clone());
            }
            if let Some(v) = &patch.profile_picture_url {
                set.push("profile_picture_url = ").push_bind_unseparated(v.clone());
            }
            set.push("updated_at = now()");
        }
        builder.push(" where id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn get(&self, id: AccountId) -> Result<Account, StoreError> {
        let sql = format!("select {} from {} where id = $1", COLUMNS, self.table);
        let row = sqlx::query(&sql).bind(id).fetch_one(&self.pool).await?;
        Ok(row_to_credential(&row)?.account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs only when ORGDESK_TEST_DATABASE_URL points at a scratch database.
    #[tokio::test]
    async fn test_round_trip_against_live_database() {
        let Ok(url) = std::env::var("ORGDESK_TEST_DATABASE_URL") else {
            return;
        };
        let table = format!("officers_test_{}", Uuid::new_v4().simple());
        let store = PgCredentialStore::connect(&url, &table, 2).await.unwrap();
        store.ensure_table().await.unwrap();

        let account = store
            .insert(NewAccount {
                username: "jdoe".into(),
                password: "secret1".into(),
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                email: "jdoe@example.edu".into(),
                position_title: "Treasurer".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let found = store.find_by_username("jdoe").await.unwrap().unwrap();
        assert_eq!(found.account.id, account.id);
        assert_eq!(found.password.as_deref(), Some("secret1"));

        let patch = AccountPatch {
            bio: Some("hi".into()),
            ..Default::default()
        };
        store.update(account.id, &patch).await.unwrap();
        assert_eq!(store.get(account.id).await.unwrap().bio.as_deref(), Some("hi"));

        sqlx::query(&format!("drop table {}", table))
            .execute(&store.pool)
            .await
            .unwrap();
    }
}
