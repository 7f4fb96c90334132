//! # orgdesk-store
//!
//! Collaborators consumed by the session core:
//!
//! - [`CredentialStore`]: the account table (Postgres via `sqlx`, or in memory)
//! - [`SessionSlot`]: durable key-value slot for the persisted session
//!   snapshot (JSON files, or in memory)

pub mod credential;
pub mod error;
pub mod postgres;
pub mod slot;

pub use credential::{CredentialStore, MemoryCredentialStore, connect_store};
pub use error::StoreError;
pub use postgres::PgCredentialStore;
pub use slot::{FileSlot, MemorySlot, SessionSlot, create_slot};
