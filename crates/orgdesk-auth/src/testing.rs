//! Fixtures shared by the unit tests.

use orgdesk_core::{Account, NewAccount};
use orgdesk_store::MemoryCredentialStore;

pub fn officer(username: &str, password: &str, is_admin: bool) -> NewAccount {
    NewAccount {
        username: username.into(),
        password: password.into(),
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: format!("{}@example.edu", username),
        position_title: "Treasurer".into(),
        is_admin,
        ..Default::default()
    }
}

pub fn account(username: &str, is_admin: bool) -> Account {
    officer(username, "secret1", is_admin)
        .into_credential(uuid::Uuid::new_v4(), Default::default())
        .account
}

/// Store holding `jdoe` / `secret1`, a regular officer.
pub fn store_with_jdoe() -> MemoryCredentialStore {
    MemoryCredentialStore::with_accounts(vec![officer("jdoe", "secret1", false)])
        .expect("seed store")
}
