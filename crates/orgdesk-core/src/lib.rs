// Account records shared by every orgdesk crate
pub mod account;

// Configuration types loaded from orgdesk.yaml
pub mod config;

// Re-export commonly used types for convenience
pub use account::{
    Account, AccountId, AccountPatch, AccountStatus, Credential, NewAccount, ProfileSetup,
    looks_like_email,
};
pub use config::{
    ConfigError, CredentialBackend, CredentialStoreConfig, DashboardConfig, LoggingConfig,
    OrgdeskConfig, SessionConfig, SlotBackend,
};
