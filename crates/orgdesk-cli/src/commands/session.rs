//! Session commands: `login`, `logout`, `whoami`, `register`, `profile`, `setup`.
//!
//! Each invocation restores the persisted session first, so a login in one
//! process is visible to the next one that shares the slot.

use anyhow::{Result, bail};
use clap::Args;
use orgdesk_auth::{AuthError, AuthSessionManager};
use orgdesk_core::{Account, AccountPatch, NewAccount, ProfileSetup};
use uuid::Uuid;

#[derive(Args, Debug)]
pub struct LoginArgs {
    pub username: String,

    #[arg(long, env = "ORGDESK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    pub username: String,

    #[arg(long, env = "ORGDESK_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub position_title: String,

    #[arg(long)]
    pub organization_id: Option<Uuid>,

    /// Grant the admin role.
    #[arg(long, default_value_t = false)]
    pub admin: bool,
}

impl From<RegisterArgs> for NewAccount {
    fn from(args: RegisterArgs) -> Self {
        NewAccount {
            username: args.username,
            password: args.password,
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            position_title: args.position_title,
            organization_id: args.organization_id,
            is_admin: args.admin,
            ..Default::default()
        }
    }
}

/// Fields to change on the signed-in account. Omitted flags are left alone.
#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub position_title: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,

    #[arg(long)]
    pub profile_picture_url: Option<String>,
}

impl From<ProfileArgs> for AccountPatch {
    fn from(args: ProfileArgs) -> Self {
        AccountPatch {
            username: args.username,
            password: args.password,
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            position_title: args.position_title,
            bio: args.bio,
            profile_picture_url: args.profile_picture_url,
            ..Default::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct SetupArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    /// New password, at least 8 characters.
    #[arg(long, env = "ORGDESK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

impl From<SetupArgs> for ProfileSetup {
    fn from(args: SetupArgs) -> Self {
        ProfileSetup {
            first_name: args.first_name,
            last_name: args.last_name,
            username: args.username,
            email: args.email,
            password: args.password,
        }
    }
}

/// Turn an operation error into a CLI failure with the user-facing message.
fn fail(err: AuthError) -> anyhow::Error {
    match err {
        AuthError::ValidationFailed(problems) => {
            anyhow::anyhow!("Validation failed:\n  - {}", problems.join("\n  - "))
        }
        other => anyhow::anyhow!(other.user_message()),
    }
}

pub async fn login(manager: &AuthSessionManager, args: LoginArgs) -> Result<Account> {
    let account = manager
        .login(&args.username, &args.password)
        .await
        .map_err(fail)?;
    println!("✅ Signed in as {} ({})", account.username, account.role_label());
    if !account.is_setup_complete {
        println!("   Finish your profile with `orgdesk setup`.");
    }
    Ok(account)
}

pub async fn logout(manager: &AuthSessionManager) -> Result<()> {
    let was = manager.current_account();
    manager.logout().await.map_err(fail)?;
    match was {
        Some(account) => println!("👋 Signed out {}", account.username),
        None => println!("Not signed in"),
    }
    Ok(())
}

pub fn whoami(manager: &AuthSessionManager, json: bool) -> Result<Option<Account>> {
    let account = manager.current_account();
    match (&account, json) {
        (Some(account), true) => println!("{}", serde_json::to_string_pretty(account)?),
        (None, true) => println!("null"),
        (Some(account), false) => print_account(account),
        (None, false) => println!("Not signed in"),
    }
    Ok(account)
}

pub async fn register(manager: &AuthSessionManager, args: RegisterArgs) -> Result<Account> {
    let account = manager.register(args.into()).await.map_err(fail)?;
    println!("✅ Registered and signed in as {}", account.username);
    Ok(account)
}

pub async fn profile(manager: &AuthSessionManager, args: ProfileArgs) -> Result<Account> {
    if manager.current_account().is_none() {
        bail!("Not signed in. Run `orgdesk login` first.");
    }
    let account = manager.update_profile(args.into()).await.map_err(fail)?;
    println!("✅ Profile updated");
    print_account(&account);
    Ok(account)
}

pub async fn setup(manager: &AuthSessionManager, args: SetupArgs) -> Result<Account> {
    if manager.current_account().is_none() {
        bail!("Not signed in. Run `orgdesk login` first.");
    }
    let account = manager.complete_setup(args.into()).await.map_err(fail)?;
    println!("✅ Profile setup complete");
    Ok(account)
}

fn print_account(account: &Account) {
    println!("{} <{}>", account.display_name(), account.email);
    println!("  username:  {}", account.username);
    println!("  role:      {}", account.role_label());
    println!("  position:  {}", account.position_title);
    println!("  status:    {}", account.status);
    if let Some(org) = account.organization_id {
        println!("  org:       {}", org);
    }
    if !account.is_setup_complete {
        println!("  setup:     incomplete");
    }
}
