//! Account records as stored in the credential table.
//!
//! An [`Account`] is the snapshot the session holds and persists. It never
//! carries the password; that lives only in [`Credential`], which is what a
//! credential store hands back on a username lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque account identifier.
pub type AccountId = Uuid;

/// Whether an account is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            other => Err(format!("unknown account status '{}'", other)),
        }
    }
}

/// An officer or administrator able to sign in to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position_title: String,
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    /// Elevated role flag; gates the admin-only regions.
    pub is_admin: bool,
    pub status: AccountStatus,
    /// False until the account holder finishes the first-login setup form.
    #[serde(default)]
    pub is_setup_complete: bool,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// "First Last", falling back to the username when both names are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// Label shown next to the account in navigation.
    pub fn role_label(&self) -> &'static str {
        if self.is_admin { "Administrator" } else { "Officer" }
    }
}

/// An account row together with its stored secret.
///
/// Passwords are kept and compared in plaintext. This mirrors the existing
/// credential table and is a known weakness, not a recommendation.
#[derive(Debug, Clone)]
pub struct Credential {
    pub account: Account,
    pub password: Option<String>,
}

/// Fields for inserting a new account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position_title: String,
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    #[serde(default)]
    pub is_admin: bool,
    /// Defaults to [`AccountStatus::Active`] when omitted.
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub is_setup_complete: bool,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
}

impl NewAccount {
    /// Names of required fields that are empty or whitespace.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("username", &self.username),
            ("password", &self.password),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("position_title", &self.position_title),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn effective_status(&self) -> AccountStatus {
        self.status.unwrap_or_default()
    }

    /// Build the stored row for this request.
    pub fn into_credential(self, id: AccountId, now: DateTime<Utc>) -> Credential {
        let status = self.effective_status();
        Credential {
            account: Account {
                id,
                username: self.username,
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                position_title: self.position_title,
                organization_id: self.organization_id,
                is_admin: self.is_admin,
                status,
                is_setup_complete: self.is_setup_complete,
                bio: self.bio,
                profile_picture_url: self.profile_picture_url,
                created_at: now,
                updated_at: now,
            },
            password: Some(self.password),
        }
    }
}

/// A partial update to an account. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_setup_complete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

impl AccountPatch {
    pub fn is_empty(&self) -> bool {
        *self == AccountPatch::default()
    }

    /// Required text columns that the patch would blank out.
    pub fn blanked_fields(&self) -> Vec<&'static str> {
        [
            ("username", &self.username),
            ("password", &self.password),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("position_title", &self.position_title),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    /// Apply the patch to a stored row in place.
    pub fn apply_to(&self, credential: &mut Credential, now: DateTime<Utc>) {
        let account = &mut credential.account;
        if let Some(v) = &self.username {
            account.username = v.clone();
        }
        if let Some(v) = &self.password {
            credential.password = Some(v.clone());
        }
        if let Some(v) = &self.first_name {
            account.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            account.last_name = v.clone();
        }
        if let Some(v) = &self.email {
            account.email = v.clone();
        }
        if let Some(v) = &self.position_title {
            account.position_title = v.clone();
        }
        if let Some(v) = self.organization_id {
            account.organization_id = Some(v);
        }
        if let Some(v) = self.is_admin {
            account.is_admin = v;
        }
        if let Some(v) = self.status {
            account.status = v;
        }
        if let Some(v) = self.is_setup_complete {
            account.is_setup_complete = v;
        }
        if let Some(v) = &self.bio {
            account.bio = Some(v.clone());
        }
        if let Some(v) = &self.profile_picture_url {
            account.profile_picture_url = Some(v.clone());
        }
        account.updated_at = now;
    }
}

/// The first-login onboarding form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileSetup {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl ProfileSetup {
    pub const MIN_PASSWORD_LEN: usize = 8;

    /// Field-level problems, in form order. Empty when the form is acceptable.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.first_name.trim().is_empty() {
            problems.push("First name is required".to_string());
        }
        if self.last_name.trim().is_empty() {
            problems.push("Last name is required".to_string());
        }
        if self.username.trim().is_empty() {
            problems.push("Username is required".to_string());
        }
        if self.email.trim().is_empty() {
            problems.push("Email is required".to_string());
        } else if !looks_like_email(&self.email) {
            problems.push("Invalid email".to_string());
        }
        if self.password.is_empty() {
            problems.push("Password is required".to_string());
        } else if self.password.chars().count() < Self::MIN_PASSWORD_LEN {
            problems.push(format!(
                "Password must be at least {} characters",
                Self::MIN_PASSWORD_LEN
            ));
        }
        problems
    }

    pub fn into_patch(self) -> AccountPatch {
        AccountPatch {
            username: Some(self.username),
            password: Some(self.password),
            first_name: Some(self.first_name),
            last_name: Some(self.last_name),
            email: Some(self.email),
            is_setup_complete: Some(true),
            ..Default::default()
        }
    }
}

/// `local@domain` with no whitespace in either part.
pub fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
