//! Request handlers for the dashboard.

use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use orgdesk_auth::AuthError;
use orgdesk_core::{Account, AccountPatch, ProfileSetup};

use crate::auth::SessionContext;
use crate::error::DashboardError;
use crate::pages::{self, ProfileFields};
use crate::state::AppState;
use crate::templates::{AlertKind, Chrome};

/// Account of a request that passed the guard.
fn signed_in(context: &SessionContext) -> Result<Account, DashboardError> {
    context
        .manager
        .current_account()
        .ok_or(DashboardError::Auth(AuthError::NotAuthenticated))
}

// =============================================================================
// Page Handlers (HTML responses)
// =============================================================================

/// `/` sends everyone to the landing area; the guard handles the rest.
pub async fn home(State(state): State<AppState>) -> Redirect {
    Redirect::to(state.guard().landing_path())
}

/// Liveness check.
pub async fn healthz() -> &'static str {
    "ok"
}

/// Handler for the first-login setup form (GET).
pub async fn profile_setup(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> Result<Response, DashboardError> {
    let account = signed_in(&context)?;
    if account.is_setup_complete {
        return Ok(Redirect::to(state.guard().landing_path()).into_response());
    }

    let form = ProfileSetup {
        first_name: account.first_name,
        last_name: account.last_name,
        username: account.username,
        email: account.email,
        password: String::new(),
    };
    Ok(Html(pages::profile_setup_page(state.project_name(), &form, &[])).into_response())
}

/// Handler for setup form submission (POST).
pub async fn profile_setup_submit(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Form(form): Form<ProfileSetup>,
) -> Response {
    match context.manager.complete_setup(form.clone()).await {
        Ok(account) => {
            tracing::info!(username = %account.username, "Profile setup completed");
            Redirect::to(state.guard().landing_path()).into_response()
        }
        Err(err) => {
            let problems = match &err {
                AuthError::ValidationFailed(problems) => problems.clone(),
                other => vec![other.user_message()],
            };
            let status = DashboardError::from(err).status();
            (
                status,
                Html(pages::profile_setup_page(state.project_name(), &form, &problems)),
            )
                .into_response()
        }
    }
}

/// Handler for the profile page (GET).
pub async fn profile(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> Result<Html<String>, DashboardError> {
    let account = signed_in(&context)?;
    let chrome = Chrome {
        project: state.project_name(),
        account: &account,
        active: "/profile",
    };
    Ok(Html(pages::profile_page(
        &chrome,
        &ProfileFields::from(&account),
        None,
    )))
}

/// Handler for profile form submission (POST).
pub async fn profile_submit(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    Form(fields): Form<ProfileFields>,
) -> Result<Response, DashboardError> {
    let before = signed_in(&context)?;
    let patch = changes(&before, &fields);

    match context.manager.update_profile(patch).await {
        Ok(account) => {
            let chrome = Chrome {
                project: state.project_name(),
                account: &account,
                active: "/profile",
            };
            let html = pages::profile_page(
                &chrome,
                &ProfileFields::from(&account),
                Some(("Profile updated", AlertKind::Success)),
            );
            Ok(Html(html).into_response())
        }
        Err(err) => {
            let message = err.user_message();
            let status = DashboardError::from(err).status();
            // The session keeps the account as it was before the attempt.
            let chrome = Chrome {
                project: state.project_name(),
                account: &before,
                active: "/profile",
            };
            let html =
                pages::profile_page(&chrome, &fields, Some((&message, AlertKind::Error)));
            Ok((status, Html(html)).into_response())
        }
    }
}

/// Only the fields that differ from the stored account.
fn changes(account: &Account, fields: &ProfileFields) -> AccountPatch {
    fn changed(current: &str, posted: &str) -> Option<String> {
        (current != posted).then(|| posted.to_string())
    }

    AccountPatch {
        first_name: changed(&account.first_name, &fields.first_name),
        last_name: changed(&account.last_name, &fields.last_name),
        email: changed(&account.email, &fields.email),
        position_title: changed(&account.position_title, &fields.position_title),
        bio: changed(account.bio.as_deref().unwrap_or_default(), &fields.bio),
        profile_picture_url: changed(
            account.profile_picture_url.as_deref().unwrap_or_default(),
            &fields.profile_picture_url,
        ),
        ..Default::default()
    }
}

// =============================================================================
// Regions
// =============================================================================

fn region(
    state: &AppState,
    context: &SessionContext,
    active: &str,
    title: &str,
    icon: &str,
    description: &str,
) -> Result<Html<String>, DashboardError> {
    let account = signed_in(context)?;
    let chrome = Chrome {
        project: state.project_name(),
        account: &account,
        active,
    };
    Ok(Html(pages::region_page(&chrome, title, icon, description)))
}

pub async fn organizations(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> Result<Html<String>, DashboardError> {
    region(
        &state,
        &context,
        "/organizations",
        "Organizations",
        "home",
        "Student organizations will be listed here.",
    )
}

pub async fn posts(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> Result<Html<String>, DashboardError> {
    region(
        &state,
        &context,
        "/posts",
        "Posts",
        "newspaper",
        "Announcements from your organizations will appear here.",
    )
}

pub async fn organizations_table(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> Result<Html<String>, DashboardError> {
    region(
        &state,
        &context,
        "/organizations/table",
        "Org Table",
        "table",
        "Every registered organization, in one table.",
    )
}

pub async fn officers(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> Result<Html<String>, DashboardError> {
    region(
        &state,
        &context,
        "/officers",
        "Officers",
        "user-tie",
        "Officer accounts will be managed here.",
    )
}

pub async fn members(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> Result<Html<String>, DashboardError> {
    region(
        &state,
        &context,
        "/members",
        "Members",
        "users",
        "Organization members will be managed here.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orgdesk_core::NewAccount;

    #[test]
    fn test_changes_only_includes_edited_fields() {
        let account = NewAccount {
            username: "jdoe".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.org".into(),
            position_title: "Treasurer".into(),
            ..Default::default()
        }
        .into_credential(uuid::Uuid::new_v4(), Utc::now())
        .account;

        let mut fields = ProfileFields::from(&account);
        assert!(changes(&account, &fields).is_empty());

        fields.position_title = "President".into();
        fields.bio = "Hello".into();
        let patch = changes(&account, &fields);
        assert_eq!(patch.position_title.as_deref(), Some("President"));
        assert_eq!(patch.bio.as_deref(), Some("Hello"));
        assert_eq!(patch.first_name, None);
    }
}
