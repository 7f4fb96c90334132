//! Page templates for the dashboard.

use crate::templates::{
    AlertKind, Chrome, alert, badge, bare_layout, card, empty_state, html_escape, input, layout,
    spinner, submit_button, textarea,
};
use orgdesk_core::{Account, AccountStatus, ProfileSetup};
use serde::Deserialize;

// =============================================================================
// Login
// =============================================================================

/// Login form. `username` is echoed back after a failed attempt.
pub fn login_page(project: &str, username: &str, error: Option<&str>) -> String {
    let error_html = error
        .map(|message| alert(message, AlertKind::Error))
        .unwrap_or_default();

    let content = format!(
        r##"<div class="text-center mb-8">
            <div class="inline-flex items-center justify-center w-16 h-16 bg-white/10 backdrop-blur-sm rounded-2xl mb-4">
                <i class="fas fa-users text-3xl text-white"></i>
            </div>
            <h1 class="text-3xl font-bold text-white">{project}</h1>
            <p class="text-primary-200 mt-2">Sign in to manage your organization</p>
        </div>

        <div class="bg-white dark:bg-gray-800 rounded-2xl shadow-2xl p-8">
            {error_html}
            <form method="POST" action="/login" class="space-y-6">
                {username_input}
                {password_input}
                {submit}
            </form>
        </div>"##,
        project = html_escape(project),
        username_input = input("username", "Username", "text", username, true),
        password_input = input("password", "Password", "password", "", true),
        submit = submit_button("Sign In", "sign-in-alt"),
    );

    bare_layout("Login", project, &content)
}

/// Shown while a session is still being restored.
pub fn loading_page(project: &str) -> String {
    let content = format!(
        r##"<div class="bg-white dark:bg-gray-800 rounded-2xl shadow-2xl p-8 text-center">
            {spinner}
            <p class="text-gray-500 dark:text-gray-400">Loading your session...</p>
        </div>"##,
        spinner = spinner(),
    );
    bare_layout("Loading", project, &content)
}

// =============================================================================
// Profile setup
// =============================================================================

/// First-login onboarding form.
pub fn profile_setup_page(project: &str, form: &ProfileSetup, problems: &[String]) -> String {
    let problems_html: String = problems
        .iter()
        .map(|p| alert(p, AlertKind::Error))
        .collect();

    let content = format!(
        r##"<div class="text-center mb-8">
            <h1 class="text-3xl font-bold text-white">Welcome to {project}</h1>
            <p class="text-primary-200 mt-2">Finish setting up your account to continue</p>
        </div>

        <div class="bg-white dark:bg-gray-800 rounded-2xl shadow-2xl p-8">
            {problems_html}
            <form method="POST" action="/profile-setup" class="space-y-4">
                <div class="grid grid-cols-2 gap-4">
                    {first_name}
                    {last_name}
                </div>
                {username}
                {email}
                {password}
                <p class="text-xs text-gray-500 dark:text-gray-400">At least {min} characters.</p>
                {submit}
            </form>
        </div>"##,
        project = html_escape(project),
        first_name = input("first_name", "First name", "text", &form.first_name, true),
        last_name = input("last_name", "Last name", "text", &form.last_name, true),
        username = input("username", "Username", "text", &form.username, true),
        email = input("email", "Email", "email", &form.email, true),
        password = input("password", "New password", "password", "", true),
        min = ProfileSetup::MIN_PASSWORD_LEN,
        submit = submit_button("Save and continue", "check"),
    );

    bare_layout("Profile Setup", project, &content)
}

// =============================================================================
// Profile
// =============================================================================

/// Values shown in, and posted from, the profile form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position_title: String,
    pub bio: String,
    pub profile_picture_url: String,
}

impl From<&Account> for ProfileFields {
    fn from(account: &Account) -> Self {
        Self {
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            position_title: account.position_title.clone(),
            bio: account.bio.clone().unwrap_or_default(),
            profile_picture_url: account.profile_picture_url.clone().unwrap_or_default(),
        }
    }
}

/// Profile page: a summary card and the edit form.
pub fn profile_page(
    chrome: &Chrome<'_>,
    fields: &ProfileFields,
    notice: Option<(&str, AlertKind)>,
) -> String {
    let account = chrome.account;
    let notice_html = notice
        .map(|(message, kind)| alert(message, kind))
        .unwrap_or_default();

    let status_badge = if account.status == AccountStatus::Active {
        badge(account.status.as_str(), "green")
    } else {
        badge(account.status.as_str(), "gray")
    };

    let summary = format!(
        r##"<dl class="space-y-3 text-sm">
            <div class="flex justify-between"><dt class="text-gray-500">Username</dt><dd class="text-gray-900 dark:text-white font-mono">{username}</dd></div>
            <div class="flex justify-between"><dt class="text-gray-500">Role</dt><dd class="text-gray-900 dark:text-white">{role}</dd></div>
            <div class="flex justify-between"><dt class="text-gray-500">Status</dt><dd>{status_badge}</dd></div>
            <div class="flex justify-between"><dt class="text-gray-500">Member since</dt><dd class="text-gray-900 dark:text-white">{since}</dd></div>
        </dl>"##,
        username = html_escape(&account.username),
        role = account.role_label(),
        since = account.created_at.format("%Y-%m-%d"),
    );

    let form = format!(
        r##"<form method="POST" action="/profile" class="space-y-4">
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                {first_name}
                {last_name}
            </div>
            {email}
            {position_title}
            {profile_picture_url}
            {bio}
            {submit}
        </form>"##,
        first_name = input("first_name", "First name", "text", &fields.first_name, true),
        last_name = input("last_name", "Last name", "text", &fields.last_name, true),
        email = input("email", "Email", "email", &fields.email, true),
        position_title = input(
            "position_title",
            "Position",
            "text",
            &fields.position_title,
            true
        ),
        profile_picture_url = input(
            "profile_picture_url",
            "Profile picture URL",
            "url",
            &fields.profile_picture_url,
            false
        ),
        bio = textarea("bio", "Bio", &fields.bio),
        submit = submit_button("Save changes", "save"),
    );

    let content = format!(
        r##"<div class="mb-8">
            <h1 class="text-2xl font-bold text-gray-900 dark:text-white">{name}</h1>
            <p class="text-gray-500 dark:text-gray-400">{position}</p>
        </div>
        {notice_html}
        <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
            <div>{summary_card}</div>
            <div class="lg:col-span-2">{form_card}</div>
        </div>"##,
        name = html_escape(&account.display_name()),
        position = html_escape(&account.position_title),
        summary_card = card("Account", &summary),
        form_card = card("Edit profile", &form),
    );

    layout("Profile", chrome, &content)
}

// =============================================================================
// Regions
// =============================================================================

/// Placeholder body for a navigation region.
pub fn region_page(chrome: &Chrome<'_>, title: &str, icon: &str, description: &str) -> String {
    let content = format!(
        r##"<div class="mb-8">
            <h1 class="text-2xl font-bold text-gray-900 dark:text-white">{title}</h1>
            <p class="text-gray-500 dark:text-gray-400">Signed in as {name}</p>
        </div>
        {body}"##,
        title = html_escape(title),
        name = html_escape(&chrome.account.display_name()),
        body = card(title, &empty_state(icon, "Nothing here yet", description)),
    );

    layout(title, chrome, &content)
}
