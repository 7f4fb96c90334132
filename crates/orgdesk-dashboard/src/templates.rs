//! HTML templates for the dashboard.
//!
//! Uses a simple template approach with Tailwind CSS and Alpine.js.

use orgdesk_core::Account;

/// A sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub icon: &'static str,
    pub href: &'static str,
}

/// Sidebar entries for an account. Admins get the officer and member screens.
pub fn nav_items(account: &Account) -> Vec<NavItem> {
    let mut items = vec![NavItem {
        label: "Organizations",
        icon: "home",
        href: "/organizations",
    }];
    if account.is_admin {
        items.extend([
            NavItem {
                label: "Org Table",
                icon: "table",
                href: "/organizations/table",
            },
            NavItem {
                label: "Officers",
                icon: "user-tie",
                href: "/officers",
            },
            NavItem {
                label: "Members",
                icon: "users",
                href: "/members",
            },
        ]);
    }
    items.push(NavItem {
        label: "Posts",
        icon: "newspaper",
        href: "/posts",
    });
    items
}

/// Page chrome around authenticated content.
pub struct Chrome<'a> {
    pub project: &'a str,
    pub account: &'a Account,
    /// Path of the current page, used to highlight the sidebar.
    pub active: &'a str,
}

fn head(title: &str, project: &str) -> String {
    format!(
        r##"<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - {project}</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <script>
        tailwind.config = {{
            darkMode: 'class',
            theme: {{
                extend: {{
                    colors: {{
                        primary: {{
                            50: '#E8F5E9',
                            100: '#C8E6C9',
                            200: '#A5D6A7',
                            300: '#81C784',
                            400: '#66BB6A',
                            500: '#4CAF50',
                            600: '#43A047',
                            700: '#388E3C',
                            800: '#2E7D32',
                            900: '#1B5E20',
                        }}
                    }}
                }}
            }}
        }}
    </script>
    <script defer src="https://unpkg.com/alpinejs@3.x.x/dist/cdn.min.js"></script>
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
    <style>[x-cloak] {{ display: none !important; }}</style>
</head>"##,
        title = html_escape(title),
        project = html_escape(project),
    )
}

/// Base HTML layout wrapper for signed-in pages.
pub fn layout(title: &str, chrome: &Chrome<'_>, content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en" x-data="{{
    darkMode: localStorage.getItem('darkMode') === 'true',
    sidebarOpen: true
}}" :class="{{ 'dark': darkMode }}">
{HEAD}
<body class="bg-gray-50 dark:bg-gray-900 min-h-screen">
    {NAV}

    <div class="flex">
        {SIDEBAR}

        <main class="flex-1 p-6 lg:p-8">
            <div class="max-w-7xl mx-auto">
                {content}
            </div>
        </main>
    </div>
</body>
</html>"##,
        HEAD = head(title, chrome.project),
        NAV = nav_template(chrome),
        SIDEBAR = sidebar_template(chrome),
    )
}

/// Layout for pages outside the app shell (login, first-login setup).
pub fn bare_layout(title: &str, project: &str, content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en" x-data="{{ darkMode: localStorage.getItem('darkMode') === 'true' }}" :class="{{ 'dark': darkMode }}">
{HEAD}
<body class="bg-gradient-to-br from-primary-600 via-primary-700 to-primary-900 dark:from-gray-900 dark:via-gray-800 dark:to-gray-900 min-h-screen flex items-center justify-center p-4">
    <div class="w-full max-w-md">
        {content}
    </div>
</body>
</html>"##,
        HEAD = head(title, project),
    )
}

fn nav_template(chrome: &Chrome<'_>) -> String {
    format!(
        r##"<nav class="bg-primary-600 dark:bg-primary-900 text-white px-4 py-3 sticky top-0 z-50 shadow-lg">
        <div class="flex items-center justify-between">
            <div class="flex items-center gap-4">
                <button @click="sidebarOpen = !sidebarOpen" class="p-2 hover:bg-primary-700 rounded-lg lg:hidden">
                    <i class="fas fa-bars"></i>
                </button>
                <a href="/" class="font-semibold">{project}</a>
            </div>
            <div class="flex items-center gap-4">
                <a href="/profile" class="hidden md:flex flex-col items-end text-sm leading-tight">
                    <span>{name}</span>
                    <span class="text-primary-200 text-xs">{role}</span>
                </a>
                <button @click="darkMode = !darkMode; localStorage.setItem('darkMode', darkMode)"
                        class="p-2 hover:bg-primary-700 rounded-lg">
                    <i class="fas" :class="darkMode ? 'fa-sun' : 'fa-moon'"></i>
                </button>
                <form method="POST" action="/logout">
                    <button type="submit" class="p-2 hover:bg-primary-700 rounded-lg" title="Sign out">
                        <i class="fas fa-sign-out-alt"></i>
                    </button>
                </form>
            </div>
        </div>
    </nav>"##,
        project = html_escape(chrome.project),
        name = html_escape(&chrome.account.display_name()),
        role = chrome.account.role_label(),
    )
}

fn sidebar_template(chrome: &Chrome<'_>) -> String {
    let links: String = nav_items(chrome.account)
        .iter()
        .map(|item| {
            let active = if chrome.active == item.href {
                " bg-primary-50 dark:bg-primary-900/50 text-primary-600 dark:text-primary-400"
            } else {
                ""
            };
            format!(
                r##"<a href="{href}" class="flex items-center gap-3 px-4 py-3 text-gray-700 dark:text-gray-200 hover:bg-primary-50 dark:hover:bg-primary-900/50 rounded-lg transition-colors{active}">
                    <i class="fas fa-{icon} w-5"></i>
                    <span>{label}</span>
                </a>"##,
                href = item.href,
                icon = item.icon,
                label = item.label,
            )
        })
        .collect();

    format!(
        r##"<aside class="w-64 bg-white dark:bg-gray-800 border-r border-gray-200 dark:border-gray-700 min-h-[calc(100vh-56px)] transition-all duration-300"
              :class="{{ '-ml-64': !sidebarOpen }}"
              x-cloak>
            <nav class="p-4 space-y-2">
                {links}
            </nav>
        </aside>"##
    )
}

/// Card component.
pub fn card(title: &str, content: &str) -> String {
    format!(
        r##"<div class="bg-white dark:bg-gray-800 rounded-xl shadow-sm border border-gray-200 dark:border-gray-700 overflow-hidden">
            <div class="px-6 py-4 border-b border-gray-200 dark:border-gray-700">
                <h3 class="text-lg font-semibold text-gray-900 dark:text-white">{title}</h3>
            </div>
            <div class="p-6">
                {content}
            </div>
        </div>"##,
        title = html_escape(title),
    )
}

/// Input field component. `value` is escaped here.
pub fn input(name: &str, label: &str, input_type: &str, value: &str, required: bool) -> String {
    let required = if required { " required" } else { "" };
    format!(
        r##"<div class="space-y-1">
            <label for="{name}" class="block text-sm font-medium text-gray-700 dark:text-gray-300">{label}</label>
            <input type="{input_type}" name="{name}" id="{name}" value="{value}"{required}
                   class="w-full px-4 py-2 border border-gray-300 dark:border-gray-600 rounded-lg bg-white dark:bg-gray-800 text-gray-900 dark:text-white focus:ring-2 focus:ring-primary-500 focus:border-primary-500">
        </div>"##,
        value = html_escape(value),
    )
}

/// Textarea component. `value` is escaped here.
pub fn textarea(name: &str, label: &str, value: &str) -> String {
    format!(
        r##"<div class="space-y-1">
            <label for="{name}" class="block text-sm font-medium text-gray-700 dark:text-gray-300">{label}</label>
            <textarea name="{name}" id="{name}" rows="4"
                      class="w-full px-4 py-2 border border-gray-300 dark:border-gray-600 rounded-lg bg-white dark:bg-gray-800 text-gray-900 dark:text-white focus:ring-2 focus:ring-primary-500 focus:border-primary-500">{value}</textarea>
        </div>"##,
        value = html_escape(value),
    )
}

/// Submit button.
pub fn submit_button(text: &str, icon: &str) -> String {
    format!(
        r##"<button type="submit"
            class="w-full py-3 px-4 bg-primary-600 hover:bg-primary-700 text-white font-medium rounded-lg shadow-lg transition-all duration-200 focus:outline-none focus:ring-2 focus:ring-primary-500">
            <span class="flex items-center justify-center gap-2">
                <i class="fas fa-{icon}"></i>
                {text}
            </span>
        </button>"##
    )
}

/// Error or success banner. `message` is escaped here.
pub fn alert(message: &str, kind: AlertKind) -> String {
    let (color, icon) = match kind {
        AlertKind::Error => ("red", "exclamation-circle"),
        AlertKind::Success => ("green", "check-circle"),
    };
    format!(
        r##"<div class="mb-6 p-4 bg-{color}-50 dark:bg-{color}-900/20 border border-{color}-200 dark:border-{color}-800 rounded-lg" role="alert">
            <div class="flex items-center gap-3">
                <i class="fas fa-{icon} text-{color}-500"></i>
                <span class="text-{color}-700 dark:text-{color}-400">{message}</span>
            </div>
        </div>"##,
        message = html_escape(message),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Success,
}

/// Badge component.
pub fn badge(text: &str, color: &str) -> String {
    format!(
        r##"<span class="inline-flex items-center px-2.5 py-0.5 rounded-full text-xs font-medium bg-{color}-100 dark:bg-{color}-900/30 text-{color}-800 dark:text-{color}-300">{text}</span>"##,
        text = html_escape(text),
    )
}

/// Empty state component.
pub fn empty_state(icon: &str, title: &str, description: &str) -> String {
    format!(
        r##"<div class="text-center py-12">
            <i class="fas fa-{icon} text-4xl text-gray-400 dark:text-gray-600 mb-4"></i>
            <h3 class="text-lg font-medium text-gray-900 dark:text-white">{title}</h3>
            <p class="mt-1 text-gray-500 dark:text-gray-400">{description}</p>
        </div>"##,
        title = html_escape(title),
        description = html_escape(description),
    )
}

/// Loading spinner.
pub fn spinner() -> &'static str {
    r##"<div class="flex items-center justify-center py-8">
        <div class="animate-spin rounded-full h-8 w-8 border-b-2 border-primary-600"></div>
    </div>"##
}

/// Simple HTML escape function
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orgdesk_core::NewAccount;

    fn account(is_admin: bool) -> Account {
        NewAccount {
            username: "jdoe".into(),
            first_name: "<Jane>".into(),
            last_name: "Doe".into(),
            is_admin,
            ..Default::default()
        }
        .into_credential(uuid::Uuid::new_v4(), Utc::now())
        .account
    }

    #[test]
    fn test_officer_nav_hides_admin_screens() {
        let labels: Vec<_> = nav_items(&account(false)).iter().map(|i| i.label).collect();
        assert_eq!(labels, vec!["Organizations", "Posts"]);
    }

    #[test]
    fn test_admin_nav() {
        let hrefs: Vec<_> = nav_items(&account(true)).iter().map(|i| i.href).collect();
        assert_eq!(
            hrefs,
            vec!["/organizations", "/organizations/table", "/officers", "/members", "/posts"]
        );
    }

    #[test]
    fn test_layout_escapes_account_name() {
        let account = account(false);
        let html = layout(
            "Posts",
            &Chrome {
                project: "Orgs",
                account: &account,
                active: "/posts",
            },
            "",
        );
        assert!(html.contains("&lt;Jane&gt; Doe"));
        assert!(!html.contains("<Jane>"));
        assert!(!html.contains("/officers"));
    }
}
