//! `orgdesk check` command implementation.
//!
//! Validates the configuration file before anything connects to a backend:
//! - the file parses and every section deserializes
//! - cross-field consistency (paths, table name, database URL source)
//! - warnings for setups that work but lose data or leak cookies

use anyhow::Result;
use orgdesk_core::{CredentialBackend, OrgdeskConfig, SlotBackend};
use std::path::Path;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Check Result Types
// ============================================================================

/// Severity level for check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Warning - works, but probably not what was intended.
    Warning,
    /// Error - configuration is invalid.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A single check finding.
#[derive(Debug, Clone)]
pub struct CheckFinding {
    pub severity: Severity,
    /// Config section the finding is about.
    pub category: String,
    pub message: String,
}

impl CheckFinding {
    fn error(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            category: category.into(),
            message: message.into(),
        }
    }

    fn warning(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            category: category.into(),
            message: message.into(),
        }
    }
}

/// Results from running all checks.
#[derive(Debug, Default)]
pub struct CheckResults {
    pub findings: Vec<CheckFinding>,
}

impl CheckResults {
    fn extend(&mut self, findings: impl IntoIterator<Item = CheckFinding>) {
        self.findings.extend(findings);
    }

    /// Returns true if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    /// Count of errors.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Count of warnings.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    /// Print human-readable summary.
    pub fn print_summary(&self) {
        let mut sorted: Vec<_> = self.findings.iter().collect();
        sorted.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.category.cmp(&b.category)));

        if !sorted.is_empty() {
            println!("{}", "─".repeat(60));
            for finding in &sorted {
                print_finding(finding);
            }
        }

        println!();
        println!("{}", "═".repeat(60));
        if sorted.is_empty() {
            println!("✅ All checks passed!");
        } else {
            println!(
                "Summary: {} error(s), {} warning(s)",
                self.error_count(),
                self.warning_count()
            );
            if self.has_errors() {
                println!("\n❌ Configuration has errors that must be fixed.");
            }
        }
    }
}

fn print_finding(finding: &CheckFinding) {
    let icon = match finding.severity {
        Severity::Error => "✗",
        Severity::Warning => "⚠",
    };
    println!(
        "  {} {} [{}]: {}",
        icon, finding.severity, finding.category, finding.message
    );
}

// ============================================================================
// Main Check Runner
// ============================================================================

/// Run all configuration checks quietly (no output), returns the results.
pub fn run_quiet(config_path: &Path) -> CheckResults {
    let mut results = CheckResults::default();

    if !config_path.exists() {
        results.extend([CheckFinding::warning(
            "config",
            format!(
                "{} not found, using built-in defaults",
                config_path.display()
            ),
        )]);
        results.extend(check_config(&OrgdeskConfig::default()));
        return results;
    }

    match OrgdeskConfig::from_file(config_path) {
        Ok(config) => results.extend(check_config(&config)),
        Err(err) => results.extend([CheckFinding::error("config", err.to_string())]),
    }
    results
}

/// All checks that need a parsed configuration.
pub fn check_config(config: &OrgdeskConfig) -> Vec<CheckFinding> {
    let mut findings: Vec<CheckFinding> = config
        .problems()
        .into_iter()
        .map(|problem| {
            let category = problem
                .split(['.', ':', ' '])
                .next()
                .unwrap_or("config")
                .to_string();
            CheckFinding::error(category, problem)
        })
        .collect();

    findings.extend(check_logging(config));
    findings.extend(check_persistence(config));
    findings.extend(check_cookie(config));
    findings
}

fn check_logging(config: &OrgdeskConfig) -> Vec<CheckFinding> {
    match EnvFilter::try_new(&config.logging.level) {
        Ok(_) => Vec::new(),
        Err(err) => vec![CheckFinding::error(
            "logging",
            format!("logging.level '{}' is not a valid filter: {}", config.logging.level, err),
        )],
    }
}

fn check_persistence(config: &OrgdeskConfig) -> Vec<CheckFinding> {
    let mut findings = Vec::new();
    if config.credential_store.backend == CredentialBackend::Memory {
        findings.push(CheckFinding::warning(
            "credential_store",
            "memory backend: registered accounts and profile edits are lost on restart",
        ));
        if config.credential_store.accounts.is_empty() {
            findings.push(CheckFinding::warning(
                "credential_store",
                "memory backend has no seed accounts; nobody can sign in until one registers",
            ));
        }
    }
    if config.session.backend == SlotBackend::Memory {
        findings.push(CheckFinding::warning(
            "session",
            "memory slot: CLI sessions do not survive between invocations",
        ));
    }
    findings
}

fn check_cookie(config: &OrgdeskConfig) -> Vec<CheckFinding> {
    let dashboard = &config.dashboard;
    let loopback = matches!(dashboard.host.as_str(), "127.0.0.1" | "localhost" | "::1");
    if !loopback && !dashboard.secure_cookie {
        vec![CheckFinding::warning(
            "dashboard",
            format!(
                "dashboard listens on {} but secure_cookie is off; session cookies will travel over plain HTTP",
                dashboard.host
            ),
        )]
    } else {
        Vec::new()
    }
}

/// Run configuration check as a pre-hook before other commands.
/// Returns Ok(()) if no errors found, otherwise prints errors and returns Err.
pub fn run_pre_hook(config_path: &Path) -> Result<()> {
    let results = run_quiet(config_path);

    if results.has_errors() {
        eprintln!("\n❌ Configuration check failed. Run `orgdesk check` for details.\n");
        for finding in results
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
        {
            eprintln!("  ✗ [{}]: {}", finding.category, finding.message);
        }
        eprintln!();
        anyhow::bail!(
            "Configuration has {} error(s). Fix them before running this command.",
            results.error_count()
        );
    }

    Ok(())
}

/// Run all configuration checks.
pub fn run(config_path: &Path) -> Result<()> {
    println!("🔍 Checking {}...", config_path.display());

    let results = run_quiet(config_path);
    results.print_summary();

    if results.has_errors() {
        anyhow::bail!("{} configuration error(s)", results.error_count());
    }
    Ok(())
}
