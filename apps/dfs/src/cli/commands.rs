//! Command implementations.

use crate::error::{AppError, AppResult};
use crate::report::{coverage_to_text, grants_to_text, patches_to_text, ScanReport};
use dfs_core::{
    has_feature_access, profiles_from_value, scan, Action, CoverageIssue, Feature,
    PermissionMatrix, PortalSettings, Role, Scanner, UpdatePatch, UserProfile,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Read a profile snapshot from a JSON file.
///
/// A top level that is not an array (`null`, an object) is an empty
/// snapshot. Text that is not JSON at all is an error.
pub fn load_profiles(path: &Path) -> AppResult<Vec<UserProfile>> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| AppError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    if !value.is_array() {
        warn!(
            "{} does not hold an array of profiles; treating it as empty",
            path.display()
        );
    }
    let profiles = profiles_from_value(&value);
    debug!("Loaded {} profiles from {}", profiles.len(), path.display());
    Ok(profiles)
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|source| AppError::Json {
        path: "<stdout>".into(),
        source,
    })?;
    println!("{text}");
    Ok(())
}

/// `dfs scan`
pub fn cmd_scan(input: &Path, json: bool) -> AppResult<ScanReport> {
    let profiles = load_profiles(input)?;
    let report = ScanReport::new(scan(&profiles));
    info!(
        "Scanned {} profiles: {} issue(s)",
        profiles.len(),
        report.summary.total
    );

    if json {
        print_json(&report)?;
    } else {
        print!("{}", report.to_text());
    }
    Ok(report)
}

/// `dfs coverage`
pub fn cmd_coverage(input: &Path, json: bool) -> AppResult<Vec<CoverageIssue>> {
    let profiles = load_profiles(input)?;
    let issues = dfs_core::check_admin_coverage(&profiles);

    if json {
        print_json(&issues)?;
    } else {
        print!("{}", coverage_to_text(&issues));
    }
    Ok(issues)
}

#[derive(Serialize)]
struct AccessOutput<'a> {
    role: Option<&'a str>,
    feature: Feature,
    action: Action,
    allowed: bool,
}

/// `dfs access`
///
/// Feature and action names must be valid here (a typo on the command line
/// is an error). The role follows the resolver: absent or unknown denies.
pub fn cmd_access(role: Option<&str>, feature: &str, action: &str, json: bool) -> AppResult<bool> {
    let parsed_feature: Feature = feature.parse()?;
    let parsed_action: Action = action.parse()?;
    if let Some(raw) = role {
        if Role::parse(raw).is_none() {
            warn!("Unknown role {raw:?}; access is denied");
        }
    }

    let allowed = has_feature_access(role, feature, action);

    if json {
        print_json(&AccessOutput {
            role,
            feature: parsed_feature,
            action: parsed_action,
            allowed,
        })?;
    } else {
        println!(
            "{} {} {} on {}",
            role.unwrap_or("(no role)"),
            if allowed { "may" } else { "may not" },
            parsed_action,
            parsed_feature
        );
    }
    Ok(allowed)
}

/// `dfs matrix`
pub fn cmd_matrix(role: Option<&str>, json: bool) -> AppResult<()> {
    let roles = match role {
        Some(raw) => vec![raw.parse::<Role>()?],
        None => Role::ALL.to_vec(),
    };
    let matrix = PermissionMatrix::global();

    if json {
        let table: Vec<_> = roles
            .iter()
            .map(|role| serde_json::json!({ "role": role, "grants": matrix.grants(*role) }))
            .collect();
        print_json(&table)?;
    } else {
        for role in roles {
            print!("{}", grants_to_text(role, &matrix.grants(role)));
        }
    }
    Ok(())
}

/// `dfs fix`
pub fn cmd_fix(
    input: &Path,
    issue_id: Option<&str>,
    all: bool,
    settings: &PortalSettings,
    json: bool,
) -> AppResult<Vec<UpdatePatch>> {
    let scanner = Scanner::new(*settings);
    let profiles = load_profiles(input)?;
    let issues = scanner.scan(&profiles);

    let patches = match (issue_id, all) {
        (Some(id), false) => {
            let issue = issues
                .iter()
                .find(|issue| issue.id == id)
                .ok_or_else(|| AppError::IssueNotFound(id.to_string()))?;
            vec![scanner.auto_fix(issue)?]
        }
        (None, true) => scanner.auto_fix_all(&issues),
        _ => {
            return Err(AppError::Usage(
                "pass exactly one of --issue <ID> or --all".to_string(),
            ));
        }
    };
    info!("Built {} patch(es)", patches.len());

    if json {
        print_json(&patches)?;
    } else {
        print!("{}", patches_to_text(&patches));
    }
    Ok(patches)
}

fn watch_banner(input: &Path, interval: Duration) -> String {
    format!("Watching {} every {:?}", input.display(), interval)
}

/// `dfs watch`
///
/// Rescans `input` every `interval`. Logs issues that appeared or cleared
/// since the previous scan, matched by issue id. A snapshot that fails to
/// load is logged and skipped. Returns the number of scans performed.
pub async fn cmd_watch(
    input: &Path,
    interval: Duration,
    iterations: Option<u64>,
    settings: &PortalSettings,
) -> AppResult<u64> {
    let scanner = Scanner::new(*settings);
    // tokio rejects a zero period
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    let mut previous: BTreeSet<String> = BTreeSet::new();
    let mut scans = 0u64;

    info!("{}", watch_banner(input, interval));

    loop {
        if iterations.is_some_and(|limit| scans >= limit) {
            break;
        }
        ticker.tick().await;
        scans += 1;

        let profiles = match load_profiles(input) {
            Ok(profiles) => profiles,
            Err(e) => {
                warn!("Scan {scans} skipped: {e}");
                continue;
            }
        };

        let issues = scanner.scan(&profiles);
        let current: BTreeSet<String> = issues.iter().map(|issue| issue.id.clone()).collect();

        for issue in issues.iter().filter(|issue| !previous.contains(&issue.id)) {
            info!("New issue {} [{}]: {}", issue.id, issue.severity, issue.description);
        }
        for cleared in previous.difference(&current) {
            info!("Issue {cleared} cleared");
        }
        for alert in scanner.alerts(&issues) {
            warn!("ALERT {} [{}]: {}", alert.id, alert.severity, alert.description);
        }
        for coverage in scanner.check_admin_coverage(&profiles) {
            if scanner.is_coverage_alert(&coverage) {
                warn!("ALERT coverage [{}]: {}", coverage.level, coverage.message);
            }
        }

        debug!("Scan {scans}: {} issue(s)", issues.len());
        previous = current;
    }

    Ok(scans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_banner_keeps_sub_second_intervals() {
        let banner = watch_banner(Path::new("p.json"), Duration::from_millis(10));
        assert_eq!(banner, "Watching p.json every 10ms");
        assert!(watch_banner(Path::new("p.json"), Duration::from_secs(60)).ends_with("60s"));
    }
}
