//! # User Validation Scanner
//!
//! Audits a snapshot of user profiles and reports:
//!
//! 1. duplicate emails (case-insensitive; the first occurrence is canonical),
//! 2. administrators restricted to more than one station,
//! 3. role values that name no known role,
//! 4. rows missing `employee_id`, `email` or `role`.
//!
//! Issues come out grouped in that order, each group in input order. The
//! result depends only on the snapshot, so two scans of the same data are
//! identical. Issue ids are unique within a scan, even when rows share an id.

use super::autofix::{auto_fix, auto_fix_all, UpdatePatch};
use super::coverage::{check_admin_coverage, CoverageIssue, CoverageLevel};
use super::issue::{IssueType, ValidationIssue};
use crate::error::CoreResult;
use crate::profile::UserProfile;
use crate::role::Role;
use crate::settings::PortalSettings;
use std::collections::{BTreeMap, BTreeSet};

/// Scan a snapshot and return every finding.
#[must_use]
pub fn scan(profiles: &[UserProfile]) -> Vec<ValidationIssue> {
    let snapshot = Snapshot::new(profiles);
    let mut issues = Vec::new();
    detect_duplicate_emails(&snapshot, &mut issues);
    detect_role_conflicts(&snapshot, &mut issues);
    detect_invalid_roles(&snapshot, &mut issues);
    detect_missing_data(&snapshot, &mut issues);
    issues
}

/// Profiles plus the row ids that occur more than once.
struct Snapshot<'a> {
    profiles: &'a [UserProfile],
    repeated_ids: BTreeSet<i64>,
}

impl<'a> Snapshot<'a> {
    fn new(profiles: &'a [UserProfile]) -> Self {
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for id in profiles.iter().filter_map(|profile| profile.id) {
            *counts.entry(id).or_insert(0) += 1;
        }
        let repeated_ids = counts
            .into_iter()
            .filter(|&(_, count)| count > 1)
            .map(|(id, _)| id)
            .collect();
        Self {
            profiles,
            repeated_ids,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (usize, &'a UserProfile)> {
        self.profiles.iter().enumerate()
    }

    /// Issue for the row at `index`. A repeated row id gets a `_row{index}`
    /// suffix so every issue id stays unique.
    fn issue(
        &self,
        issue_type: IssueType,
        index: usize,
        description: String,
        suggested_fix: &str,
    ) -> ValidationIssue {
        let profile = &self.profiles[index];
        let issue =
            ValidationIssue::for_profile(issue_type, profile, index, description, suggested_fix);
        match profile.id {
            Some(id) if self.repeated_ids.contains(&id) => issue.with_row_suffix(index),
            _ => issue,
        }
    }
}

fn detect_duplicate_emails(snapshot: &Snapshot<'_>, issues: &mut Vec<ValidationIssue>) {
    // normalized email -> index of the first profile using it
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();

    for (index, profile) in snapshot.iter() {
        let Some(email) = profile.normalized_email() else {
            continue;
        };
        match seen.get(&email) {
            Some(&first) => {
                let canonical = &snapshot.profiles[first];
                let description = format!(
                    "Email {} is already used by {}",
                    email,
                    canonical
                        .id
                        .map_or_else(|| format!("row {first}"), |id| format!("user {id}")),
                );
                issues.push(snapshot.issue(
                    IssueType::DuplicateEmail,
                    index,
                    description,
                    "Assign a unique email address to one of the accounts",
                ));
            }
            None => {
                seen.insert(email, index);
            }
        }
    }
}

fn detect_role_conflicts(snapshot: &Snapshot<'_>, issues: &mut Vec<ValidationIssue>) {
    for (index, profile) in snapshot.iter() {
        if profile.parsed_role() == Some(Role::Administrator) && profile.station_access.len() > 1 {
            issues.push(snapshot.issue(
                IssueType::RoleConflict,
                index,
                format!(
                    "Administrator {} is restricted to {} stations; administrators cover all stations",
                    profile.label(),
                    profile.station_access.len()
                ),
                "Clear the station restriction for this administrator",
            ));
        }
    }
}

fn detect_invalid_roles(snapshot: &Snapshot<'_>, issues: &mut Vec<ValidationIssue>) {
    for (index, profile) in snapshot.iter() {
        if let Some(raw) = profile.unrecognized_role() {
            issues.push(snapshot.issue(
                IssueType::InvalidRole,
                index,
                format!("{} has unrecognised role {:?}", profile.label(), raw),
                "Set the role to Administrator, Management or Employee",
            ));
        }
    }
}

fn detect_missing_data(snapshot: &Snapshot<'_>, issues: &mut Vec<ValidationIssue>) {
    for (index, profile) in snapshot.iter() {
        let missing = profile.missing_fields();
        if missing.is_empty() {
            continue;
        }
        issues.push(snapshot.issue(
            IssueType::MissingData,
            index,
            format!(
                "{} is missing required fields: {}",
                profile.label(),
                missing.join(", ")
            ),
            "Fill in the missing fields from the employee record",
        ));
    }
}

// =============================================================================
// SCANNER
// =============================================================================

/// Scanner bound to a settings record.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scanner {
    settings: PortalSettings,
}

impl Scanner {
    #[must_use]
    pub fn new(settings: PortalSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &PortalSettings {
        &self.settings
    }

    #[must_use]
    pub fn scan(&self, profiles: &[UserProfile]) -> Vec<ValidationIssue> {
        scan(profiles)
    }

    #[must_use]
    pub fn check_admin_coverage(&self, profiles: &[UserProfile]) -> Vec<CoverageIssue> {
        check_admin_coverage(profiles)
    }

    pub fn auto_fix(&self, issue: &ValidationIssue) -> CoreResult<UpdatePatch> {
        auto_fix(issue, &self.settings.auto_fix)
    }

    #[must_use]
    pub fn auto_fix_all(&self, issues: &[ValidationIssue]) -> Vec<UpdatePatch> {
        auto_fix_all(issues, &self.settings.auto_fix)
    }

    /// Unresolved issues at or above the alert threshold.
    #[must_use]
    pub fn alerts<'a>(&self, issues: &'a [ValidationIssue]) -> Vec<&'a ValidationIssue> {
        let threshold = self.settings.notifications.alert_threshold;
        issues
            .iter()
            .filter(|issue| !issue.resolved && issue.severity >= threshold)
            .collect()
    }

    /// Whether a coverage result should be raised as an alert.
    #[must_use]
    pub fn is_coverage_alert(&self, issue: &CoverageIssue) -> bool {
        match issue.level {
            CoverageLevel::Critical => true,
            CoverageLevel::Warning => self.settings.notifications.notify_on_coverage_warning,
            CoverageLevel::Info => false,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Severity;

    fn employee(id: i64, email: &str) -> UserProfile {
        UserProfile::new(id, email, "employee").with_employee_id(format!("E{id}"))
    }

    #[test]
    fn reference_example() {
        let profiles = vec![
            UserProfile::new(1, "a@x.com", "employee").with_employee_id("E1"),
            UserProfile::new(2, "a@x.com", "manager").with_employee_id("E2"),
        ];
        let issues = scan(&profiles);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::DuplicateEmail);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].user_id, Some(2));
        assert!(!issues[0].auto_fixable);
    }

    #[test]
    fn duplicates_are_case_insensitive() {
        let profiles = vec![
            employee(1, "Bob@X.com"),
            employee(2, "bob@x.com "),
            employee(3, "BOB@x.COM"),
        ];
        let issues = scan(&profiles);
        let ids: Vec<_> = issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["duplicate_email_2", "duplicate_email_3"]);
        assert!(issues[1].description.contains("user 1"));
    }

    #[test]
    fn admin_with_several_stations_conflicts() {
        let profiles = vec![
            UserProfile::new(1, "a@x.com", "admin")
                .with_employee_id("E1")
                .with_station_access(["MOBIL", "AMOCO"]),
            UserProfile::new(2, "b@x.com", "Administrator")
                .with_employee_id("E2")
                .with_station_access(["MOBIL"]),
            UserProfile::new(3, "c@x.com", "manager")
                .with_employee_id("E3")
                .with_station_access(["MOBIL", "AMOCO"]),
        ];
        let issues = scan(&profiles);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "role_conflict_1");
        assert_eq!(issues[0].severity, Severity::Medium);
        assert!(issues[0].auto_fixable);
    }

    #[test]
    fn invalid_role_is_critical() {
        let profiles = vec![UserProfile::new(5, "z@x.com", "supervisor").with_employee_id("E5")];
        let issues = scan(&profiles);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::InvalidRole);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert!(issues[0].auto_fixable);
        assert!(issues[0].description.contains("supervisor"));
    }

    #[test]
    fn missing_fields_are_reported_once() {
        let profile = UserProfile {
            id: Some(9),
            employee_id: Some("E9".into()),
            ..UserProfile::default()
        };
        let issues = scan(&[profile]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::MissingData);
        assert!(issues[0].description.contains("email"));
        assert!(issues[0].description.contains("role"));
        assert!(!issues[0].description.contains("employee_id"));
    }

    #[test]
    fn rows_without_id_get_positional_ids() {
        let issues = scan(&[UserProfile::default()]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "missing_data_row0");
        assert_eq!(issues[0].user_id, None);
    }

    #[test]
    fn issues_grouped_by_pass() {
        let profiles = vec![
            UserProfile::new(1, "a@x.com", "wizard"),
            UserProfile::new(2, "a@x.com", "admin")
                .with_employee_id("E2")
                .with_station_access(["A", "B"]),
        ];
        let types: Vec<_> = scan(&profiles).iter().map(|i| i.issue_type).collect();
        assert_eq!(
            types,
            vec![
                IssueType::DuplicateEmail,
                IssueType::RoleConflict,
                IssueType::InvalidRole,
                IssueType::MissingData,
            ]
        );
    }

    #[test]
    fn empty_snapshot_is_clean() {
        assert!(scan(&[]).is_empty());
    }

    #[test]
    fn alerts_follow_threshold() {
        let profiles = vec![
            UserProfile::new(1, "a@x.com", "wizard").with_employee_id("E1"),
            UserProfile::new(2, "b@x.com", "admin")
                .with_employee_id("E2")
                .with_station_access(["A", "B"]),
        ];
        let scanner = Scanner::default();
        let issues = scanner.scan(&profiles);
        assert_eq!(issues.len(), 2);

        let alerts = scanner.alerts(&issues);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].issue_type, IssueType::InvalidRole);
    }

    #[test]
    fn coverage_alerts_respect_preferences() {
        let mut settings = PortalSettings::default();
        settings.notifications.notify_on_coverage_warning = false;
        let scanner = Scanner::new(settings);

        let single = vec![UserProfile::new(1, "a@x.com", "Administrator")];
        let coverage = scanner.check_admin_coverage(&single);
        assert_eq!(coverage[0].level, CoverageLevel::Warning);
        assert!(!scanner.is_coverage_alert(&coverage[0]));

        let none = scanner.check_admin_coverage(&[]);
        assert!(scanner.is_coverage_alert(&none[0]));
    }

    #[test]
    fn profiles_without_email_are_not_duplicates() {
        let blank = UserProfile {
            id: Some(3),
            email: Some("   ".into()),
            role: Some("employee".into()),
            employee_id: Some("E3".into()),
            ..UserProfile::default()
        };
        let no_email = |id: i64| UserProfile {
            id: Some(id),
            role: Some("employee".into()),
            employee_id: Some(format!("E{id}")),
            ..UserProfile::default()
        };
        let profiles = vec![no_email(1), no_email(2), blank, no_email(4)];

        let issues = scan(&profiles);
        assert!(issues
            .iter()
            .all(|issue| issue.issue_type != IssueType::DuplicateEmail));
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn inactive_profiles_still_own_their_email() {
        let profiles = vec![
            employee(1, "former@x.com").inactive(),
            employee(2, "Former@X.com"),
        ];
        let issues = scan(&profiles);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "duplicate_email_2");
        assert!(issues[0].description.contains("user 1"));

        let reversed = vec![employee(2, "former@x.com"), employee(1, "former@x.com").inactive()];
        let issues = scan(&reversed);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].user_id, Some(1));
    }

    #[test]
    fn repeated_row_ids_keep_issue_ids_unique() {
        let profiles = vec![
            UserProfile::new(7, "a@x.com", "wizard").with_employee_id("E1"),
            UserProfile::new(7, "b@x.com", "supervisor").with_employee_id("E2"),
            UserProfile::new(8, "c@x.com", "owner").with_employee_id("E3"),
        ];
        let ids: Vec<_> = scan(&profiles).into_iter().map(|i| i.id).collect();
        assert_eq!(
            ids,
            vec!["invalid_role_7_row0", "invalid_role_7_row1", "invalid_role_8"]
        );
    }
}
