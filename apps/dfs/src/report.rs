//! Scan results as returned by both the CLI (`--json`) and the HTTP API,
//! plus the plain-text renderings used by the CLI.

use dfs_core::validation::sort_by_severity;
use dfs_core::{CoverageIssue, Grant, Role, ScanSummary, UpdatePatch, ValidationIssue};
use serde::{Deserialize, Serialize};

/// Issues plus their summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub issues: Vec<ValidationIssue>,
    pub summary: ScanSummary,
}

impl ScanReport {
    #[must_use]
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        let summary = ScanSummary::from_issues(&issues);
        Self { issues, summary }
    }

    /// Text table, most severe first.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        if self.issues.is_empty() {
            output.push_str("No validation issues found.\n");
            return output;
        }

        let mut ordered = self.issues.clone();
        sort_by_severity(&mut ordered);

        output.push_str(&format!(
            "{} issue(s), {} unresolved, {} auto-fixable\n",
            self.summary.total, self.summary.unresolved, self.summary.auto_fixable
        ));
        for issue in &ordered {
            let fix = if issue.auto_fixable { "auto-fix" } else { "manual" };
            output.push_str(&format!(
                "[{:<8}] {:<24} {:<8} {}\n",
                issue.severity.as_str().to_uppercase(),
                issue.id,
                fix,
                issue.description
            ));
        }
        output
    }
}

#[must_use]
pub fn coverage_to_text(issues: &[CoverageIssue]) -> String {
    issues
        .iter()
        .map(|issue| {
            format!(
                "[{}] {} (active administrators: {})\n",
                issue.level.to_string().to_uppercase(),
                issue.message,
                issue.active_admins
            )
        })
        .collect()
}

#[must_use]
pub fn grants_to_text(role: Role, grants: &[Grant]) -> String {
    let mut output = format!("{role}:\n");
    let mut current = None;
    for grant in grants {
        if current != Some(grant.feature) {
            if current.is_some() {
                output.push('\n');
            }
            output.push_str(&format!("  {:<16}", grant.feature.as_str()));
            current = Some(grant.feature);
        }
        output.push(' ');
        output.push_str(grant.action.as_str());
    }
    if current.is_some() {
        output.push('\n');
    } else {
        output.push_str("  (no access)\n");
    }
    output
}

#[must_use]
pub fn patches_to_text(patches: &[UpdatePatch]) -> String {
    if patches.is_empty() {
        return "No auto-fixable issues.\n".to_string();
    }
    patches
        .iter()
        .map(|patch| {
            let mut changes = Vec::new();
            if let Some(role) = patch.changes.role {
                changes.push(format!("role = {role}"));
            }
            if let Some(stations) = &patch.changes.station_access {
                changes.push(format!("station_access = [{}]", stations.join(", ")));
            }
            format!("user {}: {} ({})\n", patch.user_id, changes.join(", "), patch.issue_id)
        })
        .collect()
}
