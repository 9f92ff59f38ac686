//! # Validation Issues
//!
//! Findings produced by the scanner. Issues are recomputed on every scan;
//! their ids are derived from the issue type and the offending row so that
//! rescanning unchanged data yields the same ids.

use crate::profile::UserProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// SEVERITY
// =============================================================================

/// Ordinal severity, used for display and sorting only.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ISSUE TYPE
// =============================================================================

/// Kind of finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    RoleConflict,
    DuplicateEmail,
    InvalidRole,
    MissingData,
}

impl IssueType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RoleConflict => "role_conflict",
            Self::DuplicateEmail => "duplicate_email",
            Self::InvalidRole => "invalid_role",
            Self::MissingData => "missing_data",
        }
    }

    /// Fixed severity for this type.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::RoleConflict => Severity::Medium,
            Self::DuplicateEmail | Self::MissingData => Severity::High,
            Self::InvalidRole => Severity::Critical,
        }
    }

    /// Whether a deterministic corrective patch exists for this type.
    #[must_use]
    pub const fn auto_fixable(self) -> bool {
        matches!(self, Self::RoleConflict | Self::InvalidRole)
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ISSUE
// =============================================================================

/// A single finding about one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub id: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub employee_id: Option<String>,
    pub description: String,
    pub suggested_fix: String,
    pub auto_fixable: bool,
    #[serde(default)]
    pub resolved: bool,
}

impl ValidationIssue {
    /// Build an issue for the profile at `index` in the snapshot.
    ///
    /// Severity and fixability come from the issue type.
    #[must_use]
    pub fn for_profile(
        issue_type: IssueType,
        profile: &UserProfile,
        index: usize,
        description: impl Into<String>,
        suggested_fix: impl Into<String>,
    ) -> Self {
        Self {
            id: issue_id(issue_type, profile.id, index),
            issue_type,
            severity: issue_type.severity(),
            user_id: profile.id,
            email: profile.email.clone(),
            employee_id: profile.employee_id.clone(),
            description: description.into(),
            suggested_fix: suggested_fix.into(),
            auto_fixable: issue_type.auto_fixable(),
            resolved: false,
        }
    }

    /// Qualify the id with the row position, for snapshots where several
    /// rows share a user id.
    #[must_use]
    pub fn with_row_suffix(mut self, index: usize) -> Self {
        self.id = format!("{}_row{}", self.id, index);
        self
    }

    /// Record that the caller has dealt with this issue.
    pub fn mark_resolved(&mut self) {
        self.resolved = true;
    }
}

/// `{type}_{id}`, or `{type}_row{index}` for rows without an id.
///
/// The scanner appends `_row{index}` to ids whose user id repeats in the
/// snapshot.
#[must_use]
pub fn issue_id(issue_type: IssueType, user_id: Option<i64>, index: usize) -> String {
    match user_id {
        Some(id) => format!("{}_{}", issue_type.as_str(), id),
        None => format!("{}_row{}", issue_type.as_str(), index),
    }
}

/// Sort most severe first. Equal severities keep their scan order.
pub fn sort_by_severity(issues: &mut [ValidationIssue]) {
    issues.sort_by(|a, b| b.severity.cmp(&a.severity));
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Aggregate counts over a scan result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total: usize,
    pub unresolved: usize,
    pub auto_fixable: usize,
    pub by_type: BTreeMap<IssueType, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
    pub highest_severity: Option<Severity>,
}

impl ScanSummary {
    #[must_use]
    pub fn from_issues(issues: &[ValidationIssue]) -> Self {
        let mut summary = Self {
            total: issues.len(),
            ..Self::default()
        };
        for issue in issues {
            if !issue.resolved {
                summary.unresolved += 1;
                if issue.auto_fixable {
                    summary.auto_fixable += 1;
                }
            }
            *summary.by_type.entry(issue.issue_type).or_insert(0) += 1;
            *summary.by_severity.entry(issue.severity).or_insert(0) += 1;
        }
        summary.highest_severity = summary.by_severity.keys().next_back().copied();
        summary
    }

    /// True when nothing is left to look at.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unresolved == 0
    }
}

// =============================================================================
// TESTS
// =============================================================================
