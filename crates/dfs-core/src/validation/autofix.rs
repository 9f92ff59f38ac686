//! # Auto-fix
//!
//! Builds partial-update patches for issues that have a deterministic
//! correction. The core never writes them; the caller applies the patch
//! through its own store.
//!
//! Only `role_conflict` and `invalid_role` are fixable. Duplicate emails
//! and missing data need a human to decide which account to keep or what
//! value to enter.

use super::issue::{IssueType, ValidationIssue};
use crate::error::{CoreError, CoreResult};
use crate::profile::UserProfile;
use crate::role::Role;
use crate::settings::AutoFixPolicy;
use serde::{Deserialize, Serialize};

/// Field changes for one profile. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_access: Option<Vec<String>>,
}

impl ProfileChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.station_access.is_none()
    }
}

/// A patch addressed to one profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePatch {
    pub issue_id: String,
    pub user_id: i64,
    pub changes: ProfileChanges,
}

impl UpdatePatch {
    /// Apply the changes to an in-memory copy of the row.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(role) = self.changes.role {
            profile.role = Some(role.as_str().to_string());
        }
        if let Some(stations) = &self.changes.station_access {
            profile.station_access.clone_from(stations);
        }
    }
}

/// Build the corrective patch for `issue`.
///
/// Fails with [`CoreError::NotAutoFixable`] for issue types without a safe
/// patch, and with [`CoreError::MissingTarget`] when the issue has no row id.
pub fn auto_fix(issue: &ValidationIssue, policy: &AutoFixPolicy) -> CoreResult<UpdatePatch> {
    let not_fixable = || CoreError::NotAutoFixable {
        issue_id: issue.id.clone(),
        issue_type: issue.issue_type,
    };

    if !issue.auto_fixable {
        return Err(not_fixable());
    }

    let changes = match issue.issue_type {
        IssueType::RoleConflict => ProfileChanges {
            station_access: Some(Vec::new()),
            ..ProfileChanges::default()
        },
        IssueType::InvalidRole => ProfileChanges {
            role: Some(policy.default_role),
            ..ProfileChanges::default()
        },
        IssueType::DuplicateEmail | IssueType::MissingData => return Err(not_fixable()),
    };

    let user_id = issue
        .user_id
        .ok_or_else(|| CoreError::MissingTarget(issue.id.clone()))?;

    Ok(UpdatePatch {
        issue_id: issue.id.clone(),
        user_id,
        changes,
    })
}

/// Patches for every unresolved, fixable issue that targets a row.
#[must_use]
pub fn auto_fix_all(issues: &[ValidationIssue], policy: &AutoFixPolicy) -> Vec<UpdatePatch> {
    issues
        .iter()
        .filter(|issue| !issue.resolved && issue.auto_fixable)
        .filter_map(|issue| auto_fix(issue, policy).ok())
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
