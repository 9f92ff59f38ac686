//! # Administrator Coverage
//!
//! Separate check that the portal still has someone able to administer it.
//! Only active profiles whose role resolves to Administrator count.

use crate::profile::UserProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome level of the coverage check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageLevel {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for CoverageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        })
    }
}

/// Result of the coverage check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageIssue {
    pub level: CoverageLevel,
    pub active_admins: usize,
    pub message: String,
}

/// Count active administrators and classify the result.
///
/// Always returns exactly one entry.
#[must_use]
pub fn check_admin_coverage(profiles: &[UserProfile]) -> Vec<CoverageIssue> {
    let active_admins = profiles
        .iter()
        .filter(|profile| profile.is_active_administrator())
        .count();

    let (level, message) = match active_admins {
        0 => (
            CoverageLevel::Critical,
            "No active administrators found; nobody can manage users or settings".to_string(),
        ),
        1 => (
            CoverageLevel::Warning,
            "Only one active administrator; deactivating or removing it would lock out the system"
                .to_string(),
        ),
        n => (
            CoverageLevel::Info,
            format!("{n} active administrators provide adequate coverage"),
        ),
    };

    vec![CoverageIssue {
        level,
        active_admins,
        message,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(id: i64) -> UserProfile {
        UserProfile::new(id, format!("admin{id}@x.com"), "Administrator")
    }

    #[test]
    fn no_admins_is_critical() {
        let profiles = vec![UserProfile::new(1, "e@x.com", "Employee")];
        let result = check_admin_coverage(&profiles);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].level, CoverageLevel::Critical);
        assert_eq!(result[0].active_admins, 0);
    }

    #[test]
    fn inactive_admins_do_not_count() {
        let profiles = vec![admin(1).inactive(), admin(2)];
        let result = check_admin_coverage(&profiles);
        assert_eq!(result[0].level, CoverageLevel::Warning);
        assert_eq!(result[0].active_admins, 1);
    }

    #[test]
    fn two_admins_is_informational() {
        let profiles = vec![admin(1), UserProfile::new(2, "b@x.com", "admin")];
        let result = check_admin_coverage(&profiles);
        assert_eq!(result[0].level, CoverageLevel::Info);
        assert!(result[0].message.contains('2'));
    }

    #[test]
    fn empty_snapshot_is_critical() {
        assert_eq!(check_admin_coverage(&[])[0].level, CoverageLevel::Critical);
    }
}
