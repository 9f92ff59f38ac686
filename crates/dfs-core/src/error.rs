//! # Core Errors
//!
//! Error type shared by every module in the core.
//!
//! Lookups (permissions) and scans never fail: they default-deny or turn bad
//! records into findings. Errors only surface from strict parsing and from
//! auto-fix requests that cannot be honoured.

use crate::validation::IssueType;
use thiserror::Error;

/// Errors produced by the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Role string is not one of the known roles or their aliases.
    #[error("unknown role: {0:?}")]
    UnknownRole(String),

    /// Feature string does not name a permission area.
    #[error("unknown feature: {0:?}")]
    UnknownFeature(String),

    /// Action string does not name a permission action.
    #[error("unknown action: {0:?}")]
    UnknownAction(String),

    /// Auto-fix was requested for an issue that has no safe patch.
    #[error("issue {issue_id} ({issue_type}) is not auto-fixable")]
    NotAutoFixable {
        issue_id: String,
        issue_type: IssueType,
    },

    /// Auto-fix was requested for an issue that does not point at a row.
    #[error("issue {0} has no user id to patch")]
    MissingTarget(String),
}

impl CoreError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownRole(_) => "UNKNOWN_ROLE",
            Self::UnknownFeature(_) => "UNKNOWN_FEATURE",
            Self::UnknownAction(_) => "UNKNOWN_ACTION",
            Self::NotAutoFixable { .. } => "NOT_AUTO_FIXABLE",
            Self::MissingTarget(_) => "MISSING_TARGET",
        }
    }
}

/// Result alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let err = CoreError::NotAutoFixable {
            issue_id: "duplicate_email_2".to_string(),
            issue_type: IssueType::DuplicateEmail,
        };
        assert_eq!(err.code(), "NOT_AUTO_FIXABLE");
        assert_eq!(CoreError::MissingTarget("x".into()).code(), "MISSING_TARGET");
        assert_eq!(CoreError::UnknownRole("x".into()).code(), "UNKNOWN_ROLE");
    }

    #[test]
    fn display_names_issue() {
        let err = CoreError::NotAutoFixable {
            issue_id: "missing_data_7".to_string(),
            issue_type: IssueType::MissingData,
        };
        let text = err.to_string();
        assert!(text.contains("missing_data_7"));
        assert!(text.contains("not auto-fixable"));
    }
}
