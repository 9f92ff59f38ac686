//! # Validation Module
//!
//! User-profile auditing: the scanner, its issue types, auto-fix patches
//! and the administrator coverage check.

mod autofix;
mod coverage;
mod issue;
mod scanner;

pub use autofix::{auto_fix, auto_fix_all, ProfileChanges, UpdatePatch};
pub use coverage::{check_admin_coverage, CoverageIssue, CoverageLevel};
pub use issue::{issue_id, sort_by_severity, IssueType, ScanSummary, Severity, ValidationIssue};
pub use scanner::{scan, Scanner};
