//! # DFS Core
//!
//! Access-control and user-audit engine for the DFS Manager back-office.
//!
//! - [`permissions`]: static role -> feature -> action matrix and derived
//!   capability flags. Lookups default-deny.
//! - [`validation`]: scanner over user-profile snapshots, auto-fix patches,
//!   administrator coverage.
//! - [`profile`], [`role`], [`settings`]: the data the two operate on.
//!
//! Everything here is synchronous and free of I/O. Callers fetch rows,
//! hand the core a snapshot, and apply any returned patches themselves.
//!
//! ```
//! use dfs_core::{has_feature_access, scan, UserProfile};
//!
//! assert!(!has_feature_access(Some("Employee"), "admin", "canView"));
//!
//! let profiles = vec![
//!     UserProfile::new(1, "a@x.com", "employee").with_employee_id("E1"),
//!     UserProfile::new(2, "a@x.com", "manager").with_employee_id("E2"),
//! ];
//! let issues = scan(&profiles);
//! assert_eq!(issues.len(), 1);
//! assert_eq!(issues[0].user_id, Some(2));
//! ```

pub mod error;
pub mod permissions;
pub mod profile;
pub mod role;
pub mod settings;
pub mod validation;

pub use error::{CoreError, CoreResult};
pub use permissions::{has_feature_access, Action, Feature, Grant, PermissionMatrix, RoleCapabilities};
pub use profile::{profiles_from_value, UserProfile};
pub use role::Role;
pub use settings::{AutoFixPolicy, NotificationPreferences, PortalSettings};
pub use validation::{
    auto_fix, auto_fix_all, check_admin_coverage, scan, CoverageIssue, CoverageLevel, IssueType,
    ScanSummary, Scanner, Severity, UpdatePatch, ValidationIssue,
};
