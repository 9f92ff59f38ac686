//! # Permission Matrix
//!
//! Static role -> feature -> action table used to gate portal actions.
//!
//! The table is process-wide configuration built once on first use. Lookups
//! are total: an absent role, an unknown feature or an unknown action all
//! evaluate to "deny".
//!
//! ## Grants
//!
//! - Administrator: every action on every feature.
//! - Management: day-to-day work on the operational features, delete only
//!   on orders and deliveries, no user management, no admin/monitoring.
//! - Employee: sales entry, product viewing, delivery logging.

use crate::error::{CoreError, CoreResult};
use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

// =============================================================================
// FEATURES
// =============================================================================

/// A named application area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Dashboard,
    Products,
    Employees,
    Sales,
    Vendors,
    Orders,
    Licenses,
    Salary,
    Inventory,
    Delivery,
    Settings,
    UserManagement,
    SiteManagement,
    SmsAlerts,
    Admin,
    Monitoring,
}

impl Feature {
    /// Every feature in table order.
    pub const ALL: [Feature; 16] = [
        Feature::Dashboard,
        Feature::Products,
        Feature::Employees,
        Feature::Sales,
        Feature::Vendors,
        Feature::Orders,
        Feature::Licenses,
        Feature::Salary,
        Feature::Inventory,
        Feature::Delivery,
        Feature::Settings,
        Feature::UserManagement,
        Feature::SiteManagement,
        Feature::SmsAlerts,
        Feature::Admin,
        Feature::Monitoring,
    ];

    /// Features that make up daily station operations.
    pub const OPERATIONAL: [Feature; 8] = [
        Feature::Sales,
        Feature::Employees,
        Feature::Inventory,
        Feature::Vendors,
        Feature::Orders,
        Feature::Licenses,
        Feature::Delivery,
        Feature::Products,
    ];

    /// snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Products => "products",
            Self::Employees => "employees",
            Self::Sales => "sales",
            Self::Vendors => "vendors",
            Self::Orders => "orders",
            Self::Licenses => "licenses",
            Self::Salary => "salary",
            Self::Inventory => "inventory",
            Self::Delivery => "delivery",
            Self::Settings => "settings",
            Self::UserManagement => "user_management",
            Self::SiteManagement => "site_management",
            Self::SmsAlerts => "sms_alerts",
            Self::Admin => "admin",
            Self::Monitoring => "monitoring",
        }
    }

    /// Parse either the snake_case or the camelCase name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let key = normalize_key(raw);
        Self::ALL
            .into_iter()
            .find(|feature| feature.as_str().replace('_', "") == key)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::parse(s).ok_or_else(|| CoreError::UnknownFeature(s.to_string()))
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

/// A named operation on a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "canView")]
    View,
    #[serde(rename = "canEdit")]
    Edit,
    #[serde(rename = "canCreate")]
    Create,
    #[serde(rename = "canDelete")]
    Delete,
    #[serde(rename = "canExport")]
    Export,
    #[serde(rename = "canManageUsers")]
    ManageUsers,
    #[serde(rename = "canViewReports")]
    ViewReports,
    #[serde(rename = "canAccessMonitoring")]
    AccessMonitoring,
}

impl Action {
    /// Every action in table order.
    pub const ALL: [Action; 8] = [
        Action::View,
        Action::Edit,
        Action::Create,
        Action::Delete,
        Action::Export,
        Action::ManageUsers,
        Action::ViewReports,
        Action::AccessMonitoring,
    ];

    /// camelCase name as used by the portal front end.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "canView",
            Self::Edit => "canEdit",
            Self::Create => "canCreate",
            Self::Delete => "canDelete",
            Self::Export => "canExport",
            Self::ManageUsers => "canManageUsers",
            Self::ViewReports => "canViewReports",
            Self::AccessMonitoring => "canAccessMonitoring",
        }
    }

    /// Parse `canView`, `can_view` and friends.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let key = normalize_key(raw);
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().to_ascii_lowercase() == key)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::parse(s).ok_or_else(|| CoreError::UnknownAction(s.to_string()))
    }
}

/// Lower-case and drop separators so `userManagement`, `user_management`
/// and `User-Management` compare equal.
fn normalize_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// =============================================================================
// MATRIX
// =============================================================================

/// A single granted (feature, action) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Grant {
    pub feature: Feature,
    pub action: Action,
}

/// Role -> feature -> allowed actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionMatrix {
    table: BTreeMap<Role, BTreeMap<Feature, BTreeSet<Action>>>,
}

impl PermissionMatrix {
    /// Build the standard portal table.
    #[must_use]
    pub fn standard() -> Self {
        let mut matrix = Self::default();

        for feature in Feature::ALL {
            matrix.grant(Role::Administrator, feature, &Action::ALL);
        }

        let day_to_day = [
            Action::View,
            Action::Create,
            Action::Edit,
            Action::Export,
            Action::ViewReports,
        ];
        for feature in Feature::OPERATIONAL {
            matrix.grant(Role::Management, feature, &day_to_day);
        }
        matrix.grant(Role::Management, Feature::Dashboard, &[Action::View]);
        matrix.grant(
            Role::Management,
            Feature::Salary,
            &[Action::View, Action::Export, Action::ViewReports],
        );
        matrix.grant(Role::Management, Feature::Orders, &[Action::Delete]);
        matrix.grant(Role::Management, Feature::Delivery, &[Action::Delete]);

        matrix.grant(Role::Employee, Feature::Dashboard, &[Action::View]);
        matrix.grant(Role::Employee, Feature::Products, &[Action::View]);
        matrix.grant(Role::Employee, Feature::Sales, &[Action::View, Action::Create]);
        matrix.grant(Role::Employee, Feature::Delivery, &[Action::View, Action::Create]);

        matrix
    }

    /// Shared standard table, built on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        static MATRIX: OnceLock<PermissionMatrix> = OnceLock::new();
        MATRIX.get_or_init(Self::standard)
    }

    fn grant(&mut self, role: Role, feature: Feature, actions: &[Action]) {
        self.table
            .entry(role)
            .or_default()
            .entry(feature)
            .or_default()
            .extend(actions.iter().copied());
    }

    /// Whether `role` may perform `action` on `feature`.
    #[must_use]
    pub fn allows(&self, role: Role, feature: Feature, action: Action) -> bool {
        self.table
            .get(&role)
            .and_then(|features| features.get(&feature))
            .is_some_and(|actions| actions.contains(&action))
    }

    /// Actions `role` holds on `feature`. Empty when nothing is granted.
    #[must_use]
    pub fn feature_actions(&self, role: Role, feature: Feature) -> BTreeSet<Action> {
        self.table
            .get(&role)
            .and_then(|features| features.get(&feature))
            .cloned()
            .unwrap_or_default()
    }

    /// Every grant held by `role`, ordered by feature then action.
    #[must_use]
    pub fn grants(&self, role: Role) -> Vec<Grant> {
        self.table
            .get(&role)
            .into_iter()
            .flat_map(|features| {
                features.iter().flat_map(|(feature, actions)| {
                    actions.iter().map(move |action| Grant {
                        feature: *feature,
                        action: *action,
                    })
                })
            })
            .collect()
    }
}

/// String-keyed lookup against the standard table.
///
/// Any input that does not resolve to a known role, feature and action
/// returns `false`.
#[must_use]
pub fn has_feature_access(role: Option<&str>, feature: &str, action: &str) -> bool {
    let Some(role) = role.and_then(Role::parse) else {
        return false;
    };
    let (Some(feature), Some(action)) = (Feature::parse(feature), Action::parse(action)) else {
        return false;
    };
    PermissionMatrix::global().allows(role, feature, action)
}

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Coarse capability flags derived from the matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCapabilities {
    pub role: Option<Role>,
    pub is_administrator: bool,
    pub is_management: bool,
    pub is_employee: bool,
    pub can_access_admin_area: bool,
    pub can_access_monitoring_area: bool,
    pub can_manage_other_users: bool,
}

impl RoleCapabilities {
    /// Compute the flags for a role. `None` yields all-false.
    #[must_use]
    pub fn for_role(role: Option<Role>) -> Self {
        let Some(role) = role else {
            return Self::default();
        };
        let matrix = PermissionMatrix::global();
        Self {
            role: Some(role),
            is_administrator: role == Role::Administrator,
            is_management: role == Role::Management,
            is_employee: role == Role::Employee,
            can_access_admin_area: matrix.allows(role, Feature::Admin, Action::View),
            can_access_monitoring_area: matrix.allows(
                role,
                Feature::Monitoring,
                Action::AccessMonitoring,
            ),
            can_manage_other_users: matrix.allows(role, Feature::Admin, Action::ManageUsers),
        }
    }

    /// Compute the flags from a raw stored role value.
    #[must_use]
    pub fn for_raw_role(raw: Option<&str>) -> Self {
        Self::for_role(raw.and_then(Role::parse))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_role_is_denied() {
        assert!(!has_feature_access(None, "admin", "canView"));
        assert!(!has_feature_access(None, "sales", "canView"));
        assert!(!has_feature_access(Some("owner"), "sales", "canView"));
    }

    #[test]
    fn employee_cannot_see_admin_or_salary() {
        assert!(!has_feature_access(Some("Employee"), "admin", "canView"));
        assert!(!has_feature_access(Some("Employee"), "salary", "canView"));
        assert!(has_feature_access(Some("Employee"), "sales", "canCreate"));
        assert!(has_feature_access(Some("employee"), "delivery", "canView"));
        assert!(!has_feature_access(Some("Employee"), "sales", "canDelete"));
    }

    #[test]
    fn management_limits() {
        assert!(has_feature_access(Some("Management"), "inventory", "canEdit"));
        assert!(has_feature_access(Some("manager"), "licenses", "canExport"));
        assert!(!has_feature_access(Some("Management"), "employees", "canDelete"));
        assert!(has_feature_access(Some("Management"), "orders", "canDelete"));
        assert!(!has_feature_access(Some("Management"), "employees", "canManageUsers"));
        assert!(!has_feature_access(Some("Management"), "admin", "canView"));
        assert!(!has_feature_access(Some("Management"), "monitoring", "canAccessMonitoring"));
    }

    #[test]
    fn administrator_has_everything() {
        let matrix = PermissionMatrix::global();
        for feature in Feature::ALL {
            for action in Action::ALL {
                assert!(matrix.allows(Role::Administrator, feature, action));
            }
        }
        assert!(has_feature_access(Some("admin"), "userManagement", "canManageUsers"));
    }

    #[test]
    fn unknown_feature_or_action_is_denied() {
        assert!(!has_feature_access(Some("Administrator"), "spaceship", "canView"));
        assert!(!has_feature_access(Some("Administrator"), "sales", "canFly"));
    }

    #[test]
    fn parses_name_variants() {
        assert_eq!(Feature::parse("userManagement"), Some(Feature::UserManagement));
        assert_eq!(Feature::parse("user_management"), Some(Feature::UserManagement));
        assert_eq!(Feature::parse("SMS-Alerts"), Some(Feature::SmsAlerts));
        assert_eq!(Action::parse("canViewReports"), Some(Action::ViewReports));
        assert_eq!(Action::parse("can_view_reports"), Some(Action::ViewReports));
        assert_eq!(Action::parse("view"), None);
    }

    #[test]
    fn grants_are_ordered() {
        let grants = PermissionMatrix::global().grants(Role::Employee);
        let mut sorted = grants.clone();
        sorted.sort();
        assert_eq!(grants, sorted);
        assert_eq!(grants.len(), 6);
    }

    #[test]
    fn capability_flags() {
        let admin = RoleCapabilities::for_role(Some(Role::Administrator));
        assert!(admin.can_access_admin_area);
        assert!(admin.can_access_monitoring_area);
        assert!(admin.can_manage_other_users);

        let manager = RoleCapabilities::for_raw_role(Some("manager"));
        assert!(manager.is_management);
        assert!(!manager.can_access_admin_area);
        assert!(!manager.can_manage_other_users);

        let nobody = RoleCapabilities::for_raw_role(None);
        assert_eq!(nobody, RoleCapabilities::default());
    }

    #[test]
    fn action_serde_names() {
        let json = serde_json::to_string(&Action::ManageUsers).unwrap_or_default();
        assert_eq!(json, "\"canManageUsers\"");
        let json = serde_json::to_string(&Feature::SmsAlerts).unwrap_or_default();
        assert_eq!(json, "\"sms_alerts\"");
    }
}
