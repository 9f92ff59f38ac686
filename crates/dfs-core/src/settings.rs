//! # Portal Settings
//!
//! Explicit configuration records passed to the operations that need them.
//! Every field has a default so partial settings files deserialize.

use crate::role::Role;
use crate::validation::Severity;
use serde::{Deserialize, Serialize};

/// Which findings are surfaced as alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    /// Issues at or above this severity are alerts.
    pub alert_threshold: Severity,
    /// Raise an alert when only one administrator remains.
    pub notify_on_coverage_warning: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            alert_threshold: Severity::High,
            notify_on_coverage_warning: true,
        }
    }
}

/// How auto-fix patches are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoFixPolicy {
    /// Role written over an invalid role value.
    pub default_role: Role,
}

impl Default for AutoFixPolicy {
    fn default() -> Self {
        Self {
            default_role: Role::Employee,
        }
    }
}

/// All settings in one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    pub notifications: NotificationPreferences,
    pub auto_fix: AutoFixPolicy,
}
