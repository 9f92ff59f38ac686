//! # Roles
//!
//! The three portal roles.
//!
//! Stored rows use two spellings for the same roles: the title-case names
//! (`Administrator`, `Management`, `Employee`) and the short lower-case
//! forms (`admin`, `manager`, `employee`). Both parse to the same variant;
//! serialization always emits the title-case name.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A portal role, ordered from most to least privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Administrator,
    Management,
    Employee,
}

impl Role {
    /// Every role, most privileged first.
    pub const ALL: [Role; 3] = [Role::Administrator, Role::Management, Role::Employee];

    /// Parse a stored role value, accepting either naming convention.
    ///
    /// Matching ignores ASCII case and surrounding whitespace.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("administrator") || raw.eq_ignore_ascii_case("admin") {
            Some(Self::Administrator)
        } else if raw.eq_ignore_ascii_case("management") || raw.eq_ignore_ascii_case("manager") {
            Some(Self::Management)
        } else if raw.eq_ignore_ascii_case("employee") {
            Some(Self::Employee)
        } else {
            None
        }
    }

    /// Canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Management => "Management",
            Self::Employee => "Employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::parse(s).ok_or_else(|| CoreError::UnknownRole(s.to_string()))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("unknown role: {raw:?}")))
    }
}

// =============================================================================
// TESTS
// =============================================================================
