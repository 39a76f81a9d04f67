//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// The four fixed user categories governing feature visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Registers for events, marks attendance, writes reviews.
    Student,
    /// Creates events on behalf of a club.
    Coordinator,
    /// Reviews and approves events.
    Faculty,
    /// Final approval authority.
    HeadFaculty,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 4] = [
        Role::Student,
        Role::Coordinator,
        Role::Faculty,
        Role::HeadFaculty,
    ];

    /// Return the role as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Coordinator => "coordinator",
            Self::Faculty => "faculty",
            Self::HeadFaculty => "headFaculty",
        }
    }

    /// Route an authenticated user lands on when sent away from a page
    /// their role may not open.
    pub fn default_route(&self) -> &'static str {
        "/dashboard"
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "student" => Ok(Self::Student),
            "coordinator" => Ok(Self::Coordinator),
            "faculty" => Ok(Self::Faculty),
            "headfaculty" => Ok(Self::HeadFaculty),
            _ => Err(AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: student, coordinator, faculty, headFaculty"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&Role::HeadFaculty).expect("serialize");
        assert_eq!(json, "\"headFaculty\"");
        let parsed: Role = serde_json::from_str("\"coordinator\"").expect("deserialize");
        assert_eq!(parsed, Role::Coordinator);
    }

    #[test]
    fn test_from_str_is_lenient_about_case() {
        assert_eq!("HeadFaculty".parse::<Role>().ok(), Some(Role::HeadFaculty));
        assert_eq!("head-faculty".parse::<Role>().ok(), Some(Role::HeadFaculty));
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_unknown_wire_role_is_rejected() {
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }
}
