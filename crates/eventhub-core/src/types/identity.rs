//! Authenticated user identity as returned by the login endpoint.

use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::role::Role;

/// Who is logged in.
///
/// Fields the client does not interpret (contact number, student id,
/// avatar, ...) are kept in `extra` so the persisted copy round-trips
/// the server's record unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Server-assigned user id.
    #[serde(alias = "_id")]
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Role governing route access.
    pub role: Role,
    /// Remaining server-supplied profile fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Identity {
    /// Create an identity with no extra profile fields.
    pub fn new(
        id: impl Into<UserId>,
        full_name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            email: email.into(),
            role,
            extra: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_server_user_with_extra_fields() {
        let identity: Identity = serde_json::from_value(serde_json::json!({
            "_id": "64ab",
            "fullName": "Asha Rao",
            "email": "asha@campus.edu",
            "role": "student",
            "studentId": "CS-042"
        }))
        .expect("identity");

        assert_eq!(identity.id.as_str(), "64ab");
        assert_eq!(identity.role, Role::Student);
        assert_eq!(identity.extra.get("studentId"), Some(&serde_json::json!("CS-042")));

        let back = serde_json::to_value(&identity).expect("serialize");
        assert_eq!(back["studentId"], "CS-042");
        assert_eq!(back["fullName"], "Asha Rao");
    }

    #[test]
    fn test_missing_role_is_rejected() {
        let parsed = serde_json::from_value::<Identity>(serde_json::json!({ "id": "1" }));
        assert!(parsed.is_err());
    }
}
