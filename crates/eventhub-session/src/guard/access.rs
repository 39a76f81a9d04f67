//! Access decisions for protected routes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use eventhub_core::error::AppError;
use eventhub_core::types::{NavigationTarget, Role};

use crate::session::SessionState;

const LOGIN_REQUIRED: &str = "You need to be logged in to access this page.";
const ROLE_FORBIDDEN: &str = "You do not have permission to access this page.";

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Render the protected page.
    Allow,
    /// Nobody is signed in.
    RedirectToLogin,
    /// Signed in, but the role may not open the page.
    RedirectToFallback {
        /// The user's default dashboard.
        target: NavigationTarget,
    },
}

impl AccessDecision {
    /// Whether the page may be rendered.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Where to send the user instead, if anywhere.
    pub fn redirect(&self) -> Option<NavigationTarget> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some(NavigationTarget::Login),
            Self::RedirectToFallback { target } => Some(target.clone()),
        }
    }

    /// Notice to show alongside the redirect.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some(LOGIN_REQUIRED),
            Self::RedirectToFallback { .. } => Some(ROLE_FORBIDDEN),
        }
    }
}

/// The persisted session has not been restored yet; callers must wait
/// instead of deciding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session is still being restored")]
pub struct SessionUnresolved;

/// Decide whether `session` may open a route requiring one of `required_roles`.
///
/// An empty `required_roles` only requires a signed-in user.
pub fn decide(
    session: &SessionState,
    required_roles: &[Role],
) -> Result<AccessDecision, SessionUnresolved> {
    match session {
        SessionState::Unknown => Err(SessionUnresolved),
        SessionState::Anonymous => Ok(AccessDecision::RedirectToLogin),
        SessionState::Authenticated { identity, .. } => {
            if required_roles.is_empty() || required_roles.contains(&identity.role) {
                Ok(AccessDecision::Allow)
            } else {
                Ok(AccessDecision::RedirectToFallback {
                    target: NavigationTarget::Route {
                        path: identity.role.default_route().to_string(),
                    },
                })
            }
        }
    }
}

/// Error-returning wrapper around [`decide`] for command-style callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGuard;

impl AccessGuard {
    /// Creates a new guard.
    pub fn new() -> Self {
        Self
    }

    /// Returns `Ok(())` if allowed, an authentication error if nobody is
    /// signed in, or an authorization error if the role is not permitted.
    pub fn require(&self, session: &SessionState, required_roles: &[Role]) -> Result<(), AppError> {
        match decide(session, required_roles) {
            Ok(AccessDecision::Allow) => Ok(()),
            Ok(AccessDecision::RedirectToLogin) => {
                Err(AppError::authentication(LOGIN_REQUIRED).with_server_message(LOGIN_REQUIRED))
            }
            Ok(AccessDecision::RedirectToFallback { .. }) => {
                let role = session.role().map(|r| r.to_string()).unwrap_or_default();
                Err(AppError::authorization(format!(
                    "Role '{role}' is not one of {required_roles:?}"
                ))
                .with_server_message(ROLE_FORBIDDEN))
            }
            Err(unresolved) => Err(AppError::internal(unresolved.to_string())),
        }
    }

    /// Whether the session may open the route (`false` while unresolved).
    pub fn is_allowed(&self, session: &SessionState, required_roles: &[Role]) -> bool {
        matches!(decide(session, required_roles), Ok(AccessDecision::Allow))
    }
}

#[cfg(test)]
mod tests {
    use eventhub_core::error::ErrorKind;
    use eventhub_core::types::Identity;

    use super::*;

    fn signed_in(role: Role) -> SessionState {
        SessionState::Authenticated {
            token: "t".to_string(),
            identity: Identity::new("1", "Test User", "t@campus.edu", role),
        }
    }

    /// Every subset of the four roles.
    fn role_subsets() -> Vec<Vec<Role>> {
        (0u8..16)
            .map(|mask| {
                Role::ALL
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, r)| *r)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_unknown_refuses_to_decide() {
        assert_eq!(decide(&SessionState::Unknown, &[]), Err(SessionUnresolved));
        assert_eq!(
            decide(&SessionState::Unknown, &[Role::Student]),
            Err(SessionUnresolved)
        );
    }

    #[test]
    fn test_anonymous_always_redirects_to_login() {
        for roles in role_subsets() {
            assert_eq!(
                decide(&SessionState::Anonymous, &roles),
                Ok(AccessDecision::RedirectToLogin)
            );
        }
    }

    #[test]
    fn test_empty_roles_allow_any_signed_in_user() {
        for role in Role::ALL {
            assert_eq!(decide(&signed_in(role), &[]), Ok(AccessDecision::Allow));
        }
    }

    #[test]
    fn test_allow_iff_role_listed() {
        for role in Role::ALL {
            for roles in role_subsets().into_iter().filter(|r| !r.is_empty()) {
                let decision = decide(&signed_in(role), &roles).expect("resolved");
                if roles.contains(&role) {
                    assert_eq!(decision, AccessDecision::Allow);
                } else {
                    assert_eq!(
                        decision.redirect(),
                        Some(NavigationTarget::Route {
                            path: "/dashboard".to_string()
                        })
                    );
                    assert_eq!(decision.notice(), Some(ROLE_FORBIDDEN));
                }
            }
        }
    }

    #[test]
    fn test_guard_require_maps_errors() {
        let guard = AccessGuard::new();
        let approvers = [Role::Faculty, Role::HeadFaculty];

        assert!(guard.require(&signed_in(Role::HeadFaculty), &approvers).is_ok());

        let denied = guard
            .require(&signed_in(Role::Student), &approvers)
            .expect_err("student denied");
        assert_eq!(denied.kind, ErrorKind::Authorization);
        assert_eq!(denied.user_message(""), ROLE_FORBIDDEN);

        let anonymous = guard
            .require(&SessionState::Anonymous, &approvers)
            .expect_err("anonymous denied");
        assert_eq!(anonymous.kind, ErrorKind::Authentication);

        assert!(!guard.is_allowed(&SessionState::Unknown, &[]));
    }
}
