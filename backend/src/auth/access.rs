//! Role and ownership checks
//!
//! Handlers call these right after extraction, before any store access.

use super::AuthUser;
use crate::error::ApiError;
use uuid::Uuid;

/// Require the administrator role
///
/// `action` completes the sentence "Only admins can ...".
pub fn require_admin(user: &AuthUser, action: &str) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!("Forbidden: Only admins can {}", action)))
    }
}

/// Require that the caller is `target` or an administrator
///
/// `action` completes the sentence "You can only ...".
pub fn require_owner_or_admin(user: &AuthUser, target: Uuid, action: &str) -> Result<(), ApiError> {
    if user.owns_or_admin(target) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!("Forbidden: You can only {}", action)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meal_planner_shared::Role;

    #[test]
    fn test_admin_messages() {
        let user = AuthUser { user_id: Uuid::new_v4(), role: Role::Standard };
        match require_admin(&user, "delete users") {
            Err(ApiError::Forbidden(msg)) => assert_eq!(msg, "Forbidden: Only admins can delete users"),
            other => panic!("unexpected: {:?}", other),
        }

        let admin = AuthUser { user_id: Uuid::new_v4(), role: Role::Admin };
        assert!(require_admin(&admin, "delete users").is_ok());
    }

    #[test]
    fn test_owner_messages() {
        let user = AuthUser { user_id: Uuid::new_v4(), role: Role::Standard };
        assert!(require_owner_or_admin(&user, user.user_id, "update your own profile").is_ok());

        match require_owner_or_admin(&user, Uuid::new_v4(), "update your own profile") {
            Err(ApiError::Forbidden(msg)) => {
                assert_eq!(msg, "Forbidden: You can only update your own profile")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
