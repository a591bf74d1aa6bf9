//! Session token issuance and verification
//!
//! Tokens are HS256 JWTs carrying the account id and admin flag. Keys are
//! derived once at startup and shared through `AppState`.

use super::AuthUser;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use meal_planner_shared::{AuthError, Role};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// JWT claims
///
/// Identity fields are optional on decode so that a correctly signed token
/// without them can be told apart from a forged one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    expiry_secs: i64,
    validation: Arc<Validation>,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    ///
    /// Call this once at application startup and store in AppState.
    pub fn new(secret: &str, expiry_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            keys: JwtKeys::new(secret),
            expiry_secs,
            validation: Arc::new(validation),
        }
    }

    /// Issue a session token valid from now
    #[inline]
    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<String> {
        self.issue_at(user_id, role, Utc::now())
    }

    /// Issue a session token as if it had been issued at `issued_at`
    pub fn issue_at(&self, user_id: Uuid, role: Role, issued_at: DateTime<Utc>) -> Result<String> {
        let exp = issued_at + Duration::seconds(self.expiry_secs);
        let claims = Claims {
            user_id: Some(user_id.to_string()),
            is_admin: Some(role.is_admin()),
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
        };
        self.sign(&claims)
    }

    /// Sign an arbitrary claim set with the service key
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign session token: {}", e))
    }

    /// Verify a token and recover the identity it carries
    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &self.validation).map_err(|e| {
            debug!(error = %e, "Session token rejected");
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;

        let (Some(user_id), Some(is_admin)) = (data.claims.user_id, data.claims.is_admin) else {
            return Err(AuthError::MissingClaims);
        };

        let user_id = Uuid::parse_str(&user_id).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthUser {
            user_id,
            role: Role::from_admin_flag(is_admin),
        })
    }

    /// Token lifetime in seconds
    #[inline]
    pub fn expiry_secs(&self) -> i64 {
        self.expiry_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret", 3600)
    }

    #[test]
    fn test_issue_and_verify() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id, Role::Admin).unwrap();
        let user = service.verify(&token).unwrap();

        assert_eq!(user.user_id, user_id);
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn test_token_valid_just_inside_the_hour() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();
        let issued = Utc::now() - Duration::seconds(3590);

        let token = service.issue_at(user_id, Role::Standard, issued).unwrap();
        assert_eq!(service.verify(&token).unwrap().role, Role::Standard);
    }

    #[test]
    fn test_expired_token() {
        let service = create_test_service();
        let issued = Utc::now() - Duration::seconds(3601);

        let token = service.issue_at(Uuid::new_v4(), Role::Standard, issued).unwrap();
        assert_eq!(service.verify(&token).unwrap_err(), AuthError::TokenExpired);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_test_service().issue(Uuid::new_v4(), Role::Admin).unwrap();
        let other = JwtService::new("another-secret", 3600);
        assert_eq!(other.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_garbage_is_invalid() {
        let service = create_test_service();
        assert_eq!(service.verify("invalid.token.here").unwrap_err(), AuthError::InvalidToken);
        assert_eq!(service.verify("").unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_missing_claims() {
        let service = create_test_service();
        let now = Utc::now().timestamp();

        let no_role = Claims {
            user_id: Some(Uuid::new_v4().to_string()),
            is_admin: None,
            iat: now,
            exp: now + 600,
        };
        let token = service.sign(&no_role).unwrap();
        assert_eq!(service.verify(&token).unwrap_err(), AuthError::MissingClaims);

        let no_id = Claims {
            user_id: None,
            is_admin: Some(false),
            iat: now,
            exp: now + 600,
        };
        let token = service.sign(&no_id).unwrap();
        assert_eq!(service.verify(&token).unwrap_err(), AuthError::MissingClaims);
    }

    #[test]
    fn test_non_uuid_subject_is_invalid() {
        let service = create_test_service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: Some("not-a-uuid".to_string()),
            is_admin: Some(false),
            iat: now,
            exp: now + 600,
        };
        let token = service.sign(&claims).unwrap();
        assert_eq!(service.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_claims_use_camel_case() {
        let service = create_test_service();
        let token = service.issue(Uuid::new_v4(), Role::Standard).unwrap();
        let data = decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        assert!(data.claims.get("userId").is_some());
        assert_eq!(data.claims["isAdmin"], false);
        let iat = data.claims["iat"].as_i64().unwrap();
        let exp = data.claims["exp"].as_i64().unwrap();
        assert_eq!(exp - iat, 3600);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_round_trip_preserves_identity(bytes in any::<[u8; 16]>(), admin in any::<bool>()) {
            let service = create_test_service();
            let user_id = Uuid::from_bytes(bytes);
            let role = Role::from_admin_flag(admin);

            let token = service.issue(user_id, role).unwrap();
            let user = service.verify(&token).unwrap();
            prop_assert_eq!(user.user_id, user_id);
            prop_assert_eq!(user.role, role);
        }
    }
}
