//! Authentication middleware
//!
//! The gate exists in two shapes: a layer for whole route trees and an
//! extractor for individual handlers. Both resolve the same way:
//!
//! - no `Authorization: Bearer <token>` header: 401
//! - token fails verification or has expired: 400
//! - token verifies but lacks identity or role: 400
//!
//! On success an [`AuthUser`] is attached to the request extensions.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use meal_planner_shared::{AuthError, Role};
use uuid::Uuid;

use super::JwtService;

/// Identity recovered from a verified session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthUser {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether this caller may act on the account `target`
    #[inline]
    pub fn owns_or_admin(&self, target: Uuid) -> bool {
        self.is_admin() || self.user_id == target
    }
}

/// The bearer token carried by the request, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Run the gate against a set of request headers
pub fn authenticate(jwt: &JwtService, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
    jwt.verify(token)
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already resolved by the layer
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(*user);
        }

        let app_state = AppState::from_ref(state);
        let user = authenticate(app_state.jwt(), &parts.headers)?;
        parts.extensions.insert(user);
        Ok(user)
    }
}

/// Layer form of the gate
///
/// ```ignore
/// Router::new()
///     .nest("/users", users::router())
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(state.jwt(), request.headers())?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_authenticate_outcomes() {
        let jwt = JwtService::new("test-secret", 3600);
        let user_id = Uuid::new_v4();
        let token = jwt.issue(user_id, Role::Standard).unwrap();

        let user = authenticate(&jwt, &headers_with(&format!("Bearer {}", token))).unwrap();
        assert_eq!(user.user_id, user_id);

        assert_eq!(
            authenticate(&jwt, &HeaderMap::new()).unwrap_err(),
            AuthError::MissingToken
        );
        assert_eq!(
            authenticate(&jwt, &headers_with("Bearer nope")).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn test_owns_or_admin() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let user = AuthUser { user_id: me, role: Role::Standard };
        let admin = AuthUser { user_id: me, role: Role::Admin };

        assert!(user.owns_or_admin(me));
        assert!(!user.owns_or_admin(other));
        assert!(admin.owns_or_admin(other));
    }
}
