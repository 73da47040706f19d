//! Super-admin role guard middleware.
//!
//! Checks that the request carries authenticated claims with the super-admin
//! role before allowing access to the sync trigger endpoint.

use axum::{body::Body, extract::Request, middleware::Next, response::Response};

use crate::error::ApiSyncError;
use acadia_core::ActorClaims;

/// Middleware that requires the caller to be a super admin.
///
/// Requires a prior identity middleware to have inserted [`ActorClaims`] into
/// the request extensions. Missing claims return 401; any role other than
/// `SUPER_ADMIN` returns 403.
pub async fn super_admin_guard(request: Request<Body>, next: Next) -> Result<Response, ApiSyncError> {
    let claims = request
        .extensions()
        .get::<ActorClaims>()
        .ok_or(ApiSyncError::Unauthorized)?;

    if !claims.is_super_admin() {
        tracing::warn!(
            role = %claims.role,
            "Sync trigger denied: super-admin role required"
        );
        return Err(ApiSyncError::Forbidden);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use acadia_core::UserRole;
    use axum::{
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::post,
        Router,
    };
    use tower::util::ServiceExt;

    async fn test_handler() -> &'static str {
        "OK"
    }

    fn app() -> Router {
        Router::new()
            .route("/", post(test_handler))
            .layer(middleware::from_fn(super_admin_guard))
    }

    fn claims(role: UserRole) -> ActorClaims {
        ActorClaims {
            user_id: None,
            email: Some("actor@acadia.dev".to_string()),
            role,
        }
    }

    #[tokio::test]
    async fn allows_super_admin() {
        let mut request = HttpRequest::builder()
            .method("POST")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(claims(UserRole::SuperAdmin));

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn denies_missing_claims() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn denies_other_roles() {
        for role in [UserRole::Director, UserRole::Teacher, UserRole::Student] {
            let mut request = HttpRequest::builder()
                .method("POST")
                .uri("/")
                .body(Body::empty())
                .unwrap();
            request.extensions_mut().insert(claims(role));

            let response = app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }
    }
}
