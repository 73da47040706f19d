//! Actor identity extraction from gateway headers.
//!
//! The service sits behind an authenticating gateway that forwards the caller
//! identity as trusted headers. This middleware parses those headers into
//! [`ActorClaims`] and inserts them into the request extensions; requests
//! without a parsable role carry no claims and are rejected downstream.

use axum::{body::Body, extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

use acadia_core::{ActorClaims, UserRole};

/// Header carrying the actor's user id.
pub const HEADER_ACTOR_ID: &str = "x-actor-id";

/// Header carrying the actor's email.
pub const HEADER_ACTOR_EMAIL: &str = "x-actor-email";

/// Header carrying the actor's role string.
pub const HEADER_ACTOR_ROLE: &str = "x-actor-role";

/// Middleware that parses the gateway identity headers into [`ActorClaims`].
///
/// A missing or unparsable `x-actor-role` header means no claims are inserted;
/// the guards and handlers then treat the request as unauthenticated.
pub async fn claims_from_headers(mut request: Request<Body>, next: Next) -> Response {
    if let Some(claims) = parse_claims(&request) {
        request.extensions_mut().insert(claims);
    }
    next.run(request).await
}

fn parse_claims(request: &Request<Body>) -> Option<ActorClaims> {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let role: UserRole = header(HEADER_ACTOR_ROLE)?.parse().ok()?;
    let user_id = header(HEADER_ACTOR_ID).and_then(|id| Uuid::parse_str(&id).ok());
    let email = header(HEADER_ACTOR_EMAIL);

    Some(ActorClaims {
        user_id,
        email,
        role,
    })
}
