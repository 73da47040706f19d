//! Authenticated actor identity.
//!
//! Session validation happens upstream (gateway / auth service); by the time
//! a request reaches an Acadia service the verified identity arrives as
//! trusted headers and is materialized into [`ActorClaims`] by middleware.

use crate::role::UserRole;
use uuid::Uuid;

/// Identity of the authenticated caller, as asserted by the gateway.
#[derive(Debug, Clone)]
pub struct ActorClaims {
    /// Primary-store user id, when the actor maps to a local user.
    pub user_id: Option<Uuid>,
    /// Actor email, when known.
    pub email: Option<String>,
    /// Actor role.
    pub role: UserRole,
}

impl ActorClaims {
    /// True when the actor holds the super-admin capability.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.role == UserRole::SuperAdmin
    }
}
