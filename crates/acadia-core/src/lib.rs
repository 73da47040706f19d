//! Shared vocabulary for Acadia services.
//!
//! Holds the types that cross crate boundaries: user roles and the
//! authenticated actor identity injected by the gateway.

pub mod claims;
pub mod role;

pub use claims::ActorClaims;
pub use role::UserRole;
