//! Wire models for the sync API.

pub mod requests;
pub mod responses;

pub use requests::{SyncBody, SyncQuery};
pub use responses::{StatusResponse, SyncResponse};
