//! Cloudflare D1 edge store client.
//!
//! The edge store is a globally distributed SQLite database reached through a
//! stateless HTTP query endpoint: every call POSTs one parameterized SQL
//! statement and decodes the `{success, result, errors}` envelope. There is
//! no connection state and no transaction boundary shared with the primary
//! store.

pub mod client;
pub mod config;
pub mod error;

pub use client::D1Client;
pub use config::D1Config;
pub use error::{EdgeError, EdgeResult};
