//! Sync endpoint handlers.

pub mod status;
pub mod trigger;

pub use status::status_handler;
pub use trigger::trigger_handler;
