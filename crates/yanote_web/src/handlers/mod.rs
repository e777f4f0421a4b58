//! Request handlers grouped by route namespace.

pub mod notes;
pub mod users;
