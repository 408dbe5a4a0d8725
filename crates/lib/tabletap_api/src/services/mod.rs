//! Business logic between handlers and core queries.

pub mod auth;
