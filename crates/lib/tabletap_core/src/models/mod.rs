//! Domain models.
//!
//! Internal domain structs, distinct from the API crate's request/response
//! DTOs.

pub mod auth;
pub mod billing;
pub mod event;
pub mod sso;
pub mod staff;
pub mod table;
pub mod tenant;
