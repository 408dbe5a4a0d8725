//! # tabletap_core
//!
//! Core domain logic for TableTap Console.

pub mod analytics;
pub mod auth;
pub mod billing;
pub mod migrate;
pub mod models;
pub mod sso;
pub mod staff;
pub mod tables;
pub mod tenants;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
