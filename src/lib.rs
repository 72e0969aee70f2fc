//! Recipe catalog and user administration on top of a document store.
//!
//! Entities live in a [`store::DocumentStore`]; the [`services`] turn raw
//! documents into typed [`models`] and back. The two binaries are thin
//! command-line front ends over the services.

pub mod avatar;
pub mod commands;
pub mod config;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;

pub use config::Config;
pub use models::{Category, CategoryData, Identified, Recipe, RecipeData, User, UserData, UserPatch};
pub use services::{CatalogService, ServiceError, UserService};
pub use store::{DocumentStore, MemoryStore, SqliteStore, StoreError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
