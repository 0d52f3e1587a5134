//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`: the
//! PostgreSQL store behind SeaORM and an in-memory stand-in used when no
//! database is configured.

pub mod database;

pub use database::{
    DatabaseConfig, InMemoryStore, PostgresCategoryRepository, PostgresPostRepository,
};

#[cfg(test)]
mod service_tests;
