//! Relational store: SeaORM entities and the repository implementations.

mod connections;
pub mod entity;
mod memory;
mod postgres;

pub use connections::{DatabaseConfig, connect};
pub use memory::InMemoryStore;
pub use postgres::{PostgresCategoryRepository, PostgresPostRepository};

#[cfg(test)]
mod tests;
