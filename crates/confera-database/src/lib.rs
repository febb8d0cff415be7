//! # confera-database
//!
//! PostgreSQL connection management and concrete store implementations
//! for the Confera entities, plus in-memory implementations of the same
//! contracts for single-node deployments and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
