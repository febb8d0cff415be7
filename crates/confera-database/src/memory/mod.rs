//! In-memory store implementations.
//!
//! These satisfy the same contracts as the PostgreSQL repositories using
//! Tokio synchronization primitives. Suitable for single-node deployments
//! and for exercising the registration engine in tests without a
//! database.

pub mod registration;
pub mod session;
pub mod settings;

pub use registration::MemoryRegistrationStore;
pub use session::MemorySessionStore;
pub use settings::MemorySettingsSource;
