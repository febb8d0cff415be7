//! Concrete PostgreSQL store implementations.

pub mod registration;
pub mod session;
pub mod settings;

pub use registration::PgRegistrationStore;
pub use session::PgSessionStore;
pub use settings::{CachedSettingsSource, PgSettingsStore};
