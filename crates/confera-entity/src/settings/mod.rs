//! Admin-configured registration settings and their source contract.

pub mod model;
pub mod source;

pub use model::RegistrationSettings;
pub use source::SettingsSource;
