//! Settings source contract.

use async_trait::async_trait;

use confera_core::result::AppResult;

use super::model::RegistrationSettings;

/// Read access to the current [`RegistrationSettings`].
///
/// The engine reads through this trait at decision time and holds no
/// process-wide mutable settings state of its own. Whether and how long a
/// concrete source caches the singleton row is its own business.
#[async_trait]
pub trait SettingsSource: Send + Sync + 'static {
    /// The settings in effect right now.
    async fn current(&self) -> AppResult<RegistrationSettings>;
}
