//! Background job implementations.

pub mod prune;
pub mod reconcile;

pub use prune::RegistrationPruneJob;
pub use reconcile::OccupancyReconcileJob;
