//! Registration entity and store contract.

pub mod model;
pub mod store;

pub use model::{Registration, RegistrationStatus};
pub use store::{InsertOutcome, RegistrationStore};
