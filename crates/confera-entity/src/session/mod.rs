//! Session (workshop/conference) entity and store contract.

pub mod model;
pub mod store;

pub use model::{Session, SessionKind};
pub use store::{OccupancyAdjustment, SessionStore};
