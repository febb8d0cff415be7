//! # confera-worker
//!
//! Cron-scheduled background maintenance for the registration engine:
//! periodic occupancy reconciliation and pruning of old cancelled
//! registrations.

pub mod jobs;
pub mod scheduler;

pub use scheduler::WorkerScheduler;
