//! # confera-service
//!
//! The registration engine: decides whether a registration may be created
//! or cancelled for a given attendee and session, keeps the live
//! occupancy counter consistent under concurrent requests, and repairs
//! counter drift. Works entirely through the store contracts defined in
//! `confera-entity`; it holds no shared mutable state of its own.

pub mod registration;
