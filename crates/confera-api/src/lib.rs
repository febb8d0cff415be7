//! # confera-api
//!
//! HTTP surface for the registration engine. Handlers stay thin: parse,
//! call the engine or a store, map the typed outcome to a response.
//! Authentication lives in the upstream gateway; the caller's identity
//! arrives in headers (see `extractors`).

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;
