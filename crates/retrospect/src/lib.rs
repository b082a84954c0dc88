//! The shared library for Retrospect, a Rust-based retro-meeting web client.
//!
//! This library provides the framework-agnostic core of the application:
//! the flux-style store and its handler groups, the wire data model, the
//! accessor-based API client, error handling, and logging.

pub mod api;
pub mod data;
pub mod errors;
pub mod id;
pub mod log;
pub mod store;

pub use serde;
pub use serde_json;
pub use tracing;
