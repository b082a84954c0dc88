//! The store's effectful handler groups.
//!
//! The main group lives in the core crate; the api and analytics groups
//! need the browser (async fetches, the analytics global) and live here.

pub mod analytics;
pub mod api;

pub use analytics::{AnalyticsClient, AnalyticsHandler};
pub use api::ApiHandler;
