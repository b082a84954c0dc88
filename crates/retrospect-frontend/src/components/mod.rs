//! Reusable UI components for the Retrospect frontend.

pub mod connection_indicator;
pub mod header;
pub mod session_websocket;

pub use connection_indicator::ConnectionIndicator;
pub use header::Header;
pub use session_websocket::{ConnectionState, SessionWebsocket};
