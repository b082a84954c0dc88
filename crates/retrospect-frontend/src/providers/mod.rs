//! Context providers for shared application state and services.

pub mod api;
pub mod store;
pub mod theme;

pub use store::{StoreProvider, use_store};
pub use theme::{ThemeProvider, use_theme};
