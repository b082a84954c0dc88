//! Page components for different routes in the application.

pub mod home;
pub mod retro;

pub use home::*;
pub use retro::*;
