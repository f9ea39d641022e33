//! Sketchroom server: HTTP and WebSocket surface.

pub mod config;
mod handler;
mod runner;
mod signal;
pub mod state;

pub use config::ServerArgs;
pub use runner::{build_router, run};
