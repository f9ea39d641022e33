//! Sketchroom live-session server library.
//!
//! Rooms, turn rotation and the WebSocket broadcast hub of a draw-and-guess
//! game, layered as domain / usecase / infrastructure / ui.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use ui::{ServerArgs, run as run_server};
