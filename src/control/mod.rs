// src/control/mod.rs
//! Manual hand control: gesture presets and panel state

pub mod gesture;
pub mod hand;

pub use gesture::Gesture;
pub use hand::{CalibrationState, HandController};
