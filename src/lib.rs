//! ErgoDrive - Virtual Drivetrain and Power Target Controller
//!
//! Simulates a bicycle drivetrain and power target for an indoor trainer rig:
//! sensor readings (cadence, simulated gradient) and directional button
//! events are folded into a consistent gear state, a recalculated target
//! power, and an automatic shifting decision, so resistance tracks terrain
//! and gear realistically.

pub mod config;
pub mod control;
pub mod drivetrain;
pub mod physics;
pub mod state;

// Re-export commonly used types
pub use control::Controller;
pub use drivetrain::{GearLayout, GearPosition};
pub use physics::{DrivetrainPhysics, PowerModel};
pub use state::store::{RideSnapshot, RideState};
pub use state::types::{Direction, StateField};
