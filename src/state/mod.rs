//! Shared mutable ride state and its change-notification contract.

pub mod store;
pub mod types;

pub use store::{RideSnapshot, RideState};
pub use types::{Direction, StateField};
