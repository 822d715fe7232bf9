//! Shared state types: directional input and change-notification keys.

use serde::{Deserialize, Serialize};

/// Decoded directional input from the key pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// No button held
    #[default]
    None,
    /// Power up
    Up,
    /// Power down
    Down,
    /// Shift to an easier gear
    Left,
    /// Shift to a harder gear
    Right,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::None => write!(f, "none"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Field key carried by a change notification.
///
/// Notifications have no payload beyond the key; observers re-read the
/// current value from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    Clock,
    HeartRate,
    Cadence,
    Gradient,
    Speed,
    FrontGear,
    RearGear,
    ErgMode,
    TargetPower,
    BikeTargetPower,
    CurrentBikePower,
    KeypadDirection,
}

impl std::fmt::Display for StateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateField::Clock => write!(f, "clock"),
            StateField::HeartRate => write!(f, "heart_rate"),
            StateField::Cadence => write!(f, "cadence"),
            StateField::Gradient => write!(f, "gradient"),
            StateField::Speed => write!(f, "speed"),
            StateField::FrontGear => write!(f, "front_gear"),
            StateField::RearGear => write!(f, "rear_gear"),
            StateField::ErgMode => write!(f, "erg_mode"),
            StateField::TargetPower => write!(f, "target_power"),
            StateField::BikeTargetPower => write!(f, "bike_target_power"),
            StateField::CurrentBikePower => write!(f, "current_bike_power"),
            StateField::KeypadDirection => write!(f, "keypad_direction"),
        }
    }
}
