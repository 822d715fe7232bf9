//! Virtual drivetrain: gear tables and shift transitions.
//!
//! Gears are 1-based indices into the chainring and sprocket tooth tables.
//! Shifting walks an ordered "gear ladder": rear-only shifts in the middle of
//! the cassette, with a compensating rear move when the chain crosses between
//! chainrings, so no shift produces a large ratio jump.

use serde::{Deserialize, Serialize};

/// Current chainring/sprocket selection, as 1-based table indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GearPosition {
    /// Front gear index (1 = smallest chainring)
    pub front: u8,
    /// Rear gear index (1 = largest sprocket)
    pub rear: u8,
}

impl Default for GearPosition {
    fn default() -> Self {
        Self { front: 1, rear: 1 }
    }
}

impl std::fmt::Display for GearPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.front, self.rear)
    }
}

/// Fixed tooth tables for a drivetrain, chosen at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearLayout {
    /// Chainring tooth counts, smallest first, indexed by front gear
    pub chainrings: Vec<u32>,
    /// Sprocket tooth counts, largest first, indexed by rear gear
    pub sprockets: Vec<u32>,
}

impl GearLayout {
    /// Standard road setup: 39/53 rings on an 11-40 cassette.
    pub fn standard() -> Self {
        Self {
            chainrings: vec![39, 53],
            sprockets: vec![40, 35, 31, 27, 24, 21, 19, 17, 15, 13, 11],
        }
    }

    /// Compact setup: 24/34 rings on the same cassette.
    pub fn compact() -> Self {
        Self {
            chainrings: vec![24, 34],
            ..Self::standard()
        }
    }

    /// Number of chainrings.
    pub fn front_count(&self) -> u8 {
        self.chainrings.len() as u8
    }

    /// Number of sprockets.
    pub fn rear_count(&self) -> u8 {
        self.sprockets.len() as u8
    }

    /// Tooth count of the chainring selected by a 1-based front gear index.
    pub fn chainring_teeth(&self, front: u8) -> u32 {
        self.chainrings[front as usize - 1]
    }

    /// Tooth count of the sprocket selected by a 1-based rear gear index.
    pub fn sprocket_teeth(&self, rear: u8) -> u32 {
        self.sprockets[rear as usize - 1]
    }

    /// Clamp a front gear index into the valid range.
    pub fn clamp_front(&self, front: u8) -> u8 {
        front.clamp(1, self.front_count())
    }

    /// Clamp a rear gear index into the valid range.
    pub fn clamp_rear(&self, rear: u8) -> u8 {
        rear.clamp(1, self.rear_count())
    }
}

/// Shift toward an easier gear.
///
/// Prefers rear shifts; drops the chainring only once the rear is at the easy
/// end of its working range, compensating with one rear step so the ratio
/// change stays small. No-op at the easiest gear (1,1).
pub fn shift_down(pos: GearPosition, layout: &GearLayout) -> GearPosition {
    let GearPosition { mut front, mut rear } = pos;
    let last_rear = layout.rear_count();

    if rear > 2 {
        rear -= 1;
    } else if rear > 1 && front == 1 {
        rear -= 1;
    } else if front > 1 {
        front -= 1;
        if rear < last_rear - 1 {
            rear += 1;
        }
    }

    GearPosition { front, rear }
}

/// Shift toward a harder gear.
///
/// Mirror of [`shift_down`]: rear shifts until the stiff end of the cassette,
/// then one chainring step up with a compensating rear step. The last sprocket
/// is reserved for the big ring. No-op at the hardest gear.
pub fn shift_up(pos: GearPosition, layout: &GearLayout) -> GearPosition {
    let GearPosition { mut front, mut rear } = pos;
    let last_front = layout.front_count();
    let last_rear = layout.rear_count();

    if rear < last_rear - 1 {
        rear += 1;
    } else if rear < last_rear && front == last_front {
        rear += 1;
    } else if front < last_front {
        front += 1;
        if rear > 2 {
            rear -= 1;
        }
    }

    GearPosition { front, rear }
}
