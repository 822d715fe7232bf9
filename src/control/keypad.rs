//! Directional input loop.
//!
//! Polls the key pad direction every 20 ms and turns it into power
//! adjustments and shift requests with edge + repeat-after-delay semantics:
//! one immediate step on a new press, a ~400 ms pause, then one step per
//! cycle while the button stays held. Shifts are edge-triggered only. The
//! whole loop is inert while erg mode is active.

use crate::state::store::RideState;
use crate::state::types::Direction;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Polling period for the key pad.
pub const POLL_PERIOD: Duration = Duration::from_millis(20);

/// Cycles a direction must be held before the repeat phase starts.
const REPEAT_DELAY: u32 = 20;

/// Watts added or removed per Up/Down step.
const POWER_STEP: i32 = 5;

/// Effect of one polling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadAction {
    /// Adjust target power by this many watts
    AdjustPower(i32),
    /// One shift toward an easier gear
    ShiftDown,
    /// One shift toward a harder gear
    ShiftUp,
}

/// Edge/repeat state for the directional input.
///
/// `streak` counts consecutive cycles with an unchanged direction; 0 marks
/// the press edge.
#[derive(Debug, Default)]
pub struct DirectionTracker {
    last_direction: Direction,
    streak: u32,
}

impl DirectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one polled direction and get the action it produces, if any.
    pub fn observe(&mut self, direction: Direction) -> Option<KeypadAction> {
        self.streak = if direction == self.last_direction {
            self.streak.saturating_add(1)
        } else {
            0
        };

        let repeating = self.streak == 0 || self.streak > REPEAT_DELAY;

        let action = match direction {
            Direction::Up if repeating => Some(KeypadAction::AdjustPower(POWER_STEP)),
            Direction::Down if repeating => Some(KeypadAction::AdjustPower(-POWER_STEP)),
            Direction::Left if self.streak == 0 => Some(KeypadAction::ShiftDown),
            Direction::Right if self.streak == 0 => Some(KeypadAction::ShiftUp),
            _ => None,
        };

        self.last_direction = direction;
        action
    }
}

/// Perpetual 20 ms polling cycle; exits at the cycle boundary after the
/// shutdown flag is set.
pub(crate) async fn keypad_loop(state: Arc<RideState>, shutdown: Arc<AtomicBool>) {
    let mut tracker = DirectionTracker::new();

    while !shutdown.load(Ordering::SeqCst) {
        // Erg mode disables manual power/gear input entirely; the tracker
        // does not advance either, matching a frozen key pad.
        if !state.erg_mode() {
            match tracker.observe(state.keypad_direction()) {
                Some(KeypadAction::AdjustPower(delta)) => state.adjust_target_power(delta),
                Some(KeypadAction::ShiftDown) => state.shift_down(),
                Some(KeypadAction::ShiftUp) => state.shift_up(),
                None => {}
            }
        }

        tokio::time::sleep(POLL_PERIOD).await;
    }

    tracing::debug!("Key pad loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_edge_acts_immediately() {
        let mut tracker = DirectionTracker::new();
        assert_eq!(
            tracker.observe(Direction::Up),
            Some(KeypadAction::AdjustPower(5))
        );
    }

    #[test]
    fn test_repeat_law_for_held_up() {
        let mut tracker = DirectionTracker::new();
        let mut adjustments = 0;

        // Streak 0 fires, streaks 1..=20 pause, every streak after repeats.
        for cycle in 0..40 {
            let action = tracker.observe(Direction::Up);
            if action.is_some() {
                adjustments += 1;
            }
            let expected = cycle == 0 || cycle > REPEAT_DELAY;
            assert_eq!(action.is_some(), expected, "cycle {cycle}");
        }

        // 1 edge step + cycles 21..=39.
        assert_eq!(adjustments, 1 + (39 - REPEAT_DELAY));
    }

    #[test]
    fn test_direction_change_resets_streak() {
        let mut tracker = DirectionTracker::new();
        for _ in 0..30 {
            tracker.observe(Direction::Up);
        }

        // Switching direction is a fresh edge with no repeat carry-over.
        assert_eq!(
            tracker.observe(Direction::Down),
            Some(KeypadAction::AdjustPower(-5))
        );
        for _ in 0..REPEAT_DELAY {
            assert_eq!(tracker.observe(Direction::Down), None);
        }
    }

    #[test]
    fn test_shifts_are_edge_triggered_only() {
        let mut tracker = DirectionTracker::new();

        assert_eq!(
            tracker.observe(Direction::Left),
            Some(KeypadAction::ShiftDown)
        );
        for _ in 0..50 {
            assert_eq!(tracker.observe(Direction::Left), None);
        }

        assert_eq!(
            tracker.observe(Direction::Right),
            Some(KeypadAction::ShiftUp)
        );
        for _ in 0..50 {
            assert_eq!(tracker.observe(Direction::Right), None);
        }
    }

    #[test]
    fn test_alternating_presses_shift_once_each() {
        let mut tracker = DirectionTracker::new();
        let mut shifts = 0;

        for _ in 0..10 {
            if tracker.observe(Direction::Left).is_some() {
                shifts += 1;
            }
            if tracker.observe(Direction::Right).is_some() {
                shifts += 1;
            }
        }

        // Every poll is a direction change, so every poll is an edge.
        assert_eq!(shifts, 20);
    }

    #[test]
    fn test_none_produces_no_action() {
        let mut tracker = DirectionTracker::new();
        for _ in 0..100 {
            assert_eq!(tracker.observe(Direction::None), None);
        }
    }

    #[test]
    fn test_release_then_press_is_new_edge() {
        let mut tracker = DirectionTracker::new();
        for _ in 0..30 {
            tracker.observe(Direction::Up);
        }
        tracker.observe(Direction::None);
        assert_eq!(
            tracker.observe(Direction::Up),
            Some(KeypadAction::AdjustPower(5))
        );
    }
}
