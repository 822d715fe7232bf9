//! Periodic state-refresh loop.
//!
//! Advances the wall-clock display value once per second. No jitter
//! correction; drifting up to one tick per cycle is acceptable.

use crate::state::store::RideState;
use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Refresh period for the clock display.
pub const REFRESH_PERIOD: Duration = Duration::from_secs(1);

/// Perpetual 1 s refresh cycle; exits at the cycle boundary after the
/// shutdown flag is set.
pub(crate) async fn clock_loop(state: Arc<RideState>, shutdown: Arc<AtomicBool>) {
    while !shutdown.load(Ordering::SeqCst) {
        state.set_clock(Local::now());
        tokio::time::sleep(REFRESH_PERIOD).await;
    }

    tracing::debug!("Clock loop stopped");
}
