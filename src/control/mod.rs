//! Concurrent control loops over the shared state store.
//!
//! Two independent perpetual background tasks: the periodic clock refresh and
//! the directional input poller. They never block on each other; all
//! communication goes through the store's mutual-exclusion accessors. The
//! [`Controller`] owns both tasks and the shutdown flag each checks at the
//! top of every cycle.

pub mod clock;
pub mod keypad;

pub use keypad::{DirectionTracker, KeypadAction};

use crate::state::store::RideState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle to the running control loops.
pub struct Controller {
    shutdown: Arc<AtomicBool>,
    clock_task: JoinHandle<()>,
    keypad_task: JoinHandle<()>,
}

impl Controller {
    /// Spawn the clock and key pad loops over the given store.
    pub fn start(state: Arc<RideState>) -> Self {
        tracing::info!("Starting control loops");

        let shutdown = Arc::new(AtomicBool::new(false));

        let clock_task = tokio::spawn(clock::clock_loop(
            Arc::clone(&state),
            Arc::clone(&shutdown),
        ));
        let keypad_task = tokio::spawn(keypad::keypad_loop(state, Arc::clone(&shutdown)));

        Self {
            shutdown,
            clock_task,
            keypad_task,
        }
    }

    /// Signal both loops to stop at their next cycle boundary without
    /// waiting for them.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Signal shutdown and wait for both loops to finish their current
    /// cycle and exit.
    pub async fn shutdown(self) {
        tracing::info!("Stopping control loops");
        self.shutdown.store(true, Ordering::SeqCst);

        if let Err(e) = self.clock_task.await {
            tracing::warn!("Clock loop task failed: {}", e);
        }
        if let Err(e) = self.keypad_task.await {
            tracing::warn!("Key pad loop task failed: {}", e);
        }
    }
}
