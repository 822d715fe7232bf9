//! ErgoDrive - Virtual Drivetrain and Power Target Controller
//!
//! Main entry point: wires the configured store to the control loops and
//! runs until interrupted.

use anyhow::Context;
use ergodrive::{config, Controller, DrivetrainPhysics, RideState};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ErgoDrive v{}", env!("CARGO_PKG_VERSION"));

    let config = config::load_config().context("failed to load configuration")?;
    let layout = config
        .gear_layout()
        .context("invalid drivetrain configuration")?;
    let model = DrivetrainPhysics::new(config.rider.mass_kg);

    let state = Arc::new(RideState::new(layout, Arc::new(model)));
    state.set_erg_mode(config.rider.erg_mode);

    // Stand-in for the presentation layer: log each announced change.
    let mut events = state.subscribe();
    let observer = {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(field) => {
                        let snapshot = state.snapshot();
                        tracing::debug!(
                            "{} changed: {}W target, {:.1} km/h, gear {}",
                            field,
                            snapshot.target_power,
                            snapshot.speed,
                            snapshot.gears
                        );
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Change observer lagged, skipped {} updates", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    };

    let controller = Controller::start(Arc::clone(&state));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    tracing::info!("Interrupt received");

    controller.shutdown().await;
    observer.abort();

    Ok(())
}
