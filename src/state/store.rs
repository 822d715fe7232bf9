//! Shared ride state store.
//!
//! Single source of truth for every mutable quantity in the simulation. All
//! access goes through accessors that take the store's mutex for the duration
//! of the field access only; after the write commits, the change is announced
//! synchronously on the writer's execution context. Writes to cadence,
//! gradient, or either gear re-run the recalculation engine, which derives
//! target power and speed and, for sensor-triggered writes, evaluates the
//! power-band auto-shift policy.

use crate::drivetrain::{self, GearLayout, GearPosition};
use crate::physics::{DrivetrainPhysics, PowerModel};
use crate::state::types::{Direction, StateField};
use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Auto-shift cadence band in rpm. Actual power below the power this band
/// implies for the current gear and gradient means the rider is over-geared;
/// above it, under-geared.
const MIN_CADENCE: u32 = 70;
const MAX_CADENCE: u32 = 95;

/// m/s to km/h
const MS_TO_KMH: f64 = 3.6;

/// Change-notification channel depth.
const EVENT_CAPACITY: usize = 256;

/// Mutable ride state, guarded by the store's mutex.
#[derive(Debug, Clone)]
struct RideFields {
    clock: DateTime<Local>,
    heart_rate: u32,
    cadence: u32,
    gradient: f64,
    previous_gradient: f64,
    speed: f64,
    erg_mode: bool,
    target_power: i32,
    bike_target_power: i32,
    current_bike_power: i32,
    front_gear: u8,
    rear_gear: u8,
    keypad_direction: Direction,
}

/// Point-in-time copy of the full ride state.
#[derive(Debug, Clone)]
pub struct RideSnapshot {
    pub clock: DateTime<Local>,
    pub heart_rate: u32,
    pub cadence: u32,
    pub gradient: f64,
    pub previous_gradient: f64,
    pub speed: f64,
    pub erg_mode: bool,
    pub target_power: i32,
    pub bike_target_power: i32,
    pub current_bike_power: i32,
    pub gears: GearPosition,
    pub keypad_direction: Direction,
}

/// Shared state store for the trainer simulation.
///
/// Lives for the whole application; the control loops and the sensor feed
/// share one instance behind an [`Arc`].
pub struct RideState {
    fields: Mutex<RideFields>,
    layout: GearLayout,
    model: Arc<dyn PowerModel>,
    event_tx: broadcast::Sender<StateField>,
}

impl RideState {
    /// Create a store over the given gear layout and physics model.
    pub fn new(layout: GearLayout, model: Arc<dyn PowerModel>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            fields: Mutex::new(RideFields {
                clock: Local::now(),
                heart_rate: 0,
                cadence: 0,
                gradient: 0.0,
                previous_gradient: 0.0,
                speed: 0.0,
                erg_mode: false,
                target_power: 25,
                bike_target_power: 25,
                current_bike_power: 0,
                front_gear: 1,
                rear_gear: 1,
                keypad_direction: Direction::None,
            }),
            layout,
            model,
            event_tx,
        }
    }

    /// Create a store with the standard gear layout and stock physics.
    pub fn with_defaults() -> Self {
        Self::new(
            GearLayout::standard(),
            Arc::new(DrivetrainPhysics::default()),
        )
    }

    /// Subscribe to change notifications.
    ///
    /// Every committed mutation is announced exactly once, keyed by field;
    /// observers re-read the current value through the getters.
    pub fn subscribe(&self) -> broadcast::Receiver<StateField> {
        self.event_tx.subscribe()
    }

    /// The fixed gear layout this store was configured with.
    pub fn layout(&self) -> &GearLayout {
        &self.layout
    }

    fn announce(&self, field: StateField) {
        // No receivers is fine; a writer never blocks or fails on this.
        let _ = self.event_tx.send(field);
    }

    // --- Clock ---

    pub fn clock(&self) -> DateTime<Local> {
        self.fields.lock().unwrap().clock
    }

    pub(crate) fn set_clock(&self, clock: DateTime<Local>) {
        self.fields.lock().unwrap().clock = clock;
        self.announce(StateField::Clock);
    }

    // --- Rider vitals ---

    pub fn heart_rate(&self) -> u32 {
        self.fields.lock().unwrap().heart_rate
    }

    pub fn set_heart_rate(&self, heart_rate: u32) {
        self.fields.lock().unwrap().heart_rate = heart_rate;
        self.announce(StateField::HeartRate);
    }

    pub fn cadence(&self) -> u32 {
        self.fields.lock().unwrap().cadence
    }

    /// Set pedal cadence in rpm. Triggers recalculation with auto-shift.
    pub fn set_cadence(&self, cadence: u32) {
        self.fields.lock().unwrap().cadence = cadence;
        self.announce(StateField::Cadence);
        self.recalculate(true);
    }

    // --- Terrain ---

    pub fn gradient(&self) -> f64 {
        self.fields.lock().unwrap().gradient
    }

    pub fn previous_gradient(&self) -> f64 {
        self.fields.lock().unwrap().previous_gradient
    }

    /// Set the simulated road gradient in percent, remembering the prior
    /// value. Triggers recalculation with auto-shift.
    pub fn set_gradient(&self, gradient: f64) {
        {
            let mut fields = self.fields.lock().unwrap();
            fields.previous_gradient = fields.gradient;
            fields.gradient = gradient;
        }
        self.announce(StateField::Gradient);
        self.recalculate(true);
    }

    // --- Motion ---

    pub fn speed(&self) -> f64 {
        self.fields.lock().unwrap().speed
    }

    /// Derived only; recalculation is the single writer.
    fn set_speed(&self, speed: f64) {
        self.fields.lock().unwrap().speed = speed;
        self.announce(StateField::Speed);
    }

    // --- Drivetrain ---

    pub fn gears(&self) -> GearPosition {
        let fields = self.fields.lock().unwrap();
        GearPosition {
            front: fields.front_gear,
            rear: fields.rear_gear,
        }
    }

    /// Tooth count of the currently selected chainring.
    pub fn chainring(&self) -> u32 {
        self.layout.chainring_teeth(self.gears().front)
    }

    /// Tooth count of the currently selected sprocket.
    pub fn sprocket(&self) -> u32 {
        self.layout.sprocket_teeth(self.gears().rear)
    }

    /// Set the front gear index, clamped into the layout's table.
    /// Triggers recalculation without auto-shift.
    pub fn set_front_gear(&self, front: u8) {
        self.fields.lock().unwrap().front_gear = self.layout.clamp_front(front);
        self.announce(StateField::FrontGear);
        self.recalculate(false);
    }

    /// Set the rear gear index, clamped into the layout's table.
    /// Triggers recalculation without auto-shift.
    pub fn set_rear_gear(&self, rear: u8) {
        self.fields.lock().unwrap().rear_gear = self.layout.clamp_rear(rear);
        self.announce(StateField::RearGear);
        self.recalculate(false);
    }

    /// Apply one shift toward an easier gear.
    pub fn shift_down(&self) {
        let current = self.gears();
        let next = drivetrain::shift_down(current, &self.layout);

        if next != current {
            tracing::debug!("Shift down: {} -> {}", current, next);
        }
        if next.front != current.front {
            self.set_front_gear(next.front);
        }
        if next.rear != current.rear {
            self.set_rear_gear(next.rear);
        }
    }

    /// Apply one shift toward a harder gear.
    pub fn shift_up(&self) {
        let current = self.gears();
        let next = drivetrain::shift_up(current, &self.layout);

        if next != current {
            tracing::debug!("Shift up: {} -> {}", current, next);
        }
        if next.front != current.front {
            self.set_front_gear(next.front);
        }
        if next.rear != current.rear {
            self.set_rear_gear(next.rear);
        }
    }

    // --- Power targets ---

    pub fn erg_mode(&self) -> bool {
        self.fields.lock().unwrap().erg_mode
    }

    pub fn set_erg_mode(&self, erg_mode: bool) {
        self.fields.lock().unwrap().erg_mode = erg_mode;
        self.announce(StateField::ErgMode);
    }

    pub fn target_power(&self) -> i32 {
        self.fields.lock().unwrap().target_power
    }

    pub fn set_target_power(&self, target_power: i32) {
        self.fields.lock().unwrap().target_power = target_power;
        self.announce(StateField::TargetPower);
    }

    /// Adjust target power by a delta, flooring at 0 W.
    ///
    /// Single read-modify-write under the lock, so concurrent adjustments
    /// never lose steps.
    pub fn adjust_target_power(&self, delta: i32) {
        {
            let mut fields = self.fields.lock().unwrap();
            fields.target_power = (fields.target_power + delta).max(0);
        }
        self.announce(StateField::TargetPower);
    }

    pub fn bike_target_power(&self) -> i32 {
        self.fields.lock().unwrap().bike_target_power
    }

    pub fn set_bike_target_power(&self, bike_target_power: i32) {
        self.fields.lock().unwrap().bike_target_power = bike_target_power;
        self.announce(StateField::BikeTargetPower);
    }

    pub fn current_bike_power(&self) -> i32 {
        self.fields.lock().unwrap().current_bike_power
    }

    /// Set the power the trainer reports the rider is actually producing.
    pub fn set_current_bike_power(&self, current_bike_power: i32) {
        self.fields.lock().unwrap().current_bike_power = current_bike_power;
        self.announce(StateField::CurrentBikePower);
    }

    // --- Directional input ---

    pub fn keypad_direction(&self) -> Direction {
        self.fields.lock().unwrap().keypad_direction
    }

    pub fn set_keypad_direction(&self, direction: Direction) {
        self.fields.lock().unwrap().keypad_direction = direction;
        self.announce(StateField::KeypadDirection);
    }

    /// Copy of the full state, for display or diagnostics.
    pub fn snapshot(&self) -> RideSnapshot {
        let fields = self.fields.lock().unwrap();
        RideSnapshot {
            clock: fields.clock,
            heart_rate: fields.heart_rate,
            cadence: fields.cadence,
            gradient: fields.gradient,
            previous_gradient: fields.previous_gradient,
            speed: fields.speed,
            erg_mode: fields.erg_mode,
            target_power: fields.target_power,
            bike_target_power: fields.bike_target_power,
            current_bike_power: fields.current_bike_power,
            gears: GearPosition {
                front: fields.front_gear,
                rear: fields.rear_gear,
            },
            keypad_direction: fields.keypad_direction,
        }
    }

    /// Recalculation engine.
    ///
    /// Derives target power and speed from the current cadence, gradient, and
    /// gear. Runs after the triggering setter has released the lock, so the
    /// nested target-power/speed/gear writes take it afresh and cannot
    /// deadlock. `auto_shift` is true for the sensor-triggered call sites
    /// (cadence, gradient) and false for gear writes; the gear setters
    /// re-enter with false, which bounds auto-shift to one gear change per
    /// triggering write.
    fn recalculate(&self, auto_shift: bool) {
        let (cadence, gradient, erg_mode, current_bike_power, gears) = {
            let fields = self.fields.lock().unwrap();
            (
                fields.cadence,
                fields.gradient,
                fields.erg_mode,
                fields.current_bike_power,
                GearPosition {
                    front: fields.front_gear,
                    rear: fields.rear_gear,
                },
            )
        };

        let chainring = self.layout.chainring_teeth(gears.front);
        let sprocket = self.layout.sprocket_teeth(gears.rear);

        let power = self
            .model
            .calculate_power(cadence, gradient, chainring, sprocket)
            .round() as i32;

        if !erg_mode {
            self.set_target_power(power);
        }

        let speed = self.model.calculate_speed(cadence, chainring, sprocket) * MS_TO_KMH;
        self.set_speed(speed);

        if !auto_shift {
            return;
        }

        let min_power = self
            .model
            .calculate_power(MIN_CADENCE, gradient, chainring, sprocket);
        let max_power = self
            .model
            .calculate_power(MAX_CADENCE, gradient, chainring, sprocket);

        if (current_bike_power as f64) < min_power {
            tracing::debug!(
                "Rider at {}W, below band minimum {:.0}W - auto-shifting down",
                current_bike_power,
                min_power
            );
            self.shift_down();
        } else if (current_bike_power as f64) > max_power {
            tracing::debug!(
                "Rider at {}W, above band maximum {:.0}W - auto-shifting up",
                current_bike_power,
                max_power
            );
            self.shift_up();
        }
    }
}
