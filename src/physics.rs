//! Physics collaborator for power and speed calculation.
//!
//! The state store consumes this through the [`PowerModel`] trait: two pure
//! functions mapping cadence, gradient, and gearing onto rider power and road
//! speed. [`DrivetrainPhysics`] is the stock implementation, a simplified
//! cycling force balance (gravity + rolling resistance + aero drag) driven by
//! the fixed-gear relation between cadence and wheel speed.

/// Physics constants
const AIR_DENSITY: f64 = 1.225; // kg/m³ at sea level
const GRAVITY: f64 = 9.81; // m/s²
const DEFAULT_CDA: f64 = 0.32; // m² (hoods position)
const DEFAULT_CRR: f64 = 0.004; // Rolling resistance for road tires
const BIKE_MASS: f64 = 8.0; // kg
const WHEEL_CIRCUMFERENCE: f64 = 2.105; // m (700x25c)
const DRIVETRAIN_EFFICIENCY: f64 = 0.97;

/// Pure power/speed model consumed by the recalculation engine.
///
/// Both functions are side-effect free and called synchronously from within
/// state recalculation.
pub trait PowerModel: Send + Sync {
    /// Power in watts required to hold `cadence_rpm` in the given gear on the
    /// given gradient.
    fn calculate_power(
        &self,
        cadence_rpm: u32,
        gradient_percent: f64,
        chainring_teeth: u32,
        sprocket_teeth: u32,
    ) -> f64;

    /// Road speed in metres per second at `cadence_rpm` in the given gear.
    fn calculate_speed(&self, cadence_rpm: u32, chainring_teeth: u32, sprocket_teeth: u32) -> f64;
}

/// Force-balance model for a rider on a fixed drivetrain.
#[derive(Debug, Clone)]
pub struct DrivetrainPhysics {
    /// Rider mass in kilograms
    pub rider_mass_kg: f64,
    /// Bike mass in kilograms
    pub bike_mass_kg: f64,
    /// Drag coefficient times frontal area (CdA)
    pub cda: f64,
    /// Rolling resistance coefficient
    pub crr: f64,
    /// Driven wheel circumference in metres
    pub wheel_circumference_m: f64,
}

impl Default for DrivetrainPhysics {
    fn default() -> Self {
        Self {
            rider_mass_kg: 75.0,
            bike_mass_kg: BIKE_MASS,
            cda: DEFAULT_CDA,
            crr: DEFAULT_CRR,
            wheel_circumference_m: WHEEL_CIRCUMFERENCE,
        }
    }
}

impl DrivetrainPhysics {
    /// Create a new physics model with the specified rider mass.
    pub fn new(rider_mass_kg: f64) -> Self {
        Self {
            rider_mass_kg,
            ..Default::default()
        }
    }

    /// Total system mass (rider + bike)
    fn total_mass(&self) -> f64 {
        self.rider_mass_kg + self.bike_mass_kg
    }
}

impl PowerModel for DrivetrainPhysics {
    fn calculate_power(
        &self,
        cadence_rpm: u32,
        gradient_percent: f64,
        chainring_teeth: u32,
        sprocket_teeth: u32,
    ) -> f64 {
        let v = self.calculate_speed(cadence_rpm, chainring_teeth, sprocket_teeth);
        if v <= 0.0 {
            return 0.0;
        }

        let mass = self.total_mass();

        // Convert percentage to gradient ratio (rise/run)
        // For small angles: sin(atan(x)) ≈ x / sqrt(1 + x^2)
        let grade_ratio = gradient_percent / 100.0;
        let sin_g = grade_ratio / (1.0 + grade_ratio * grade_ratio).sqrt();
        let cos_g = 1.0 / (1.0 + grade_ratio * grade_ratio).sqrt();

        // Gravity component: positive = resistance (uphill), negative = assistance (downhill)
        let f_gravity = mass * GRAVITY * sin_g;
        let f_rolling = self.crr * mass * GRAVITY * cos_g;
        let f_air = 0.5 * AIR_DENSITY * self.cda * v * v;

        // On a steep enough descent the total force goes negative; a
        // freewheeling rider puts out nothing, not negative watts.
        (v * (f_gravity + f_rolling + f_air) / DRIVETRAIN_EFFICIENCY).max(0.0)
    }

    fn calculate_speed(&self, cadence_rpm: u32, chainring_teeth: u32, sprocket_teeth: u32) -> f64 {
        // One crank revolution turns the wheel ring/sprocket times.
        let ratio = chainring_teeth as f64 / sprocket_teeth as f64;
        cadence_rpm as f64 / 60.0 * ratio * self.wheel_circumference_m
    }
}
