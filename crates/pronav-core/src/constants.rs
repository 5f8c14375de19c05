//! Simulation constants and tuning parameters.

// --- Loop timing ---

/// Default outer frame duration (seconds).
pub const DEFAULT_DT: f64 = 0.06;

/// Bounds applied to the configured frame duration.
pub const MIN_DT: f64 = 0.0004;
pub const MAX_DT: f64 = 1.0;

/// Physics substeps per outer frame.
pub const DEFAULT_PHYSICS_STEPS: u32 = 8;

// --- World ---

pub const DEFAULT_WORLD_WIDTH: f64 = 2400.0;
pub const DEFAULT_WORLD_HEIGHT: f64 = 1600.0;

/// Missiles expire once this far outside the field.
pub const MISSILE_OOB_PADDING: f64 = 2000.0;

// --- Spatial grid ---

/// Default side length of one grid cell.
pub const DEFAULT_GRID_CELL_SIDE: f64 = 100.0;
/// Lower bound on the configured cell side.
pub const MIN_GRID_CELL_SIDE: f64 = 10.0;

/// Extra cells allocated on each axis whenever the grid grows.
pub const GRID_GROW_PADDING: usize = 20;

// --- Air ---

/// Sea-level air density.
pub const AIR_DENSITY: f64 = 1.225;
pub const MIN_AIR_DENSITY: f64 = 0.6;

/// Air density retarget interval range (seconds).
pub const AIR_DENSITY_STEP_MIN_SECS: f64 = 0.2;
pub const AIR_DENSITY_STEP_MAX_SECS: f64 = 5.0;

/// Maximum wind magnitude (either direction).
pub const MAX_WIND_SPEED: f64 = 100.0;

/// Wind retarget interval range (seconds).
pub const WIND_STEP_MIN_SECS: f64 = 10.0;
pub const WIND_STEP_MAX_SECS: f64 = 50.0;

// --- Aerodynamic surfaces ---

/// Maximum speed derived for a surface from its own swept motion.
pub const MAX_SURFACE_SWEEP_SPEED: f64 = 300.0;

/// Angle of attack at which lift has fully stalled (degrees).
pub const STALL_AOA: f64 = 90.0;

/// Drag per unit of airspeed, independent of angle of attack.
pub const PARASITIC_DRAG: f64 = 0.5;

// --- Guidance ---

/// Distance under which a negative closing rate counts as a miss.
pub const MISS_TARGET_DIST: f64 = 300.0;

/// Closing rate (units per second) below which a close target is considered missed.
pub const MISS_CLOSING_RATE: f64 = 1.0;

/// Distance flown after a miss before full authority is restored.
pub const REENGAGE_DIST: f64 = 2500.0;

/// Extra re-engage distance per repeated miss, as a fraction of `REENGAGE_DIST`.
pub const REENGAGE_GROWTH: f64 = 0.1;

/// Distance flown before the guidance law gets full authority.
pub const ARM_DIST: f64 = 600.0;

pub const SIMPLE_PN_GAIN: f64 = 2.0;

/// Multiple of the line-of-sight error added to the velocity heading.
pub const BASIC_LOS_GAIN: f64 = 2.0;
/// Cap on the lead-angle correction (degrees).
pub const BASIC_LOS_MAX_CORRECTION: f64 = 90.0;

pub const ADV_MAX_ROT_RATE: f64 = 1.5;
pub const ADV_MIN_ROT_RATE: f64 = 1.0;
/// Speed at which the rotation rate reaches its minimum.
pub const ADV_MIN_ROT_SPEED: f64 = 600.0;
/// Range at which the terminal rotation boost begins.
pub const ADV_ROT_MOD_DIST: f64 = 1000.0;
pub const ADV_ROT_MOD_AMT: f64 = 1.0;
/// Smaller values wait longer for the predicted impact point to settle.
pub const ADV_IMPACT_POINT_DELTA_THRESH: f64 = 2.0;
/// Closing rate (per substep) needed before aiming fully at the prediction.
pub const ADV_MIN_CLOSE_RATE: f64 = 0.3;
/// Hard cap on forward prediction steps.
pub const ADV_MAX_PREDICTION_STEPS: f64 = 6000.0;

// --- Guided missile ---

pub const MISSILE_LIFESPAN: f64 = 70.0;
/// Fuel burnt per second at full sustain thrust.
pub const MISSILE_BURN_RATE: f64 = 1.7;
pub const MISSILE_THRUST: f64 = 4000.0;
pub const MISSILE_BOOST_THRUST: f64 = 5000.0;
pub const MISSILE_DRY_MASS: f64 = 45.3;
pub const MISSILE_FUEL: f64 = 40.0;
pub const MISSILE_BOOST_FUEL: f64 = 20.0;
/// Once out of fuel, a missile slower than this expires.
pub const MISSILE_MIN_SPEED: f64 = 5.0;
/// Thrust direction offset per degree of tail deflection.
pub const THRUST_VECTOR_AMOUNT: f64 = 1.0;

pub const TAIL_AUTHORITY: f64 = 1.0;
pub const NOSE_AUTHORITY: f64 = 0.0;
/// Speed over which control deflection fades to half authority.
pub const DEFLECTION_FADE_SPEED: f64 = 600.0;
/// Body angle of attack at which deflection is fully suppressed.
pub const MAX_DEFLECTION_AOA: f64 = 110.0;
/// Rotation speed (deg/s) at which deflection is fully suppressed.
pub const MAX_DEFLECTION_ROT_SPEED: f64 = 310.0;

// --- Kill vehicle ---

pub const KV_THRUST: f64 = 3000.0;
pub const KV_MASS: f64 = 35.0;
pub const KV_THRUSTERS: usize = 4;
pub const KV_FUEL: f64 = 30.0;
/// Fuel burnt per second per fully open thruster.
pub const KV_BURN_RATE: f64 = 0.5;

// --- Targets ---

pub const TARGET_MAX_SPEED: f64 = 220.0;
pub const TARGET_MAX_SPIN: f64 = 90.0;
pub const TARGET_POLY_POINTS: usize = 8;
pub const TARGET_POLY_RADIUS: f64 = 50.0;
pub const ERRATIC_POLY_RADIUS: f64 = 22.0;
pub const ERRATIC_MAX_SPIN: f64 = 80.0;
/// Running-average window for erratic target smoothing.
pub const ERRATIC_SMOOTHING: usize = 300;
/// Frames between erratic manoeuvre changes.
pub const ERRATIC_MIN_FRAMES: u32 = 500;
pub const ERRATIC_MAX_FRAMES: u32 = 1000;

// --- Platform ---

pub const PLATFORM_THRUST: f64 = 65.0;
/// Velocity multiplier applied once per frame.
pub const PLATFORM_DAMPING: f64 = 0.9;

// --- Cannon ---

pub const BULLET_SPEED: f64 = 800.0;
pub const BULLET_LIFETIME: f64 = 30.0;
pub const BULLET_PROXIMITY_DIST: f64 = 100.0;
/// Volleys per burst.
pub const BURST_VOLLEYS: u32 = 10;
/// Frames between volleys.
pub const BURST_FRAMES: u32 = 3;
/// Time step of the curved-path aim prediction.
pub const BULLET_PREDICTION_DT: f64 = 0.01;
/// Fragments in the ring released by a detonating round.
pub const FRAGMENT_COUNT: usize = 40;
pub const FRAGMENT_SPEED: f64 = 1000.0;
pub const FRAGMENT_LIFETIME: f64 = 0.4;

// --- Explosions ---

pub const EXPLOSION_RADIUS: f64 = 200.0;
pub const EXPLOSION_DURATION: f64 = 1.4;

// --- Worker hand-off ---

/// Default bound on how long the controller waits for the worker to park.
pub const PARK_TIMEOUT_MS: u64 = 500;
