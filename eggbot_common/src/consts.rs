//! Machine-wide constants for the eggbot workspace.
//!
//! Single source of truth for angles, defaults and paths shared by all crates.

/// One full revolution of an axis, in degrees.
pub const FULL_REVOLUTION: f64 = 360.0;

/// Highest duty an actuator accepts, in percent.
pub const MAX_DUTY: f64 = 100.0;

/// Default settle delay between homing and the first primitive [ms].
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 4000;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/eggbot.toml";

/// Default driver name.
pub const DEFAULT_DRIVER: &str = "simulation";

/// Number of samples in the fixed-sweep circle variant.
pub const FIXED_SWEEP_SAMPLES: u32 = 360;
