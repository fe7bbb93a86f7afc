//! Drive and chassis configuration.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use rs_tankdrive::config::{ChassisConfig, Config, DriveConfig};
//! use rs_tankdrive::traits::{Polarity, StopAction};
//!
//! // Use defaults (SPIKE wheels, 11 studs apart)
//! let config = Config::default();
//!
//! // Or customize
//! let config = Config::default()
//!     .with_drive(
//!         DriveConfig::default()
//!             .with_left_polarity(Polarity::Reversed)
//!             .with_stop_action(StopAction::Hold),
//!     )
//!     .with_chassis(ChassisConfig::default().with_wheel(62.4, 20.0));
//!
//! let geometry = config.chassis.geometry().unwrap();
//! assert!((geometry.wheel().diameter_mm() - 62.4).abs() < 1e-6);
//! ```

use heapless::String as HString;

use crate::differential::DriveGeometry;
use crate::error::ArgumentError;
use crate::traits::{MotorModel, Polarity, StopAction};
use crate::units::Distance;
use crate::wheel::Wheel;

/// Maximum length for short config strings (drive names)
pub const MAX_SHORT_STRING: usize = 32;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Default interval between motor state polls while waiting.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 10;

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    let take = s.len().min(MAX_SHORT_STRING);
    // Find valid UTF-8 boundary
    let valid_end = s
        .char_indices()
        .take_while(|(i, c)| i + c.len_utf8() <= take)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete robot drive configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// How the drive commands its motors
    pub drive: DriveConfig,
    /// Physical chassis dimensions
    pub chassis: ChassisConfig,
}

impl Config {
    /// Set drive configuration
    pub fn with_drive(mut self, drive: DriveConfig) -> Self {
        self.drive = drive;
        self
    }

    /// Set chassis configuration
    pub fn with_chassis(mut self, chassis: ChassisConfig) -> Self {
        self.chassis = chassis;
        self
    }
}

// ============================================================================
// Drive Config
// ============================================================================

/// Settings used by [`TankDrive`](crate::TankDrive) when issuing commands
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriveConfig {
    /// Human-readable name used in log events
    pub name: ShortString,
    /// Interval between `is_running`/`is_stalled` polls while blocking
    pub poll_interval_ms: u32,
    /// What the motors do when a run command ends
    pub stop_action: StopAction,
    /// Mounting direction of the left motor
    pub left_polarity: Polarity,
    /// Mounting direction of the right motor
    pub right_polarity: Polarity,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            name: short_string("tank"),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            stop_action: StopAction::Brake,
            left_polarity: Polarity::Normal,
            right_polarity: Polarity::Normal,
        }
    }
}

impl DriveConfig {
    /// Set the drive name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }

    /// Set the poll interval (at least 1 ms)
    pub fn with_poll_interval_ms(mut self, ms: u32) -> Self {
        self.poll_interval_ms = ms.max(1);
        self
    }

    /// Set the stop action applied at the end of run commands
    pub fn with_stop_action(mut self, stop: StopAction) -> Self {
        self.stop_action = stop;
        self
    }

    /// Set the left motor polarity
    pub fn with_left_polarity(mut self, polarity: Polarity) -> Self {
        self.left_polarity = polarity;
        self
    }

    /// Set the right motor polarity
    pub fn with_right_polarity(mut self, polarity: Polarity) -> Self {
        self.right_polarity = polarity;
        self
    }
}

// ============================================================================
// Chassis Config
// ============================================================================

/// Physical dimensions of a differential-drive chassis
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChassisConfig {
    /// Wheel diameter in millimeters
    pub wheel_diameter_mm: f32,
    /// Wheel tread width in millimeters
    pub wheel_width_mm: f32,
    /// Distance between the wheel midpoints in millimeters
    pub wheel_separation_mm: f32,
    /// Motor model driving both wheels, checked against the motors by
    /// [`DifferentialDrive::from_config`](crate::DifferentialDrive::from_config)
    pub motor_model: MotorModel,
}

impl Default for ChassisConfig {
    fn default() -> Self {
        let wheel = Wheel::spike();
        Self {
            wheel_diameter_mm: wheel.diameter_mm(),
            wheel_width_mm: wheel.width_mm(),
            wheel_separation_mm: Distance::Studs(11.0).to_millimeters(),
            motor_model: MotorModel::SpikeMedium,
        }
    }
}

impl ChassisConfig {
    /// Set the wheel dimensions
    pub fn with_wheel(mut self, diameter_mm: f32, width_mm: f32) -> Self {
        self.wheel_diameter_mm = diameter_mm;
        self.wheel_width_mm = width_mm;
        self
    }

    /// Set the wheel separation
    pub fn with_wheel_separation(mut self, separation: Distance) -> Self {
        self.wheel_separation_mm = separation.to_millimeters();
        self
    }

    /// Set the motor model
    pub fn with_motor_model(mut self, model: MotorModel) -> Self {
        self.motor_model = model;
        self
    }

    /// Build the configured wheel
    pub fn wheel(&self) -> Result<Wheel, ArgumentError> {
        Wheel::new(self.wheel_diameter_mm, self.wheel_width_mm)
    }

    /// Build the drive geometry (wheel plus separation)
    pub fn geometry(&self) -> Result<DriveGeometry, ArgumentError> {
        DriveGeometry::new(
            self.wheel()?,
            Distance::Millimeters(self.wheel_separation_mm),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
