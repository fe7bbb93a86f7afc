//! Typed speed and distance values.
//!
//! Every motion command in this crate takes a [`Speed`] and, where it travels
//! a real-world distance, a [`Distance`]. Both are small `Copy` enums with one
//! variant per unit, so the unit travels with the number and conversions are
//! checked exhaustively at compile time.
//!
//! # Native speed unit
//!
//! Motors are commanded in degrees per second, rounded to an integer. A
//! [`Speed::Percent`] value is relative to the motor's rated maximum; the
//! other variants are absolute and convert by fixed ratios
//! (1 rotation = 360 degrees, 1 minute = 60 seconds).
//!
//! # Example
//!
//! ```rust
//! use rs_tankdrive::units::{Distance, Speed};
//!
//! // 50% of a motor rated at 810 deg/s
//! assert_eq!(Speed::Percent(50.0).to_native(810), Ok(405));
//! assert_eq!(Speed::RotationsPerMinute(60.0).to_native(810), Ok(360));
//!
//! assert_eq!(Distance::Centimeters(50.0).to_millimeters(), 500.0);
//! assert_eq!(Distance::Studs(11.0).to_millimeters(), 88.0);
//! ```

use core::fmt;
use core::ops::{Mul, Neg};

use crate::error::SpeedError;

/// Degrees in one full rotation.
pub const DEGREES_PER_ROTATION: f32 = 360.0;

/// Seconds in one minute.
pub const SECONDS_PER_MINUTE: f32 = 60.0;

/// Millimeters per centimeter.
pub const CENTIMETER_MM: f32 = 10.0;
/// Millimeters per decimeter.
pub const DECIMETER_MM: f32 = 100.0;
/// Millimeters per meter.
pub const METER_MM: f32 = 1000.0;
/// Millimeters per inch.
pub const INCH_MM: f32 = 25.4;
/// Millimeters per foot.
pub const FOOT_MM: f32 = 304.8;
/// Millimeters per yard.
pub const YARD_MM: f32 = 914.4;
/// Millimeters per LEGO stud.
pub const STUD_MM: f32 = 8.0;

// ============================================================================
// Speed
// ============================================================================

/// A signed rotational speed in one of several units.
///
/// Negative values run the motor backwards.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "unit", content = "value", rename_all = "snake_case"))]
pub enum Speed {
    /// Percentage of the motor's rated maximum (`-100.0..=100.0`).
    Percent(f32),
    /// Rotations per minute.
    RotationsPerMinute(f32),
    /// Rotations per second.
    RotationsPerSecond(f32),
    /// Degrees per minute.
    DegreesPerMinute(f32),
    /// Degrees per second (the native unit).
    DegreesPerSecond(f32),
}

impl Speed {
    /// The magnitude as given, in this value's own unit.
    pub const fn value(&self) -> f32 {
        match *self {
            Speed::Percent(v)
            | Speed::RotationsPerMinute(v)
            | Speed::RotationsPerSecond(v)
            | Speed::DegreesPerMinute(v)
            | Speed::DegreesPerSecond(v) => v,
        }
    }

    /// Same unit, different magnitude.
    const fn with_value(&self, v: f32) -> Self {
        match self {
            Speed::Percent(_) => Speed::Percent(v),
            Speed::RotationsPerMinute(_) => Speed::RotationsPerMinute(v),
            Speed::RotationsPerSecond(_) => Speed::RotationsPerSecond(v),
            Speed::DegreesPerMinute(_) => Speed::DegreesPerMinute(v),
            Speed::DegreesPerSecond(_) => Speed::DegreesPerSecond(v),
        }
    }

    /// Unrounded speed in degrees per second.
    ///
    /// `max_native_speed` only matters for [`Speed::Percent`].
    pub fn degrees_per_second(&self, max_native_speed: u32) -> f32 {
        match *self {
            Speed::Percent(p) => p / 100.0 * max_native_speed as f32,
            Speed::RotationsPerMinute(r) => r * DEGREES_PER_ROTATION / SECONDS_PER_MINUTE,
            Speed::RotationsPerSecond(r) => r * DEGREES_PER_ROTATION,
            Speed::DegreesPerMinute(d) => d / SECONDS_PER_MINUTE,
            Speed::DegreesPerSecond(d) => d,
        }
    }

    /// Convert to the motor's native unit (integer degrees per second).
    ///
    /// The result is rounded to the nearest integer. A non-zero speed never
    /// rounds down to zero, so the sign of the input is always preserved.
    ///
    /// # Errors
    ///
    /// - [`SpeedError::NotFinite`] for NaN or infinite input
    /// - [`SpeedError::ExceedsMaximum`] if the magnitude is above `max_native_speed`
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_tankdrive::units::Speed;
    ///
    /// assert_eq!(Speed::Percent(-100.0).to_native(1050), Ok(-1050));
    /// assert_eq!(Speed::DegreesPerSecond(0.2).to_native(810), Ok(1));
    /// assert!(Speed::RotationsPerSecond(3.0).to_native(810).is_err());
    /// ```
    pub fn to_native(&self, max_native_speed: u32) -> Result<i32, SpeedError> {
        let raw = self.degrees_per_second(max_native_speed);
        if !raw.is_finite() {
            return Err(SpeedError::NotFinite);
        }

        let mut native = libm::roundf(raw);
        if native == 0.0 && raw != 0.0 {
            native = if raw > 0.0 { 1.0 } else { -1.0 };
        }

        if libm::fabsf(native) > max_native_speed as f32 {
            return Err(SpeedError::ExceedsMaximum {
                native,
                max: max_native_speed,
            });
        }

        Ok(native as i32)
    }

    /// Short unit suffix used by `Display`.
    pub const fn unit_suffix(&self) -> &'static str {
        match self {
            Speed::Percent(_) => "%",
            Speed::RotationsPerMinute(_) => "rpm",
            Speed::RotationsPerSecond(_) => "rps",
            Speed::DegreesPerMinute(_) => "dpm",
            Speed::DegreesPerSecond(_) => "dps",
        }
    }
}

impl Mul<f32> for Speed {
    type Output = Speed;

    fn mul(self, rhs: f32) -> Speed {
        self.with_value(self.value() * rhs)
    }
}

impl Neg for Speed {
    type Output = Speed;

    fn neg(self) -> Speed {
        self.with_value(-self.value())
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value(), self.unit_suffix())
    }
}

// ============================================================================
// Distance
// ============================================================================

/// A signed linear distance in one of several units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "unit", content = "value", rename_all = "snake_case"))]
pub enum Distance {
    /// Millimeters.
    Millimeters(f32),
    /// Centimeters.
    Centimeters(f32),
    /// Decimeters.
    Decimeters(f32),
    /// Meters.
    Meters(f32),
    /// Feet.
    Feet(f32),
    /// Inches.
    Inches(f32),
    /// Yards.
    Yards(f32),
    /// LEGO studs (8 mm each).
    Studs(f32),
}

impl Distance {
    /// The magnitude as given, in this value's own unit.
    pub const fn value(&self) -> f32 {
        match *self {
            Distance::Millimeters(v)
            | Distance::Centimeters(v)
            | Distance::Decimeters(v)
            | Distance::Meters(v)
            | Distance::Feet(v)
            | Distance::Inches(v)
            | Distance::Yards(v)
            | Distance::Studs(v) => v,
        }
    }

    const fn with_value(&self, v: f32) -> Self {
        match self {
            Distance::Millimeters(_) => Distance::Millimeters(v),
            Distance::Centimeters(_) => Distance::Centimeters(v),
            Distance::Decimeters(_) => Distance::Decimeters(v),
            Distance::Meters(_) => Distance::Meters(v),
            Distance::Feet(_) => Distance::Feet(v),
            Distance::Inches(_) => Distance::Inches(v),
            Distance::Yards(_) => Distance::Yards(v),
            Distance::Studs(_) => Distance::Studs(v),
        }
    }

    /// Millimeters per one unit of this variant.
    pub const fn millimeters_per_unit(&self) -> f32 {
        match self {
            Distance::Millimeters(_) => 1.0,
            Distance::Centimeters(_) => CENTIMETER_MM,
            Distance::Decimeters(_) => DECIMETER_MM,
            Distance::Meters(_) => METER_MM,
            Distance::Feet(_) => FOOT_MM,
            Distance::Inches(_) => INCH_MM,
            Distance::Yards(_) => YARD_MM,
            Distance::Studs(_) => STUD_MM,
        }
    }

    /// Convert to millimeters.
    pub fn to_millimeters(&self) -> f32 {
        self.value() * self.millimeters_per_unit()
    }

    /// Short unit suffix used by `Display`.
    pub const fn unit_suffix(&self) -> &'static str {
        match self {
            Distance::Millimeters(_) => "mm",
            Distance::Centimeters(_) => "cm",
            Distance::Decimeters(_) => "dm",
            Distance::Meters(_) => "m",
            Distance::Feet(_) => "ft",
            Distance::Inches(_) => "in",
            Distance::Yards(_) => "yd",
            Distance::Studs(_) => "stud",
        }
    }
}

impl Mul<f32> for Distance {
    type Output = Distance;

    fn mul(self, rhs: f32) -> Distance {
        self.with_value(self.value() * rhs)
    }
}

impl Neg for Distance {
    type Output = Distance;

    fn neg(self) -> Distance {
        self.with_value(-self.value())
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value(), self.unit_suffix())
    }
}
