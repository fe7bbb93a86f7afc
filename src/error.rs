//! Error types for the drive layers.
//!
//! Validation failures are detected before any motor is touched and are
//! reported as [`ArgumentError`] or [`SpeedError`]. Errors raised by the
//! motor driver itself are carried unchanged inside
//! [`DriveError::MotorFault`]; nothing in this crate retries a motor command.
//!
//! A stall detected while waiting is *not* an error. It is reported through
//! [`MotionOutcome::Stalled`](crate::MotionOutcome::Stalled).

use core::fmt;

/// An argument outside the range an operation accepts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArgumentError {
    /// Steering ratio outside `-100..=100`.
    SteeringOutOfRange(f32),
    /// A physical dimension that must be strictly positive was not.
    InvalidDimension {
        /// Which dimension was rejected.
        name: &'static str,
        /// The rejected value in millimeters.
        value: f32,
    },
    /// Arc radius smaller than half the wheel separation.
    ArcRadiusTooSmall {
        /// Requested radius in millimeters.
        radius_mm: f32,
        /// Smallest radius the chassis can follow without reversing a wheel.
        min_radius_mm: f32,
    },
    /// A signed value was given where only non-negative degrees are accepted.
    NegativeDegrees(f32),
    /// NaN or infinity where a finite number is required.
    NotFinite {
        /// Which argument was rejected.
        name: &'static str,
    },
    /// Wheel travel too large for a single motor command.
    TravelOutOfRange(f32),
    /// A motor's rated maximum speed does not match the configured model.
    MotorMismatch {
        /// Maximum native speed of the configured motor model.
        expected_max: u32,
        /// Maximum native speed reported by the motor.
        actual_max: u32,
    },
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SteeringOutOfRange(s) => write!(
                f,
                "steering {} is invalid, must be between -100 and 100 (inclusive)",
                s
            ),
            Self::InvalidDimension { name, value } => {
                write!(f, "{} {}mm is invalid, must be greater than 0", name, value)
            }
            Self::ArcRadiusTooSmall {
                radius_mm,
                min_radius_mm,
            } => write!(
                f,
                "arc radius {}mm is less than the minimum radius {}mm",
                radius_mm, min_radius_mm
            ),
            Self::NegativeDegrees(d) => {
                write!(f, "degrees {} is invalid, must not be negative", d)
            }
            Self::NotFinite { name } => write!(f, "{} must be a finite number", name),
            Self::TravelOutOfRange(d) => write!(
                f,
                "travel {}deg is invalid, must be less than {}deg",
                d,
                u32::MAX
            ),
            Self::MotorMismatch {
                expected_max,
                actual_max,
            } => write!(
                f,
                "motor maximum {}deg/s does not match the configured model ({}deg/s)",
                actual_max, expected_max
            ),
        }
    }
}

/// A speed that has no representation in the motor's native unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpeedError {
    /// The speed (or a value derived from it) is NaN or infinite.
    NotFinite,
    /// Zero speed for a run that only ends once a target is reached.
    Zero,
    /// The converted speed is faster than the motor's rated maximum.
    ExceedsMaximum {
        /// Requested speed in native units (degrees per second).
        native: f32,
        /// The motor's maximum native speed.
        max: u32,
    },
}

impl fmt::Display for SpeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinite => write!(f, "speed must be a finite number"),
            Self::Zero => write!(f, "speed must not be zero when moving to a target"),
            Self::ExceedsMaximum { native, max } => write!(
                f,
                "speed {}deg/s exceeds the motor maximum of {}deg/s",
                native, max
            ),
        }
    }
}

/// Any failure raised by a drive operation.
///
/// `E` is the motor driver's error type ([`Motor::Error`](crate::traits::Motor::Error)).
#[derive(Debug, PartialEq)]
pub enum DriveError<E> {
    /// Rejected argument; no motor was commanded.
    InvalidArgument(ArgumentError),
    /// Speed could not be converted to native units; no motor was commanded.
    InvalidSpeed(SpeedError),
    /// Error reported by the motor driver, passed through unchanged.
    MotorFault(E),
}

impl<E> DriveError<E> {
    /// Returns the motor error if this is a [`MotorFault`](Self::MotorFault).
    pub fn motor_fault(&self) -> Option<&E> {
        match self {
            Self::MotorFault(e) => Some(e),
            _ => None,
        }
    }
}

impl<E> From<ArgumentError> for DriveError<E> {
    fn from(e: ArgumentError) -> Self {
        Self::InvalidArgument(e)
    }
}

impl<E> From<SpeedError> for DriveError<E> {
    fn from(e: SpeedError) -> Self {
        Self::InvalidSpeed(e)
    }
}

impl<E: fmt::Debug> fmt::Display for DriveError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(e) => write!(f, "invalid argument: {}", e),
            Self::InvalidSpeed(e) => write!(f, "invalid speed: {}", e),
            Self::MotorFault(e) => write!(f, "motor fault: {:?}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ArgumentError {}

#[cfg(feature = "std")]
impl std::error::Error for SpeedError {}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for DriveError<E> {}
