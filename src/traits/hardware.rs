//! Hardware abstraction traits for the single-motor driver and delays.
//!
//! The drive layers never talk to a hub port directly. Everything goes
//! through the [`Motor`] trait, which a platform crate implements for its
//! motor driver.
//!
//! # Key Items
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`Motor`] | Run/stop/query a single rotary hub motor |
//! | [`StopAction`] | What a motor does when a run command ends |
//! | [`Polarity`] | Whether positive speed turns a motor forward |
//! | [`MotorModel`] | Rated maximum speed per motor model |
//! | [`Delay`] | Async delay used by non-blocking waits |
//!
//! Blocking waits use [`embedded_hal::delay::DelayNs`] instead of a trait of
//! our own.
//!
//! # Example
//!
//! ```rust
//! use rs_tankdrive::traits::{Motor, StopAction};
//! use rs_tankdrive::hal::MockMotor;
//!
//! let mut motor = MockMotor::new();
//! motor.run_for_degrees(405, 360, StopAction::Brake, false).unwrap();
//! assert_eq!(motor.position().unwrap(), 360);
//! ```

/// What a motor does once a run command finishes (or on `stop`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StopAction {
    /// Cut power and let the motor spin down freely ("float").
    Coast,
    /// Short the windings so the motor stops quickly.
    #[default]
    Brake,
    /// Actively hold the current position.
    Hold,
}

impl StopAction {
    /// Returns the stop action as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            StopAction::Coast => "coast",
            StopAction::Brake => "brake",
            StopAction::Hold => "hold",
        }
    }

    /// Parse a stop action from text.
    ///
    /// Accepts `"coast"`/`"float"`, `"brake"` and `"hold"`, trimmed and
    /// case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_tankdrive::traits::StopAction;
    ///
    /// assert_eq!(StopAction::from_text("float"), Some(StopAction::Coast));
    /// assert_eq!(StopAction::from_text(" HOLD "), Some(StopAction::Hold));
    /// assert_eq!(StopAction::from_text("park"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("coast") || s.eq_ignore_ascii_case("float") {
            Some(StopAction::Coast)
        } else if s.eq_ignore_ascii_case("brake") {
            Some(StopAction::Brake)
        } else if s.eq_ignore_ascii_case("hold") {
            Some(StopAction::Hold)
        } else {
            None
        }
    }
}

/// Mounting direction of a motor.
///
/// The two motors of a tank chassis usually face opposite ways, so one of
/// them must be reversed for positive speeds to drive the robot forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Polarity {
    /// Positive speed turns the wheel forward.
    #[default]
    Normal,
    /// Positive speed turns the wheel backward.
    Reversed,
}

impl Polarity {
    /// Apply this polarity to a native speed.
    #[inline]
    pub const fn apply(&self, native_speed: i32) -> i32 {
        match self {
            Polarity::Normal => native_speed,
            Polarity::Reversed => -native_speed,
        }
    }
}

/// Calibration presets for known motor models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MotorModel {
    /// SPIKE Prime medium angular motor, part 45603 (135 rpm).
    #[default]
    SpikeMedium,
    /// SPIKE Prime large angular motor, part 45602 (175 rpm).
    SpikeLarge,
}

impl MotorModel {
    /// Rated maximum speed in native units (degrees per second).
    pub const fn max_speed(&self) -> u32 {
        match self {
            MotorModel::SpikeMedium => 810,
            MotorModel::SpikeLarge => 1050,
        }
    }

    /// Rated maximum speed in rotations per minute.
    pub const fn max_rpm(&self) -> u32 {
        self.max_speed() * 60 / 360
    }
}

/// Single-motor driver contract.
///
/// Speeds are native units: signed integer degrees per second, where the
/// sign gives the direction. Degrees and durations are unsigned; the
/// direction of a `run_for_degrees` comes from the speed.
///
/// Run commands take a `block` flag. The drive layers always pass `false`
/// and do their own waiting so that both motors start together.
///
/// # Implementation Notes
///
/// - `run_for_time` must stop the motor after `duration_ms` even when
///   `block` is `false` (most hubs do this in firmware)
/// - `is_stalled` should latch until the next run command; the drive only
///   polls motors its last command started
/// - Degree and position runs are never sent with a zero speed
/// - Return errors for disconnected hardware; the drive never retries
pub trait Motor {
    /// Error type for motor operations.
    type Error;

    /// Rated maximum speed in native units, used to resolve percentages.
    fn max_speed(&self) -> u32;

    /// Run until told otherwise.
    fn run_at_speed(&mut self, speed: i32) -> Result<(), Self::Error>;

    /// Rotate by `degrees` relative to the current position.
    fn run_for_degrees(
        &mut self,
        speed: i32,
        degrees: u32,
        stop: StopAction,
        block: bool,
    ) -> Result<(), Self::Error>;

    /// Run for `duration_ms`, then apply `stop`.
    fn run_for_time(
        &mut self,
        speed: i32,
        duration_ms: u32,
        stop: StopAction,
        block: bool,
    ) -> Result<(), Self::Error>;

    /// Rotate to an absolute encoder position.
    fn run_to_position(
        &mut self,
        speed: i32,
        position: i32,
        stop: StopAction,
        block: bool,
    ) -> Result<(), Self::Error>;

    /// Stop immediately.
    fn stop(&mut self, stop: StopAction) -> Result<(), Self::Error>;

    /// Whether a run command is still in progress.
    fn is_running(&self) -> Result<bool, Self::Error>;

    /// Whether the last run command ended in a stall.
    fn is_stalled(&self) -> Result<bool, Self::Error>;

    /// Current encoder position in degrees.
    fn position(&self) -> Result<i32, Self::Error>;
}

/// Async delay trait for cooperative waiting.
///
/// Used by [`DriveControl::wait_async`](crate::traits::DriveControl::wait_async).
/// On embedded targets this typically wraps an executor timer.
pub trait Delay {
    /// Delay for the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32) -> impl core::future::Future<Output = ()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // StopAction Tests
    // =========================================================================

    #[test]
    fn stop_action_default_is_brake() {
        assert_eq!(StopAction::default(), StopAction::Brake);
    }

    #[test]
    fn stop_action_as_str() {
        assert_eq!(StopAction::Coast.as_str(), "coast");
        assert_eq!(StopAction::Brake.as_str(), "brake");
        assert_eq!(StopAction::Hold.as_str(), "hold");
    }

    #[test]
    fn stop_action_from_text() {
        assert_eq!(StopAction::from_text("coast"), Some(StopAction::Coast));
        assert_eq!(StopAction::from_text("Float"), Some(StopAction::Coast));
        assert_eq!(StopAction::from_text("BRAKE"), Some(StopAction::Brake));
        assert_eq!(StopAction::from_text("\thold\n"), Some(StopAction::Hold));
        assert_eq!(StopAction::from_text(""), None);
        assert_eq!(StopAction::from_text("holds"), None);
    }

    // =========================================================================
    // Polarity Tests
    // =========================================================================

    #[test]
    fn polarity_apply() {
        assert_eq!(Polarity::default(), Polarity::Normal);
        assert_eq!(Polarity::Normal.apply(300), 300);
        assert_eq!(Polarity::Reversed.apply(300), -300);
        assert_eq!(Polarity::Reversed.apply(-42), 42);
    }

    // =========================================================================
    // MotorModel Tests
    // =========================================================================

    #[test]
    fn motor_model_limits() {
        assert_eq!(MotorModel::SpikeMedium.max_speed(), 810);
        assert_eq!(MotorModel::SpikeMedium.max_rpm(), 135);
        assert_eq!(MotorModel::SpikeLarge.max_speed(), 1050);
        assert_eq!(MotorModel::SpikeLarge.max_rpm(), 175);
    }
}
