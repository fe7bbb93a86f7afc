//! Synchronized two-motor drive.
//!
//! [`TankDrive`] owns a left and a right [`Motor`] and issues every command to
//! both of them before returning, so the wheels start together. Commands that
//! end on their own (degrees, time, position) can optionally block until both
//! motors report that they have stopped, or until either one stalls.
//!
//! # Example
//!
//! ```rust
//! use rs_tankdrive::hal::{MockDelay, MockMotor};
//! use rs_tankdrive::traits::DriveControl;
//! use rs_tankdrive::units::Speed;
//! use rs_tankdrive::{MotionOutcome, TankDrive};
//!
//! let mut tank = TankDrive::with_delay(MockMotor::new(), MockMotor::new(), MockDelay::new());
//!
//! // Left wheel one turn forward, right wheel half a turn forward
//! let outcome = tank
//!     .run_for_degrees(360.0, 180.0, Speed::Percent(50.0), true)
//!     .unwrap();
//! assert_eq!(outcome, MotionOutcome::Completed);
//! assert_eq!(tank.positions().unwrap(), (360, 180));
//! ```
//!
//! # Waiting
//!
//! A blocking call polls `is_stalled` and `is_running` every
//! [`DriveConfig::poll_interval_ms`], on the motors the last command actually
//! started. A wheel left idle by a degree run is not polled, so a stall it
//! latched during an earlier motion does not end the current one. A stall is reported as
//! [`MotionOutcome::Stalled`], not as an error, because some manoeuvres (driving
//! into a wall to square up) expect it.

use embedded_hal::delay::DelayNs;

use crate::config::DriveConfig;
use crate::error::{ArgumentError, DriveError, SpeedError};
use crate::traits::{Delay, DriveControl, Motor, StopAction};
use crate::units::Speed;

/// How a motion command ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MotionOutcome {
    /// Commands were issued and the call returned without waiting.
    Started,
    /// Both motors finished.
    Completed,
    /// At least one motor stalled before finishing.
    Stalled {
        /// Left motor reported a stall.
        left: bool,
        /// Right motor reported a stall.
        right: bool,
    },
}

impl MotionOutcome {
    /// Returns true if either motor stalled.
    pub fn is_stalled(&self) -> bool {
        matches!(self, MotionOutcome::Stalled { .. })
    }
}

/// Per-wheel command computed for a degree-based run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelCommand {
    /// Native speed, signed by direction, before polarity is applied.
    pub speed: i32,
    /// Degrees to travel; zero means the wheel is not commanded.
    pub degrees: u32,
}

/// Two motors driven as a matched pair.
///
/// # Type Parameters
///
/// - `M`: the motor driver ([`Motor`] trait), same type on both sides
/// - `D`: blocking delay used between polls while waiting
///
/// # Ownership
///
/// The drive owns both motors for its whole lifetime. Use
/// [`into_parts`](Self::into_parts) to get them back.
pub struct TankDrive<M: Motor, D> {
    left: M,
    right: M,
    delay: D,
    config: DriveConfig,
    // (left, right) commanded by the last motion
    active: (bool, bool),
}

#[cfg(feature = "std")]
impl<M: Motor> TankDrive<M, crate::hal::StdDelay> {
    /// Create a drive that sleeps the calling thread while waiting.
    pub fn new(left: M, right: M) -> Self {
        Self::with_delay(left, right, crate::hal::StdDelay)
    }
}

impl<M: Motor, D: DelayNs> TankDrive<M, D> {
    /// Create a drive with an explicit blocking delay.
    pub fn with_delay(left: M, right: M, delay: D) -> Self {
        Self {
            left,
            right,
            delay,
            config: DriveConfig::default(),
            active: (true, true),
        }
    }

    /// Replace the drive configuration.
    pub fn with_config(mut self, config: DriveConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// The left motor.
    pub fn left(&self) -> &M {
        &self.left
    }

    /// The right motor.
    pub fn right(&self) -> &M {
        &self.right
    }

    /// Mutable access to the left motor.
    pub fn left_mut(&mut self) -> &mut M {
        &mut self.left
    }

    /// Mutable access to the right motor.
    pub fn right_mut(&mut self) -> &mut M {
        &mut self.right
    }

    /// The blocking delay.
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Give back the motors and the delay.
    pub fn into_parts(self) -> (M, M, D) {
        (self.left, self.right, self.delay)
    }

    /// Run both motors until told to stop.
    ///
    /// Returns as soon as both commands have been issued.
    pub fn run_at_speed(&mut self, left: Speed, right: Speed) -> Result<(), DriveError<M::Error>> {
        let left_native = left.to_native(self.left.max_speed())?;
        let right_native = right.to_native(self.right.max_speed())?;
        tracing::debug!(
            drive = self.config.name.as_str(),
            left_native,
            right_native,
            "run_at_speed"
        );

        self.active = (true, true);
        self.left
            .run_at_speed(self.config.left_polarity.apply(left_native))
            .map_err(DriveError::MotorFault)?;
        self.right
            .run_at_speed(self.config.right_polarity.apply(right_native))
            .map_err(DriveError::MotorFault)?;
        Ok(())
    }

    /// Rotate each wheel by its own signed number of degrees.
    ///
    /// The wheel with the larger travel runs at `speed`; the other runs
    /// proportionally slower so both finish together. The direction of each
    /// wheel is the sign of its degrees times the sign of `speed`. If both
    /// travels round to zero nothing is commanded and the call returns
    /// [`MotionOutcome::Completed`] at once.
    ///
    /// # Errors
    ///
    /// - [`SpeedError::Zero`] if `speed` is zero while a wheel has to move
    /// - [`ArgumentError::TravelOutOfRange`] if a travel does not fit a `u32`
    pub fn run_for_degrees(
        &mut self,
        left_degrees: f32,
        right_degrees: f32,
        speed: Speed,
        block: bool,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        let (left_cmd, right_cmd) = self.plan_degrees(left_degrees, right_degrees, speed)?;
        if left_cmd.degrees == 0 && right_cmd.degrees == 0 {
            return Ok(MotionOutcome::Completed);
        }
        tracing::debug!(
            drive = self.config.name.as_str(),
            left_degrees = left_cmd.degrees,
            left_speed = left_cmd.speed,
            right_degrees = right_cmd.degrees,
            right_speed = right_cmd.speed,
            "run_for_degrees"
        );

        let stop = self.config.stop_action;
        self.active = (left_cmd.degrees > 0, right_cmd.degrees > 0);
        if left_cmd.degrees > 0 {
            self.left
                .run_for_degrees(
                    self.config.left_polarity.apply(left_cmd.speed),
                    left_cmd.degrees,
                    stop,
                    false,
                )
                .map_err(DriveError::MotorFault)?;
        }
        if right_cmd.degrees > 0 {
            self.right
                .run_for_degrees(
                    self.config.right_polarity.apply(right_cmd.speed),
                    right_cmd.degrees,
                    stop,
                    false,
                )
                .map_err(DriveError::MotorFault)?;
        }

        self.finish(block)
    }

    /// Work out the per-wheel speed and travel for [`run_for_degrees`](Self::run_for_degrees)
    /// without touching the motors.
    pub fn plan_degrees(
        &self,
        left_degrees: f32,
        right_degrees: f32,
        speed: Speed,
    ) -> Result<(WheelCommand, WheelCommand), DriveError<M::Error>> {
        if !left_degrees.is_finite() {
            return Err(ArgumentError::NotFinite {
                name: "left degrees",
            }
            .into());
        }
        if !right_degrees.is_finite() {
            return Err(ArgumentError::NotFinite {
                name: "right degrees",
            }
            .into());
        }

        let lead = libm::fabsf(left_degrees).max(libm::fabsf(right_degrees));
        let left = wheel_command(left_degrees, lead, speed, self.left.max_speed())?;
        let right = wheel_command(right_degrees, lead, speed, self.right.max_speed())?;
        Ok((left, right))
    }

    /// Run both motors for `duration_ms`, then apply the configured stop action.
    ///
    /// The timed stop is carried out by each motor, so it still happens when
    /// `block` is false and the caller moves on. A zero duration is a no-op.
    pub fn run_for_time(
        &mut self,
        left: Speed,
        right: Speed,
        duration_ms: u32,
        block: bool,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        let left_native = left.to_native(self.left.max_speed())?;
        let right_native = right.to_native(self.right.max_speed())?;
        if duration_ms == 0 {
            return Ok(MotionOutcome::Completed);
        }
        tracing::debug!(
            drive = self.config.name.as_str(),
            duration_ms,
            left_native,
            right_native,
            "run_for_time"
        );

        let stop = self.config.stop_action;
        self.active = (true, true);
        self.left
            .run_for_time(
                self.config.left_polarity.apply(left_native),
                duration_ms,
                stop,
                false,
            )
            .map_err(DriveError::MotorFault)?;
        self.right
            .run_for_time(
                self.config.right_polarity.apply(right_native),
                duration_ms,
                stop,
                false,
            )
            .map_err(DriveError::MotorFault)?;

        self.finish(block)
    }

    /// Drive each motor to an absolute encoder position at `speed`.
    ///
    /// Direction is chosen by the motor; only the magnitude of `speed` is used,
    /// and it must not be zero.
    pub fn run_to_position(
        &mut self,
        left_target: i32,
        right_target: i32,
        speed: Speed,
        block: bool,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        let left_native = speed.to_native(self.left.max_speed())?.abs();
        let right_native = speed.to_native(self.right.max_speed())?.abs();
        if left_native == 0 || right_native == 0 {
            return Err(SpeedError::Zero.into());
        }
        tracing::debug!(
            drive = self.config.name.as_str(),
            left_target,
            right_target,
            left_native,
            right_native,
            "run_to_position"
        );

        let stop = self.config.stop_action;
        self.active = (true, true);
        self.left
            .run_to_position(left_native, left_target, stop, false)
            .map_err(DriveError::MotorFault)?;
        self.right
            .run_to_position(right_native, right_target, stop, false)
            .map_err(DriveError::MotorFault)?;

        self.finish(block)
    }

    fn finish(&mut self, block: bool) -> Result<MotionOutcome, DriveError<M::Error>> {
        if block {
            self.wait()
        } else {
            Ok(MotionOutcome::Started)
        }
    }
}

/// Speed and travel for one wheel, given the larger of the two travels.
fn wheel_command<E>(
    degrees: f32,
    lead_degrees: f32,
    speed: Speed,
    max_speed: u32,
) -> Result<WheelCommand, DriveError<E>> {
    let travel = libm::roundf(libm::fabsf(degrees));
    if travel == 0.0 {
        return Ok(WheelCommand {
            speed: 0,
            degrees: 0,
        });
    }

    if travel >= u32::MAX as f32 {
        return Err(ArgumentError::TravelOutOfRange(travel).into());
    }

    let ratio = degrees / lead_degrees;
    let native = (speed * ratio).to_native(max_speed)?;
    if native == 0 {
        return Err(SpeedError::Zero.into());
    }
    Ok(WheelCommand {
        speed: native,
        degrees: travel as u32,
    })
}

impl<M: Motor, D: DelayNs> DriveControl for TankDrive<M, D> {
    type Error = M::Error;

    fn stop(&mut self, left: StopAction, right: StopAction) -> Result<(), DriveError<M::Error>> {
        tracing::debug!(
            drive = self.config.name.as_str(),
            left = left.as_str(),
            right = right.as_str(),
            "stop"
        );
        self.left.stop(left).map_err(DriveError::MotorFault)?;
        self.right.stop(right).map_err(DriveError::MotorFault)?;
        Ok(())
    }

    fn poll_motion(&mut self) -> Result<Option<MotionOutcome>, DriveError<M::Error>> {
        let (left_active, right_active) = self.active;
        let left_stalled =
            left_active && self.left.is_stalled().map_err(DriveError::MotorFault)?;
        let right_stalled =
            right_active && self.right.is_stalled().map_err(DriveError::MotorFault)?;
        if left_stalled || right_stalled {
            tracing::warn!(
                drive = self.config.name.as_str(),
                left_stalled,
                right_stalled,
                "motor stalled"
            );
            return Ok(Some(MotionOutcome::Stalled {
                left: left_stalled,
                right: right_stalled,
            }));
        }

        let left_running =
            left_active && self.left.is_running().map_err(DriveError::MotorFault)?;
        let right_running =
            right_active && self.right.is_running().map_err(DriveError::MotorFault)?;
        if left_running || right_running {
            Ok(None)
        } else {
            Ok(Some(MotionOutcome::Completed))
        }
    }

    fn wait(&mut self) -> Result<MotionOutcome, DriveError<M::Error>> {
        loop {
            if let Some(outcome) = self.poll_motion()? {
                return Ok(outcome);
            }
            self.delay.delay_ms(self.config.poll_interval_ms);
        }
    }

    async fn wait_async<A: Delay>(
        &mut self,
        delay: &mut A,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        loop {
            if let Some(outcome) = self.poll_motion()? {
                return Ok(outcome);
            }
            delay.delay_ms(self.config.poll_interval_ms).await;
        }
    }

    fn positions(&self) -> Result<(i32, i32), DriveError<M::Error>> {
        let left = self.left.position().map_err(DriveError::MotorFault)?;
        let right = self.right.position().map_err(DriveError::MotorFault)?;
        Ok((left, right))
    }
}
