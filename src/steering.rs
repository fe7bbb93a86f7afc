//! Single-ratio steering on top of [`TankDrive`].
//!
//! A steering value in `-100..=100` picks how the two wheel speeds relate:
//!
//! | steering | left | right |
//! |----------|------|-------|
//! | -100 | `-speed` | `speed` |
//! | -50 | 0 | `speed` |
//! | 0 | `speed` | `speed` |
//! | 50 | `speed` | 0 |
//! | 100 | `speed` | `-speed` |
//!
//! The outer wheel always runs at the requested speed. The inner wheel is
//! scaled by `(50 - |steering|) / 50`, so it slows, stops at 50 and reverses
//! beyond it. This is a skid-steer ratio, not Ackermann geometry.

use embedded_hal::delay::DelayNs;

use crate::error::{ArgumentError, DriveError};
use crate::tank::{MotionOutcome, TankDrive};
use crate::traits::{Delay, DriveControl, Motor, StopAction};
use crate::units::Speed;

/// Largest accepted steering magnitude.
pub const MAX_STEERING: f32 = 100.0;

/// Left and right speed multipliers for `steering`.
///
/// # Errors
///
/// [`ArgumentError::SteeringOutOfRange`] if `steering` is NaN or outside
/// `-100..=100`.
///
/// # Example
///
/// ```rust
/// use rs_tankdrive::steering::steering_factors;
///
/// assert_eq!(steering_factors(0.0).unwrap(), (1.0, 1.0));
/// assert_eq!(steering_factors(-100.0).unwrap(), (-1.0, 1.0));
/// assert_eq!(steering_factors(25.0).unwrap(), (1.0, 0.5));
/// assert!(steering_factors(150.0).is_err());
/// ```
pub fn steering_factors(steering: f32) -> Result<(f32, f32), ArgumentError> {
    if !(-MAX_STEERING..=MAX_STEERING).contains(&steering) {
        return Err(ArgumentError::SteeringOutOfRange(steering));
    }

    let factor = (50.0 - libm::fabsf(steering)) / 50.0;
    if steering >= 0.0 {
        Ok((1.0, factor))
    } else {
        Ok((factor, 1.0))
    }
}

/// Left and right speeds for `steering` at `speed`.
pub fn steering_speeds(steering: f32, speed: Speed) -> Result<(Speed, Speed), ArgumentError> {
    let (left, right) = steering_factors(steering)?;
    Ok((speed * left, speed * right))
}

/// A tank drive commanded by a steering ratio and one speed.
///
/// # Example
///
/// ```rust
/// use rs_tankdrive::hal::{MockDelay, MockMotor, MotorCommand};
/// use rs_tankdrive::units::Speed;
/// use rs_tankdrive::{SteeringDrive, TankDrive};
///
/// let tank = TankDrive::with_delay(MockMotor::new(), MockMotor::new(), MockDelay::new());
/// let mut drive = SteeringDrive::new(tank);
///
/// // Gentle right curve: right wheel at half speed
/// drive.run_at_speed(25.0, Speed::DegreesPerSecond(400.0)).unwrap();
/// assert_eq!(drive.tank().left().commands, vec![MotorCommand::RunAtSpeed(400)]);
/// assert_eq!(drive.tank().right().commands, vec![MotorCommand::RunAtSpeed(200)]);
/// ```
pub struct SteeringDrive<M: Motor, D> {
    tank: TankDrive<M, D>,
}

impl<M: Motor, D: DelayNs> From<TankDrive<M, D>> for SteeringDrive<M, D> {
    fn from(tank: TankDrive<M, D>) -> Self {
        Self::new(tank)
    }
}

impl<M: Motor, D: DelayNs> SteeringDrive<M, D> {
    /// Wrap a tank drive.
    pub fn new(tank: TankDrive<M, D>) -> Self {
        Self { tank }
    }

    /// The underlying tank drive.
    pub fn tank(&self) -> &TankDrive<M, D> {
        &self.tank
    }

    /// Mutable access to the underlying tank drive.
    pub fn tank_mut(&mut self) -> &mut TankDrive<M, D> {
        &mut self.tank
    }

    /// Unwrap into the tank drive.
    pub fn into_inner(self) -> TankDrive<M, D> {
        self.tank
    }

    /// Run until stopped, steering by `steering`.
    pub fn run_at_speed(&mut self, steering: f32, speed: Speed) -> Result<(), DriveError<M::Error>> {
        let (left, right) = steering_speeds(steering, speed)?;
        self.tank.run_at_speed(left, right)
    }

    /// Turn the outer wheel `degrees` at `speed`, steering by `steering`.
    ///
    /// The inner wheel covers a proportional share of `degrees` so both
    /// wheels finish at the same time. Negative `degrees` drive backwards.
    pub fn run_for_degrees(
        &mut self,
        steering: f32,
        speed: Speed,
        degrees: f32,
        block: bool,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        let (left, right) = steering_factors(steering)?;
        self.tank
            .run_for_degrees(degrees * left, degrees * right, speed, block)
    }

    /// Run for `duration_ms`, steering by `steering`, then stop.
    pub fn run_for_time(
        &mut self,
        steering: f32,
        speed: Speed,
        duration_ms: u32,
        block: bool,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        let (left, right) = steering_speeds(steering, speed)?;
        self.tank.run_for_time(left, right, duration_ms, block)
    }

    /// Drive each motor to an absolute position. Steering does not apply.
    pub fn run_to_position(
        &mut self,
        left_target: i32,
        right_target: i32,
        speed: Speed,
        block: bool,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        self.tank
            .run_to_position(left_target, right_target, speed, block)
    }
}

impl<M: Motor, D: DelayNs> DriveControl for SteeringDrive<M, D> {
    type Error = M::Error;

    fn stop(&mut self, left: StopAction, right: StopAction) -> Result<(), DriveError<M::Error>> {
        self.tank.stop(left, right)
    }

    fn poll_motion(&mut self) -> Result<Option<MotionOutcome>, DriveError<M::Error>> {
        self.tank.poll_motion()
    }

    fn wait(&mut self) -> Result<MotionOutcome, DriveError<M::Error>> {
        self.tank.wait()
    }

    async fn wait_async<A: Delay>(
        &mut self,
        delay: &mut A,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        self.tank.wait_async(delay).await
    }

    fn positions(&self) -> Result<(i32, i32), DriveError<M::Error>> {
        self.tank.positions()
    }
}
