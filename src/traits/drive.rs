//! Capabilities shared by every drive layer.
//!
//! [`TankDrive`](crate::TankDrive), [`SteeringDrive`](crate::SteeringDrive)
//! and [`DifferentialDrive`](crate::DifferentialDrive) each add their own run
//! commands, but stopping, waiting and reading positions work the same way on
//! all of them. This trait is that common surface; the outer layers simply
//! forward to the tank drive they wrap.

use core::future::Future;

use crate::error::DriveError;
use crate::tank::MotionOutcome;
use crate::traits::{Delay, StopAction};

/// Stop, wait and query a pair of drive motors.
///
/// # Example
///
/// ```rust
/// use rs_tankdrive::hal::{MockDelay, MockMotor};
/// use rs_tankdrive::traits::{DriveControl, StopAction};
/// use rs_tankdrive::{MotionOutcome, TankDrive};
/// use rs_tankdrive::units::Speed;
///
/// let mut tank = TankDrive::with_delay(MockMotor::new(), MockMotor::new(), MockDelay::new());
/// tank.run_for_degrees(360.0, 360.0, Speed::Percent(50.0), false).unwrap();
///
/// assert_eq!(tank.wait().unwrap(), MotionOutcome::Completed);
/// assert_eq!(tank.positions().unwrap(), (360, 360));
/// tank.stop(StopAction::Hold, StopAction::Hold).unwrap();
/// ```
pub trait DriveControl {
    /// Error type of the underlying motors.
    type Error;

    /// Stop both motors immediately.
    fn stop(&mut self, left: StopAction, right: StopAction)
        -> Result<(), DriveError<Self::Error>>;

    /// Check once whether the last motion has finished.
    ///
    /// Returns `None` while either motor is still running.
    fn poll_motion(&mut self) -> Result<Option<MotionOutcome>, DriveError<Self::Error>>;

    /// Block until both motors have stopped or either one stalls.
    fn wait(&mut self) -> Result<MotionOutcome, DriveError<Self::Error>>;

    /// Like [`wait`](Self::wait), but yields to `delay` between polls.
    fn wait_async<A: Delay>(
        &mut self,
        delay: &mut A,
    ) -> impl Future<Output = Result<MotionOutcome, DriveError<Self::Error>>>;

    /// Encoder positions `(left, right)` in degrees.
    fn positions(&self) -> Result<(i32, i32), DriveError<Self::Error>>;
}
