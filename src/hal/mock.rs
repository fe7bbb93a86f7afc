//! Mock implementations for testing without hardware.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockMotor`] | [`Motor`] | Records commands, simulates position, busy time and stalls |
//! | [`MockDelay`] | [`DelayNs`], [`Delay`] | Records requested sleeps without sleeping |
//!
//! # Example
//!
//! ```rust
//! use rs_tankdrive::hal::{MockDelay, MockMotor, MotorCommand};
//! use rs_tankdrive::traits::StopAction;
//! use rs_tankdrive::units::Speed;
//! use rs_tankdrive::{MotionOutcome, TankDrive};
//!
//! let left = MockMotor::new().with_busy_polls(2);
//! let mut tank = TankDrive::with_delay(left, MockMotor::new(), MockDelay::new());
//!
//! let outcome = tank.run_for_degrees(90.0, 90.0, Speed::Percent(10.0), true).unwrap();
//! assert_eq!(outcome, MotionOutcome::Completed);
//! assert_eq!(tank.delay().calls, 2);
//! assert_eq!(
//!     tank.left().commands,
//!     vec![MotorCommand::RunForDegrees { speed: 81, degrees: 90, stop: StopAction::Brake }],
//! );
//! ```
//!
//! [`Motor`]: crate::traits::Motor
//! [`Delay`]: crate::traits::Delay
//! [`DelayNs`]: embedded_hal::delay::DelayNs

use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::traits::{Delay, Motor, MotorModel, StopAction};

// ============================================================================
// Motor Mock
// ============================================================================

/// A command received by [`MockMotor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotorCommand {
    /// `run_at_speed(speed)`
    RunAtSpeed(i32),
    /// `run_for_degrees(speed, degrees, stop, _)`
    RunForDegrees {
        /// Native speed.
        speed: i32,
        /// Unsigned travel.
        degrees: u32,
        /// Stop action.
        stop: StopAction,
    },
    /// `run_for_time(speed, duration_ms, stop, _)`
    RunForTime {
        /// Native speed.
        speed: i32,
        /// Run time.
        duration_ms: u32,
        /// Stop action.
        stop: StopAction,
    },
    /// `run_to_position(speed, position, stop, _)`
    RunToPosition {
        /// Native speed.
        speed: i32,
        /// Absolute target.
        position: i32,
        /// Stop action.
        stop: StopAction,
    },
    /// `stop(stop)`
    Stop(StopAction),
}

/// Error returned by a disconnected [`MockMotor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockMotorError {
    /// Nothing is plugged into the port.
    Disconnected,
}

impl fmt::Display for MockMotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "motor disconnected"),
        }
    }
}

/// Mock motor for testing.
///
/// Every command is appended to [`commands`](Self::commands). Degree and
/// position runs update [`position`](Self::position) immediately. After each
/// run command the motor reports `is_running() == true` for
/// `busy_polls` calls, then idle.
#[derive(Debug)]
pub struct MockMotor {
    /// Calibration used for `max_speed`.
    pub model: MotorModel,
    /// Simulated encoder position in degrees.
    pub position: i32,
    /// Last native speed commanded (0 after `stop`).
    pub speed: i32,
    /// All commands received, oldest first.
    pub commands: Vec<MotorCommand>,
    /// When true every call fails with [`MockMotorError::Disconnected`].
    pub disconnected: bool,
    busy_polls: u32,
    remaining_polls: Cell<u32>,
    stall_after: Option<u32>,
    polls_since_run: Cell<u32>,
}

impl Default for MockMotor {
    fn default() -> Self {
        Self {
            model: MotorModel::SpikeMedium,
            position: 0,
            speed: 0,
            commands: Vec::new(),
            disconnected: false,
            busy_polls: 0,
            remaining_polls: Cell::new(0),
            stall_after: None,
            polls_since_run: Cell::new(0),
        }
    }
}

impl MockMotor {
    /// Creates a mock SPIKE medium motor that finishes instantly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different motor model.
    pub fn with_model(mut self, model: MotorModel) -> Self {
        self.model = model;
        self
    }

    /// Report running for `polls` calls after each run command.
    pub fn with_busy_polls(mut self, polls: u32) -> Self {
        self.busy_polls = polls;
        self
    }

    /// Report a stall once `polls` running checks have passed since the last run command.
    pub fn with_stall_after(mut self, polls: u32) -> Self {
        self.stall_after = Some(polls);
        self
    }

    /// Make every call fail.
    pub fn disconnected(mut self) -> Self {
        self.disconnected = true;
        self
    }

    /// Last command received, if any.
    pub fn last_command(&self) -> Option<&MotorCommand> {
        self.commands.last()
    }

    /// Sum of `degrees` over all `run_for_degrees` commands, signed by speed.
    pub fn total_degrees(&self) -> i64 {
        self.commands
            .iter()
            .map(|cmd| match *cmd {
                MotorCommand::RunForDegrees { speed, degrees, .. } => {
                    i64::from(degrees) * i64::from(speed.signum())
                }
                _ => 0,
            })
            .sum()
    }

    fn check(&self) -> Result<(), MockMotorError> {
        if self.disconnected {
            Err(MockMotorError::Disconnected)
        } else {
            Ok(())
        }
    }

    fn start(&mut self, cmd: MotorCommand, speed: i32) -> Result<(), MockMotorError> {
        self.check()?;
        self.commands.push(cmd);
        self.speed = speed;
        self.remaining_polls.set(self.busy_polls);
        self.polls_since_run.set(0);
        Ok(())
    }
}

impl Motor for MockMotor {
    type Error = MockMotorError;

    fn max_speed(&self) -> u32 {
        self.model.max_speed()
    }

    fn run_at_speed(&mut self, speed: i32) -> Result<(), MockMotorError> {
        self.start(MotorCommand::RunAtSpeed(speed), speed)
    }

    fn run_for_degrees(
        &mut self,
        speed: i32,
        degrees: u32,
        stop: StopAction,
        _block: bool,
    ) -> Result<(), MockMotorError> {
        self.start(MotorCommand::RunForDegrees { speed, degrees, stop }, speed)?;
        self.position += degrees as i32 * speed.signum();
        Ok(())
    }

    fn run_for_time(
        &mut self,
        speed: i32,
        duration_ms: u32,
        stop: StopAction,
        _block: bool,
    ) -> Result<(), MockMotorError> {
        self.start(
            MotorCommand::RunForTime {
                speed,
                duration_ms,
                stop,
            },
            speed,
        )?;
        // degrees/s * ms / 1000
        self.position += (i64::from(speed) * i64::from(duration_ms) / 1000) as i32;
        Ok(())
    }

    fn run_to_position(
        &mut self,
        speed: i32,
        position: i32,
        stop: StopAction,
        _block: bool,
    ) -> Result<(), MockMotorError> {
        self.start(
            MotorCommand::RunToPosition {
                speed,
                position,
                stop,
            },
            speed,
        )?;
        self.position = position;
        Ok(())
    }

    fn stop(&mut self, stop: StopAction) -> Result<(), MockMotorError> {
        self.check()?;
        self.commands.push(MotorCommand::Stop(stop));
        self.speed = 0;
        self.remaining_polls.set(0);
        Ok(())
    }

    fn is_running(&self) -> Result<bool, MockMotorError> {
        self.check()?;
        self.polls_since_run.set(self.polls_since_run.get() + 1);
        let remaining = self.remaining_polls.get();
        if remaining > 0 {
            self.remaining_polls.set(remaining - 1);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn is_stalled(&self) -> Result<bool, MockMotorError> {
        self.check()?;
        Ok(matches!(self.stall_after, Some(n) if self.polls_since_run.get() >= n))
    }

    fn position(&self) -> Result<i32, MockMotorError> {
        self.check()?;
        Ok(self.position)
    }
}

// ============================================================================
// Delay Mock
// ============================================================================

/// Mock delay for testing.
///
/// Returns immediately and records how long the caller asked to wait.
///
/// # Example
///
/// ```rust
/// use embedded_hal::delay::DelayNs;
/// use rs_tankdrive::hal::MockDelay;
///
/// let mut delay = MockDelay::new();
/// delay.delay_ms(10);
/// delay.delay_ms(15);
/// assert_eq!(delay.calls, 2);
/// assert_eq!(delay.total_ms(), 25);
/// ```
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds requested.
    pub total_ns: u64,
    /// Number of delay calls.
    pub calls: usize,
}

impl MockDelay {
    /// Creates a new mock delay with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total requested delay in milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
        self.calls += 1;
    }
}

impl Delay for MockDelay {
    async fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
        self.calls += 1;
    }
}
