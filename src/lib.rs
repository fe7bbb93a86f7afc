//! # rs-tankdrive
//!
//! Motion control for two-motor differential-drive ("tank") robots built from
//! rotary hub motors.
//!
//! ## Features
//!
//! - **Typed units**: speeds and distances in the unit you think in, converted
//!   to native motor units in one place
//! - **Synchronized pairs**: both motors are commanded before any call returns,
//!   and degree runs are scaled so both wheels finish together
//! - **Steering**: one ratio in `-100..=100` instead of two speeds
//! - **Chassis geometry**: straight runs, arcs and in-place turns in millimeters
//!   and robot degrees
//! - **Blocking, polling or async waits**, with stalls reported as an outcome
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `units` / `wheel` - Speed and distance values, wheel dimensions
//! - `traits` - Motor driver contract and the shared drive surface
//! - `tank` - Two motors driven as a matched pair
//! - `steering` - Steering ratio on top of the tank layer
//! - `differential` - Geometry-aware driving on top of the steering layer
//! - `hal` - Concrete implementations (mocks for testing, std delay)
//!
//! ## Example
//!
//! ```rust
//! use rs_tankdrive::{
//!     hal::{MockDelay, MockMotor},
//!     traits::DriveControl,
//!     units::{Distance, Speed},
//!     wheel::Wheel,
//!     DifferentialDrive, DriveGeometry, MotionOutcome, TankDrive,
//! };
//!
//! let geometry = DriveGeometry::new(Wheel::spike(), Distance::Studs(11.0)).unwrap();
//! let tank = TankDrive::with_delay(MockMotor::new(), MockMotor::new(), MockDelay::new());
//! let mut robot = DifferentialDrive::new(tank, geometry);
//!
//! // Forward 20 cm, then a quarter turn to the right
//! robot
//!     .run_for_distance(Distance::Centimeters(20.0), Speed::Percent(50.0), true)
//!     .unwrap();
//! let outcome = robot.turn_right(90.0, Speed::Percent(30.0), true).unwrap();
//! assert_eq!(outcome, MotionOutcome::Completed);
//!
//! let (left, right) = robot.positions().unwrap();
//! assert!(left > right);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Core traits for hardware abstraction and drive control.
pub mod traits;

/// Typed speed and distance values.
pub mod units;
/// Wheel dimensions and distance/rotation conversion.
pub mod wheel;

/// Error types shared by all drive layers.
pub mod error;

/// Synchronized two-motor drive.
pub mod tank;
/// Steering-ratio drive.
pub mod steering;
/// Chassis geometry and real-world-unit driving.
pub mod differential;

/// Drive and chassis configuration.
pub mod config;

// Re-exports for convenience
pub use differential::{ArcDegrees, DifferentialDrive, DriveGeometry};
pub use error::{ArgumentError, DriveError, SpeedError};
pub use steering::SteeringDrive;
pub use tank::{MotionOutcome, TankDrive, WheelCommand};
pub use traits::{
    // Hardware
    Delay,
    // Drive
    DriveControl,
    Motor,
    MotorModel,
    Polarity,
    StopAction,
};
pub use units::{Distance, Speed};
pub use wheel::Wheel;

// Config re-exports
pub use config::{ChassisConfig, Config, DriveConfig};
