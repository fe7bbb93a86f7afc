//! Real-world-unit driving: distances, arcs and in-place turns.
//!
//! [`DriveGeometry`] holds the wheel and the distance between the two wheel
//! midpoints, and does the pure math. [`DifferentialDrive`] feeds the
//! resulting wheel degrees into a [`SteeringDrive`]'s (or its tank's)
//! degree-based run, so blocking, stall and error behavior are the same as
//! for the lower layers.
//!
//! # Example
//!
//! ```rust
//! use rs_tankdrive::hal::{MockDelay, MockMotor};
//! use rs_tankdrive::traits::DriveControl;
//! use rs_tankdrive::units::{Distance, Speed};
//! use rs_tankdrive::wheel::Wheel;
//! use rs_tankdrive::{DifferentialDrive, DriveGeometry, TankDrive};
//!
//! let geometry = DriveGeometry::new(Wheel::spike(), Distance::Studs(11.0)).unwrap();
//! let tank = TankDrive::with_delay(MockMotor::new(), MockMotor::new(), MockDelay::new());
//! let mut robot = DifferentialDrive::new(tank, geometry);
//!
//! // One wheel circumference forward is one wheel rotation
//! let circumference = Wheel::spike().circumference_mm();
//! robot
//!     .run_for_distance(Distance::Millimeters(circumference), Speed::Percent(50.0), true)
//!     .unwrap();
//! assert_eq!(robot.positions().unwrap(), (360, 360));
//! ```

use core::f32::consts::PI;

use embedded_hal::delay::DelayNs;

use crate::config::ChassisConfig;
use crate::error::{ArgumentError, DriveError};
use crate::steering::{SteeringDrive, MAX_STEERING};
use crate::tank::{MotionOutcome, TankDrive};
use crate::traits::{Delay, DriveControl, Motor, StopAction};
use crate::units::{Distance, Speed, DEGREES_PER_ROTATION};
use crate::wheel::{validate_dimension, Wheel};

// ============================================================================
// Geometry
// ============================================================================

/// Wheel rotation for each side of an arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcDegrees {
    /// Degrees for the wheel on the outside of the curve.
    pub outer: f32,
    /// Degrees for the wheel on the inside of the curve.
    pub inner: f32,
}

/// Wheel size and track width of a two-wheeled chassis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "GeometryFields"))]
pub struct DriveGeometry {
    wheel: Wheel,
    wheel_separation_mm: f32,
}

/// Unvalidated geometry fields, checked by [`DriveGeometry::new`] on deserialize.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct GeometryFields {
    wheel: Wheel,
    wheel_separation_mm: f32,
}

#[cfg(feature = "serde")]
impl TryFrom<GeometryFields> for DriveGeometry {
    type Error = ArgumentError;

    fn try_from(raw: GeometryFields) -> Result<Self, ArgumentError> {
        DriveGeometry::new(raw.wheel, Distance::Millimeters(raw.wheel_separation_mm))
    }
}

impl DriveGeometry {
    /// Create a geometry from a wheel and the distance between the two wheel midpoints.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::InvalidDimension`] if the separation is not a positive,
    /// finite distance.
    pub fn new(wheel: Wheel, wheel_separation: Distance) -> Result<Self, ArgumentError> {
        let wheel_separation_mm = wheel_separation.to_millimeters();
        validate_dimension("wheel separation", wheel_separation_mm)?;
        Ok(Self {
            wheel,
            wheel_separation_mm,
        })
    }

    /// The wheel fitted to both sides.
    pub fn wheel(&self) -> Wheel {
        self.wheel
    }

    /// Distance between the wheel midpoints in millimeters.
    pub fn wheel_separation_mm(&self) -> f32 {
        self.wheel_separation_mm
    }

    /// Smallest arc radius that keeps the inner wheel from reversing.
    pub fn min_arc_radius_mm(&self) -> f32 {
        self.wheel_separation_mm / 2.0
    }

    /// Path length of one wheel during a full in-place rotation.
    pub fn turn_circumference_mm(&self) -> f32 {
        PI * self.wheel_separation_mm
    }

    /// Wheel degrees to drive `distance` in a straight line.
    pub fn straight_degrees(&self, distance: Distance) -> f32 {
        self.wheel.degrees_for_distance(distance)
    }

    /// Outer and inner wheel degrees to follow an arc of `radius` for
    /// `distance`.
    ///
    /// `radius` is measured to the midpoint between the wheels and `distance`
    /// is the length of the outer wheel's path expressed through the wheel.
    /// A negative `distance` drives the same arc backwards.
    ///
    /// # Errors
    ///
    /// - [`ArgumentError::NotFinite`] for NaN or infinite inputs
    /// - [`ArgumentError::ArcRadiusTooSmall`] if `radius` is below
    ///   [`min_arc_radius_mm`](Self::min_arc_radius_mm)
    pub fn arc_degrees(&self, radius: Distance, distance: Distance) -> Result<ArcDegrees, ArgumentError> {
        let radius_mm = radius.to_millimeters();
        let distance_mm = distance.to_millimeters();
        if !radius_mm.is_finite() {
            return Err(ArgumentError::NotFinite { name: "arc radius" });
        }
        if !distance_mm.is_finite() {
            return Err(ArgumentError::NotFinite {
                name: "arc distance",
            });
        }

        let min_radius_mm = self.min_arc_radius_mm();
        if radius_mm <= 0.0 || radius_mm < min_radius_mm {
            return Err(ArgumentError::ArcRadiusTooSmall {
                radius_mm,
                min_radius_mm,
            });
        }

        let outer = self.wheel.degrees_for_distance(Distance::Millimeters(distance_mm));
        let half = self.wheel_separation_mm / 2.0;
        let inner = outer * (radius_mm - half) / (radius_mm + half);
        Ok(ArcDegrees { outer, inner })
    }

    /// Wheel degrees for an in-place rotation of `robot_degrees`.
    ///
    /// The sign follows `robot_degrees`; the two wheels turn by this amount in
    /// opposite directions.
    pub fn turn_wheel_degrees(&self, robot_degrees: f32) -> f32 {
        let travel_mm = self.turn_circumference_mm() * robot_degrees / DEGREES_PER_ROTATION;
        self.wheel.degrees_for_distance(Distance::Millimeters(travel_mm))
    }
}

// ============================================================================
// Differential Drive
// ============================================================================

/// A steering drive that knows its chassis dimensions.
///
/// Positive turn angles are clockwise seen from above (a right turn).
pub struct DifferentialDrive<M: Motor, D> {
    steering: SteeringDrive<M, D>,
    geometry: DriveGeometry,
}

impl<M: Motor, D: DelayNs> DifferentialDrive<M, D> {
    /// Create a drive from a tank drive and the chassis geometry.
    pub fn new(tank: TankDrive<M, D>, geometry: DriveGeometry) -> Self {
        Self::from_steering(SteeringDrive::new(tank), geometry)
    }

    /// Create a drive from chassis configuration.
    ///
    /// # Errors
    ///
    /// - [`ArgumentError::MotorMismatch`] if either motor's rated maximum differs
    ///   from [`ChassisConfig::motor_model`]
    /// - [`ArgumentError::InvalidDimension`] for a bad wheel or separation
    pub fn from_config(tank: TankDrive<M, D>, chassis: &ChassisConfig) -> Result<Self, ArgumentError> {
        let expected_max = chassis.motor_model.max_speed();
        for actual_max in [tank.left().max_speed(), tank.right().max_speed()] {
            if actual_max != expected_max {
                return Err(ArgumentError::MotorMismatch {
                    expected_max,
                    actual_max,
                });
            }
        }
        Ok(Self::new(tank, chassis.geometry()?))
    }

    /// Create a drive from an existing steering drive.
    pub fn from_steering(steering: SteeringDrive<M, D>, geometry: DriveGeometry) -> Self {
        Self { steering, geometry }
    }

    /// Chassis geometry.
    pub fn geometry(&self) -> &DriveGeometry {
        &self.geometry
    }

    /// The steering layer.
    pub fn steering(&self) -> &SteeringDrive<M, D> {
        &self.steering
    }

    /// Mutable access to the steering layer.
    pub fn steering_mut(&mut self) -> &mut SteeringDrive<M, D> {
        &mut self.steering
    }

    /// The tank layer.
    pub fn tank(&self) -> &TankDrive<M, D> {
        self.steering.tank()
    }

    /// Unwrap into the steering drive.
    pub fn into_inner(self) -> SteeringDrive<M, D> {
        self.steering
    }

    /// Run until stopped, steering by `steering`.
    pub fn run_at_speed(&mut self, steering: f32, speed: Speed) -> Result<(), DriveError<M::Error>> {
        self.steering.run_at_speed(steering, speed)
    }

    /// Drive straight for `distance`. Negative distances drive backwards.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run_for_distance(
        &mut self,
        distance: Distance,
        speed: Speed,
        block: bool,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        let degrees = self.geometry.straight_degrees(distance);
        tracing::debug!(degrees, "straight");
        self.steering.run_for_degrees(0.0, speed, degrees, block)
    }

    /// Drive clockwise along a circle of `radius` for `distance`.
    ///
    /// The left wheel is on the outside and runs at `speed`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run_arc_right(
        &mut self,
        radius: Distance,
        distance: Distance,
        speed: Speed,
        block: bool,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        let arc = self.geometry.arc_degrees(radius, distance)?;
        tracing::debug!(outer = arc.outer, inner = arc.inner, "arc");
        self.steering
            .tank_mut()
            .run_for_degrees(arc.outer, arc.inner, speed, block)
    }

    /// Drive counter-clockwise along a circle of `radius` for `distance`.
    ///
    /// The right wheel is on the outside and runs at `speed`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run_arc_left(
        &mut self,
        radius: Distance,
        distance: Distance,
        speed: Speed,
        block: bool,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        let arc = self.geometry.arc_degrees(radius, distance)?;
        tracing::debug!(outer = arc.outer, inner = arc.inner, "arc");
        self.steering
            .tank_mut()
            .run_for_degrees(arc.inner, arc.outer, speed, block)
    }

    /// Rotate in place by `degrees`; positive turns right.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn turn_degrees(
        &mut self,
        degrees: f32,
        speed: Speed,
        block: bool,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        if !degrees.is_finite() {
            return Err(ArgumentError::NotFinite {
                name: "turn degrees",
            }
            .into());
        }
        let wheel_degrees = self.geometry.turn_wheel_degrees(degrees);
        tracing::debug!(wheel_degrees, "turn");
        self.steering
            .run_for_degrees(MAX_STEERING, speed, wheel_degrees, block)
    }

    /// Rotate clockwise in place by `degrees`.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::NegativeDegrees`] if `degrees` is below zero.
    pub fn turn_right(
        &mut self,
        degrees: f32,
        speed: Speed,
        block: bool,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        check_non_negative(degrees)?;
        self.turn_degrees(degrees, speed, block)
    }

    /// Rotate counter-clockwise in place by `degrees`.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::NegativeDegrees`] if `degrees` is below zero.
    pub fn turn_left(
        &mut self,
        degrees: f32,
        speed: Speed,
        block: bool,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        check_non_negative(degrees)?;
        self.turn_degrees(-degrees, speed, block)
    }
}

fn check_non_negative(degrees: f32) -> Result<(), ArgumentError> {
    if degrees < 0.0 {
        Err(ArgumentError::NegativeDegrees(degrees))
    } else {
        Ok(())
    }
}

impl<M: Motor, D: DelayNs> DriveControl for DifferentialDrive<M, D> {
    type Error = M::Error;

    fn stop(&mut self, left: StopAction, right: StopAction) -> Result<(), DriveError<M::Error>> {
        self.steering.stop(left, right)
    }

    fn poll_motion(&mut self) -> Result<Option<MotionOutcome>, DriveError<M::Error>> {
        self.steering.poll_motion()
    }

    fn wait(&mut self) -> Result<MotionOutcome, DriveError<M::Error>> {
        self.steering.wait()
    }

    async fn wait_async<A: Delay>(
        &mut self,
        delay: &mut A,
    ) -> Result<MotionOutcome, DriveError<M::Error>> {
        self.steering.wait_async(delay).await
    }

    fn positions(&self) -> Result<(i32, i32), DriveError<M::Error>> {
        self.steering.positions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockDelay, MockMotor, MotorCommand};
    use crate::traits::MotorModel;

    fn geometry() -> DriveGeometry {
        DriveGeometry::new(Wheel::spike(), Distance::Millimeters(88.0)).unwrap()
    }

    fn robot() -> DifferentialDrive<MockMotor, MockDelay> {
        let tank = TankDrive::with_delay(MockMotor::new(), MockMotor::new(), MockDelay::new());
        DifferentialDrive::new(tank, geometry())
    }

    // =========================================================================
    // Geometry Tests
    // =========================================================================

    #[test]
    fn separation_must_be_positive() {
        assert!(DriveGeometry::new(Wheel::spike(), Distance::Millimeters(0.0)).is_err());
        assert!(DriveGeometry::new(Wheel::spike(), Distance::Studs(-1.0)).is_err());
        assert!(DriveGeometry::new(Wheel::spike(), Distance::Meters(f32::NAN)).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_validates_separation() {
        let json = serde_json::to_string(&geometry()).unwrap();
        let back: DriveGeometry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, geometry());

        let zero = r#"{"wheel":{"diameter_mm":56.0,"width_mm":14.0},"wheel_separation_mm":0.0}"#;
        let err = serde_json::from_str::<DriveGeometry>(zero).unwrap_err();
        assert!(err.to_string().contains("wheel separation"));

        let bad_wheel = r#"{"wheel":{"diameter_mm":-1.0,"width_mm":14.0},"wheel_separation_mm":88.0}"#;
        assert!(serde_json::from_str::<DriveGeometry>(bad_wheel).is_err());
    }

    #[test]
    fn derived_dimensions() {
        let g = geometry();
        assert_eq!(g.min_arc_radius_mm(), 44.0);
        assert!((g.turn_circumference_mm() - PI * 88.0).abs() < 1e-3);
    }

    #[test]
    fn pivot_arc_has_idle_inner_wheel() {
        let arc = geometry()
            .arc_degrees(Distance::Millimeters(44.0), Distance::Millimeters(100.0))
            .unwrap();
        assert_eq!(arc.inner, 0.0);
        assert!(arc.outer > 0.0);
    }

    #[test]
    fn arc_ratio_follows_radii() {
        let arc = geometry()
            .arc_degrees(Distance::Millimeters(132.0), Distance::Millimeters(500.0))
            .unwrap();
        // (132 - 44) / (132 + 44)
        assert!((arc.inner / arc.outer - 0.5).abs() < 1e-6);
    }

    #[test]
    fn arc_radius_too_small() {
        let g = geometry();
        assert_eq!(
            g.arc_degrees(Distance::Millimeters(40.0), Distance::Millimeters(100.0)),
            Err(ArgumentError::ArcRadiusTooSmall {
                radius_mm: 40.0,
                min_radius_mm: 44.0
            })
        );
        assert!(g
            .arc_degrees(Distance::Millimeters(0.0), Distance::Millimeters(100.0))
            .is_err());
        assert!(g
            .arc_degrees(Distance::Millimeters(f32::NAN), Distance::Millimeters(100.0))
            .is_err());
    }

    #[test]
    fn full_turn_wheel_degrees() {
        let g = geometry();
        let expected = PI * 88.0 / Wheel::spike().circumference_mm() * 360.0;
        assert!((g.turn_wheel_degrees(360.0) - expected).abs() < 1e-3);
        assert!((g.turn_wheel_degrees(-360.0) + expected).abs() < 1e-3);
    }

    // =========================================================================
    // Drive Tests
    // =========================================================================

    #[test]
    fn distance_of_one_circumference_is_one_rotation() {
        let mut robot = robot();
        let circumference = Wheel::spike().circumference_mm();
        robot
            .run_for_distance(Distance::Millimeters(circumference), Speed::Percent(50.0), true)
            .unwrap();
        assert_eq!(robot.positions().unwrap(), (360, 360));
    }

    #[test]
    fn arc_right_uses_left_as_outer() {
        let mut robot = robot();
        robot
            .run_arc_right(
                Distance::Millimeters(132.0),
                Distance::Millimeters(Wheel::spike().circumference_mm()),
                Speed::DegreesPerSecond(400.0),
                false,
            )
            .unwrap();
        assert_eq!(
            robot.tank().left().commands,
            vec![MotorCommand::RunForDegrees {
                speed: 400,
                degrees: 360,
                stop: StopAction::Brake
            }]
        );
        assert_eq!(
            robot.tank().right().commands,
            vec![MotorCommand::RunForDegrees {
                speed: 200,
                degrees: 180,
                stop: StopAction::Brake
            }]
        );
    }

    #[test]
    fn arc_left_uses_right_as_outer() {
        let mut robot = robot();
        robot
            .run_arc_left(
                Distance::Millimeters(132.0),
                Distance::Millimeters(Wheel::spike().circumference_mm()),
                Speed::DegreesPerSecond(400.0),
                true,
            )
            .unwrap();
        assert_eq!(robot.positions().unwrap(), (180, 360));
    }

    #[test]
    fn pivot_arc_leaves_inner_motor_alone() {
        let mut robot = robot();
        robot
            .run_arc_right(
                Distance::Millimeters(44.0),
                Distance::Millimeters(100.0),
                Speed::Percent(30.0),
                true,
            )
            .unwrap();
        assert!(robot.tank().right().commands.is_empty());
        assert_eq!(robot.tank().left().commands.len(), 1);
    }

    #[test]
    fn zero_radius_arc_rejected() {
        let mut robot = robot();
        let err = robot
            .run_arc_left(
                Distance::Millimeters(0.0),
                Distance::Millimeters(100.0),
                Speed::Percent(30.0),
                true,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DriveError::InvalidArgument(ArgumentError::ArcRadiusTooSmall { .. })
        ));
        assert!(robot.tank().left().commands.is_empty());
    }

    #[test]
    fn turn_right_spins_left_forward() {
        let mut robot = robot();
        robot
            .turn_degrees(360.0, Speed::Percent(30.0), true)
            .unwrap();
        let expected = libm::roundf(geometry().turn_wheel_degrees(360.0)) as i32;
        assert_eq!(robot.positions().unwrap(), (expected, -expected));
    }

    #[test]
    fn turn_left_spins_right_forward() {
        let mut robot = robot();
        robot.turn_left(90.0, Speed::Percent(30.0), true).unwrap();
        let (left, right) = robot.positions().unwrap();
        assert!(left < 0);
        assert_eq!(left, -right);
    }

    #[test]
    fn turn_wrappers_reject_negative_degrees() {
        let mut robot = robot();
        assert_eq!(
            robot.turn_left(-90.0, Speed::Percent(30.0), true),
            Err(DriveError::InvalidArgument(ArgumentError::NegativeDegrees(-90.0)))
        );
        assert!(robot.turn_right(-1.0, Speed::Percent(30.0), true).is_err());
        assert!(robot.tank().left().commands.is_empty());
    }

    #[test]
    fn from_config_checks_motor_model() {
        let chassis = ChassisConfig::default().with_motor_model(MotorModel::SpikeLarge);

        let tank = TankDrive::with_delay(
            MockMotor::new().with_model(MotorModel::SpikeLarge),
            MockMotor::new(),
            MockDelay::new(),
        );
        assert_eq!(
            DifferentialDrive::from_config(tank, &chassis).err(),
            Some(ArgumentError::MotorMismatch {
                expected_max: 1050,
                actual_max: 810
            })
        );

        let tank = TankDrive::with_delay(
            MockMotor::new().with_model(MotorModel::SpikeLarge),
            MockMotor::new().with_model(MotorModel::SpikeLarge),
            MockDelay::new(),
        );
        let robot = DifferentialDrive::from_config(tank, &chassis).unwrap();
        assert_eq!(robot.geometry(), &chassis.geometry().unwrap());
    }

    #[test]
    fn turn_rejects_nan() {
        let mut robot = robot();
        assert!(robot.turn_degrees(f32::NAN, Speed::Percent(30.0), true).is_err());
    }
}
