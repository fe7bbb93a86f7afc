//! Edge case and boundary condition tests for the drive layers

use rs_tankdrive::{
    hal::{MockDelay, MockMotor, MotorCommand},
    traits::{DriveControl, StopAction},
    units::{Distance, Speed},
    wheel::Wheel,
    ArgumentError, DifferentialDrive, DriveError, DriveGeometry, MotionOutcome, SpeedError,
    SteeringDrive, TankDrive,
};

fn tank() -> TankDrive<MockMotor, MockDelay> {
    TankDrive::with_delay(MockMotor::new(), MockMotor::new(), MockDelay::new())
}

fn robot() -> DifferentialDrive<MockMotor, MockDelay> {
    let geometry = DriveGeometry::new(Wheel::spike(), Distance::Studs(11.0)).unwrap();
    DifferentialDrive::new(tank(), geometry)
}

// ============================================================================
// Speed Boundary Tests
// ============================================================================

#[test]
fn every_speed_kind_preserves_sign() {
    let speeds = [
        Speed::Percent(0.01),
        Speed::RotationsPerMinute(0.01),
        Speed::RotationsPerSecond(0.001),
        Speed::DegreesPerMinute(1.0),
        Speed::DegreesPerSecond(0.3),
    ];
    for speed in speeds {
        assert!(speed.to_native(810).unwrap() > 0, "{}", speed);
        assert!((-speed).to_native(810).unwrap() < 0, "{}", speed);
    }
}

#[test]
fn full_speed_is_accepted() {
    let mut tank = tank();
    tank.run_at_speed(Speed::Percent(100.0), Speed::Percent(-100.0))
        .unwrap();
    assert_eq!(tank.left().commands, vec![MotorCommand::RunAtSpeed(810)]);
    assert_eq!(tank.right().commands, vec![MotorCommand::RunAtSpeed(-810)]);
}

#[test]
fn speed_above_maximum_rejected() {
    let mut robot = robot();
    let err = robot
        .run_for_distance(Distance::Centimeters(10.0), Speed::RotationsPerMinute(200.0), true)
        .unwrap_err();
    assert!(matches!(
        err,
        DriveError::InvalidSpeed(SpeedError::ExceedsMaximum { max: 810, .. })
    ));
    assert!(robot.tank().left().commands.is_empty());
    assert!(robot.tank().right().commands.is_empty());
}

#[test]
fn nan_speed_rejected() {
    let mut tank = tank();
    let err = tank
        .run_for_degrees(90.0, 90.0, Speed::Percent(f32::NAN), true)
        .unwrap_err();
    assert_eq!(err, DriveError::InvalidSpeed(SpeedError::NotFinite));
}

#[test]
fn tiny_inner_speed_never_rounds_to_zero() {
    let (_, right) = tank()
        .plan_degrees(1000.0, 1.0, Speed::DegreesPerSecond(100.0))
        .unwrap();
    assert_eq!(right.speed, 1);
    assert_eq!(right.degrees, 1);
}

// ============================================================================
// Steering Boundary Tests
// ============================================================================

#[test]
fn steering_limits_are_inclusive() {
    let mut steering = SteeringDrive::new(tank());
    assert!(steering.run_at_speed(100.0, Speed::Percent(10.0)).is_ok());
    assert!(steering.run_at_speed(-100.0, Speed::Percent(10.0)).is_ok());
    assert_eq!(
        steering.run_at_speed(100.01, Speed::Percent(10.0)),
        Err(DriveError::InvalidArgument(ArgumentError::SteeringOutOfRange(100.01)))
    );
}

#[test]
fn half_steering_leaves_inner_wheel_idle() {
    let mut steering = SteeringDrive::new(tank());
    steering
        .run_for_degrees(50.0, Speed::Percent(50.0), 360.0, true)
        .unwrap();
    assert!(steering.tank().right().commands.is_empty());
    assert_eq!(steering.positions().unwrap(), (360, 0));
}

// ============================================================================
// Degenerate Motion Tests
// ============================================================================

#[test]
fn zero_turn_is_noop() {
    let mut robot = robot();
    let outcome = robot.turn_right(0.0, Speed::Percent(30.0), true).unwrap();
    assert_eq!(outcome, MotionOutcome::Completed);
    assert!(robot.tank().left().commands.is_empty());
}

#[test]
fn zero_distance_is_noop() {
    let mut robot = robot();
    let outcome = robot
        .run_for_distance(Distance::Millimeters(0.0), Speed::Percent(30.0), false)
        .unwrap();
    assert_eq!(outcome, MotionOutcome::Completed);
    assert!(robot.tank().right().commands.is_empty());
}

#[test]
fn sub_degree_travel_is_noop() {
    let mut tank = tank();
    let outcome = tank
        .run_for_degrees(0.4, -0.4, Speed::Percent(30.0), true)
        .unwrap();
    assert_eq!(outcome, MotionOutcome::Completed);
    assert!(tank.left().commands.is_empty());
}

#[test]
fn negative_distance_drives_backwards() {
    let mut robot = robot();
    robot
        .run_for_distance(Distance::Inches(-6.0), Speed::Percent(30.0), true)
        .unwrap();
    let (left, right) = robot.positions().unwrap();
    assert!(left < 0);
    assert_eq!(left, right);
}

#[test]
fn negative_speed_and_distance_cancel() {
    let mut robot = robot();
    robot
        .run_for_distance(Distance::Inches(-6.0), Speed::Percent(-30.0), true)
        .unwrap();
    let (left, right) = robot.positions().unwrap();
    assert!(left > 0);
    assert_eq!(left, right);
}

// ============================================================================
// Geometry Boundary Tests
// ============================================================================

#[test]
fn arc_at_minimum_radius_is_a_pivot() {
    let mut robot = robot();
    robot
        .run_arc_left(
            Distance::Millimeters(44.0),
            Distance::Centimeters(10.0),
            Speed::Percent(30.0),
            true,
        )
        .unwrap();
    let (left, right) = robot.positions().unwrap();
    assert_eq!(left, 0);
    assert!(right > 0);
}

#[test]
fn arc_just_below_minimum_radius_rejected() {
    let mut robot = robot();
    let err = robot
        .run_arc_right(
            Distance::Millimeters(43.9),
            Distance::Centimeters(10.0),
            Speed::Percent(30.0),
            true,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        DriveError::InvalidArgument(ArgumentError::ArcRadiusTooSmall { .. })
    ));
}

#[test]
fn negative_arc_radius_rejected() {
    let mut robot = robot();
    assert!(robot
        .run_arc_left(
            Distance::Centimeters(-20.0),
            Distance::Centimeters(10.0),
            Speed::Percent(30.0),
            true,
        )
        .is_err());
}

#[test]
fn zero_wheel_rejected() {
    assert_eq!(
        Wheel::new(0.0, 14.0),
        Err(ArgumentError::InvalidDimension {
            name: "wheel diameter",
            value: 0.0
        })
    );
}

#[test]
fn negative_turn_wrappers_rejected() {
    let mut robot = robot();
    assert_eq!(
        robot.turn_right(-90.0, Speed::Percent(30.0), true),
        Err(DriveError::InvalidArgument(ArgumentError::NegativeDegrees(-90.0)))
    );
}

// ============================================================================
// Stop Tests
// ============================================================================

#[test]
fn stop_mixed_actions() {
    let mut robot = robot();
    robot.run_at_speed(0.0, Speed::Percent(50.0)).unwrap();
    robot.stop(StopAction::Coast, StopAction::Brake).unwrap();
    assert_eq!(
        robot.tank().left().last_command(),
        Some(&MotorCommand::Stop(StopAction::Coast))
    );
    assert_eq!(
        robot.tank().right().last_command(),
        Some(&MotorCommand::Stop(StopAction::Brake))
    );
    assert_eq!(robot.tank().left().speed, 0);
}

#[test]
fn stop_with_disconnected_motor_surfaces_fault() {
    let mut tank = TankDrive::with_delay(
        MockMotor::new().disconnected(),
        MockMotor::new(),
        MockDelay::new(),
    );
    let err = tank.stop(StopAction::Brake, StopAction::Brake).unwrap_err();
    assert!(matches!(err, DriveError::MotorFault(_)));
}
