//! Drive a simulated robot around a square.
//!
//! Uses the mock motors, so it runs anywhere and prints the commands each
//! motor received along with the encoder positions after every leg.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example square_drive
//! ```
//!
//! # Configuration
//!
//! Edit the `Config` built at the top of `main()` to try a different chassis.

use anyhow::Context;

use rs_tankdrive::hal::{MockMotor, MotorCommand};
use rs_tankdrive::traits::{DriveControl, StopAction};
use rs_tankdrive::units::{Distance, Speed};
use rs_tankdrive::{ChassisConfig, Config, DifferentialDrive, DriveConfig, MotionOutcome, TankDrive};

const SIDE: Distance = Distance::Centimeters(30.0);

fn main() -> anyhow::Result<()> {
    let config = Config::default()
        .with_drive(
            DriveConfig::default()
                .with_name("square")
                .with_poll_interval_ms(5)
                .with_stop_action(StopAction::Hold),
        )
        .with_chassis(
            ChassisConfig::default()
                .with_wheel(62.4, 20.0)
                .with_wheel_separation(Distance::Millimeters(114.0)),
        );

    println!("=================================");
    println!("  rs-tankdrive square demo");
    println!("=================================");
    println!();
    println!(
        "Wheel: {}mm, separation: {}mm",
        config.chassis.wheel_diameter_mm, config.chassis.wheel_separation_mm
    );

    let left = MockMotor::new().with_model(config.chassis.motor_model).with_busy_polls(3);
    let right = MockMotor::new().with_model(config.chassis.motor_model).with_busy_polls(3);
    let tank = TankDrive::new(left, right).with_config(config.drive.clone());
    let mut robot = DifferentialDrive::from_config(tank, &config.chassis)
        .context("invalid chassis configuration")?;

    for leg in 1..=4 {
        let outcome = robot
            .run_for_distance(SIDE, Speed::Percent(50.0), true)
            .with_context(|| format!("leg {} straight", leg))?;
        report("straight", outcome, &robot)?;

        let outcome = robot
            .turn_right(90.0, Speed::Percent(30.0), true)
            .with_context(|| format!("leg {} turn", leg))?;
        report("turn", outcome, &robot)?;
    }

    robot.stop(StopAction::Coast, StopAction::Coast)?;

    println!();
    println!("Left motor commands:");
    print_commands(&robot.tank().left().commands);
    println!("Right motor commands:");
    print_commands(&robot.tank().right().commands);

    Ok(())
}

fn report<D>(
    step: &str,
    outcome: MotionOutcome,
    robot: &DifferentialDrive<MockMotor, D>,
) -> anyhow::Result<()>
where
    D: embedded_hal::delay::DelayNs,
{
    let (left, right) = robot.positions()?;
    println!(
        "{:<8} {:?}  positions: left={} right={}",
        step, outcome, left, right
    );
    Ok(())
}

fn print_commands(commands: &[MotorCommand]) {
    for cmd in commands {
        println!("  {:?}", cmd);
    }
}
