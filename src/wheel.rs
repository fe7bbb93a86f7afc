//! Wheel dimensions and distance/rotation conversion.
//!
//! All dimensions are in millimeters. A good reference when adding new wheel
//! presets is <http://wheels.sariel.pl/>.

use core::f32::consts::PI;

use crate::error::ArgumentError;
use crate::units::{Distance, DEGREES_PER_ROTATION};

/// A wheel (or tire) mounted on a drive motor.
///
/// Both sides of a differential drive are assumed to use the same wheel.
///
/// # Example
///
/// ```rust
/// use rs_tankdrive::units::Distance;
/// use rs_tankdrive::wheel::Wheel;
///
/// let wheel = Wheel::new(62.4, 20.0).unwrap();
/// let degrees = wheel.degrees_for_distance(Distance::Millimeters(wheel.circumference_mm()));
/// assert!((degrees - 360.0).abs() < 1e-3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "WheelDimensions"))]
pub struct Wheel {
    diameter_mm: f32,
    width_mm: f32,
}

impl Wheel {
    /// Create a wheel from its diameter and width in millimeters.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidDimension`] unless both dimensions are
    /// finite and greater than zero.
    pub fn new(diameter_mm: f32, width_mm: f32) -> Result<Self, ArgumentError> {
        validate_dimension("wheel diameter", diameter_mm)?;
        validate_dimension("wheel width", width_mm)?;
        Ok(Self {
            diameter_mm,
            width_mm,
        })
    }

    /// SPIKE Prime wheel, part 39367 (set 45678).
    pub const fn spike() -> Self {
        Self {
            diameter_mm: 56.0,
            width_mm: 14.0,
        }
    }

    /// SPIKE Prime large wheel, part 49295 (set 45680).
    pub const fn spike_large() -> Self {
        Self {
            diameter_mm: 88.0,
            width_mm: 14.0,
        }
    }

    /// Wheel diameter in millimeters.
    pub const fn diameter_mm(&self) -> f32 {
        self.diameter_mm
    }

    /// Tread width in millimeters.
    pub const fn width_mm(&self) -> f32 {
        self.width_mm
    }

    /// Wheel radius in millimeters.
    pub fn radius_mm(&self) -> f32 {
        self.diameter_mm / 2.0
    }

    /// Distance covered by one full rotation, in millimeters.
    pub fn circumference_mm(&self) -> f32 {
        PI * self.diameter_mm
    }

    /// Wheel rotation (degrees) needed to roll `distance`.
    ///
    /// The sign of `distance` is kept.
    pub fn degrees_for_distance(&self, distance: Distance) -> f32 {
        DEGREES_PER_ROTATION * distance.to_millimeters() / self.circumference_mm()
    }

    /// Distance in millimeters rolled by `degrees` of wheel rotation.
    ///
    /// Handy for turning a motor position delta back into travel.
    pub fn distance_for_degrees(&self, degrees: f32) -> f32 {
        degrees * self.circumference_mm() / DEGREES_PER_ROTATION
    }
}

/// Unvalidated wheel fields, checked by [`Wheel::new`] on deserialize.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct WheelDimensions {
    diameter_mm: f32,
    width_mm: f32,
}

#[cfg(feature = "serde")]
impl TryFrom<WheelDimensions> for Wheel {
    type Error = ArgumentError;

    fn try_from(raw: WheelDimensions) -> Result<Self, ArgumentError> {
        Wheel::new(raw.diameter_mm, raw.width_mm)
    }
}

/// Reject zero, negative and non-finite dimensions.
pub(crate) fn validate_dimension(name: &'static str, value: f32) -> Result<(), ArgumentError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ArgumentError::InvalidDimension { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circumference_is_pi_times_diameter() {
        let wheel = Wheel::new(62.4, 20.0).unwrap();
        assert!((wheel.circumference_mm() - 196.035).abs() < 0.01);
        assert!((wheel.radius_mm() - 31.2).abs() < 1e-4);
    }

    #[test]
    fn presets() {
        assert_eq!(Wheel::spike().diameter_mm(), 56.0);
        assert_eq!(Wheel::spike().width_mm(), 14.0);
        assert_eq!(Wheel::spike_large().diameter_mm(), 88.0);
    }

    #[test]
    fn one_circumference_is_one_rotation() {
        let wheel = Wheel::spike();
        let degrees = wheel.degrees_for_distance(Distance::Millimeters(wheel.circumference_mm()));
        assert!((degrees - 360.0).abs() < 1e-3);
    }

    #[test]
    fn half_meter_on_62mm_wheel() {
        let wheel = Wheel::new(62.4, 20.0).unwrap();
        let degrees = wheel.degrees_for_distance(Distance::Centimeters(50.0));
        // 360 * 500 / 196.035
        assert!((degrees - 918.2).abs() < 0.1, "got {}", degrees);
    }

    #[test]
    fn negative_distance_gives_negative_degrees() {
        let wheel = Wheel::spike();
        assert!(wheel.degrees_for_distance(Distance::Centimeters(-10.0)) < 0.0);
    }

    #[test]
    fn distance_for_degrees_inverts() {
        let wheel = Wheel::spike_large();
        let mm = wheel.distance_for_degrees(720.0);
        assert!((mm - 2.0 * wheel.circumference_mm()).abs() < 1e-3);
        let back = wheel.degrees_for_distance(Distance::Millimeters(mm));
        assert!((back - 720.0).abs() < 1e-3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_validates_dimensions() {
        let wheel: Wheel = serde_json::from_str(r#"{"diameter_mm":56.0,"width_mm":14.0}"#).unwrap();
        assert_eq!(wheel, Wheel::spike());

        let err = serde_json::from_str::<Wheel>(r#"{"diameter_mm":0.0,"width_mm":14.0}"#)
            .unwrap_err();
        assert!(err.to_string().contains("wheel diameter"));
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert_eq!(
            Wheel::new(0.0, 14.0),
            Err(ArgumentError::InvalidDimension {
                name: "wheel diameter",
                value: 0.0
            })
        );
        assert!(Wheel::new(-56.0, 14.0).is_err());
        assert!(Wheel::new(56.0, -1.0).is_err());
        assert!(Wheel::new(f32::NAN, 14.0).is_err());
        assert!(Wheel::new(f32::INFINITY, 14.0).is_err());
    }
}
