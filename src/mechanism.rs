use crate::error::DomainError;
use crate::math::Point2;
use crate::units::cm_from_pixels;
use std::f64::consts::FRAC_PI_2;

/// Spring displacement amplitude and rest offset in centimeters
pub const SPRING_AMPLITUDE_CM: f64 = 3.0;

/// Mechanism points in screen space for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedGeometry {
    pub pivot: Point2,
    pub crank_pin: Point2,
    pub slider_end: Point2,
    pub fixed_rod_end: Point2,
}

/// Linear force at the crank pin, in kgF when torque is in kgF·cm
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForceReadout {
    pub instantaneous: f64,
    pub maximum: f64,
}

/// Rotating end of the crank arm
pub fn crank_pin_position(center: Point2, theta: f64, radius: f64, zoom: f64) -> Point2 {
    let (sin, cos) = theta.sin_cos();
    Point2::new(
        center.x + radius * zoom * cos,
        center.y + radius * zoom * sin,
    )
}

/// Slider position on the vertical axis through the pivot.
///
/// The slider follows the crank's vertical excursion plus a fixed offset.
/// Rod length does not constrain it; it only shapes [`fixed_rod_end_position`].
pub fn slider_end_position(
    center: Point2,
    theta: f64,
    radius: f64,
    offset: f64,
    zoom: f64,
) -> Point2 {
    Point2::new(
        center.x,
        center.y + offset * zoom + radius * zoom * theta.sin(),
    )
}

/// Lower end of the connecting rod on the pivot's vertical axis.
///
/// When the rod is shorter than the crank pin's horizontal excursion the
/// end collapses onto the pivot height instead of going imaginary.
pub fn fixed_rod_end_position(
    center: Point2,
    crank_pin: Point2,
    rod_length: f64,
    zoom: f64,
) -> Point2 {
    let rod = rod_length * zoom;
    let dx = crank_pin.x - center.x;
    let radicand = (rod * rod - dx * dx).max(0.0);
    Point2::new(center.x, center.y + radicand.sqrt())
}

fn check_inputs(torque: f64, radius: f64) -> Result<f64, DomainError> {
    if !torque.is_finite() {
        return Err(DomainError::NonFinite {
            quantity: "torque",
            value: torque,
        });
    }
    if !radius.is_finite() {
        return Err(DomainError::NonFinite {
            quantity: "crank radius",
            value: radius,
        });
    }
    let radius_cm = cm_from_pixels(radius);
    if radius_cm <= 0.0 {
        return Err(DomainError::NonPositiveRadius(radius));
    }
    Ok(radius_cm)
}

/// Rejects a force that overflowed, e.g. from a vanishing lever arm
fn finite_force(force: f64) -> Result<f64, DomainError> {
    if force.is_finite() {
        Ok(force)
    } else {
        Err(DomainError::NonFinite {
            quantity: "force",
            value: force,
        })
    }
}

/// Largest force the crank can deliver, reached at θ = 0 and θ = π.
///
/// `radius` is in pixels; the lever arm is converted to centimeters.
pub fn maximum_force(torque: f64, radius: f64) -> Result<f64, DomainError> {
    let radius_cm = check_inputs(torque, radius)?;
    finite_force(torque / radius_cm)
}

/// Signed force at crank angle `theta`; zero at the dead centers π/2 and 3π/2
pub fn instantaneous_force(torque: f64, radius: f64, theta: f64) -> Result<f64, DomainError> {
    if !theta.is_finite() {
        return Err(DomainError::NonFinite {
            quantity: "crank angle",
            value: theta,
        });
    }
    let radius_cm = check_inputs(torque, radius)?;
    finite_force(torque / radius_cm * (theta + FRAC_PI_2).sin())
}

/// Spring compression in centimeters for crank angle `theta`, always >= 0
pub fn spring_displacement(theta: f64) -> f64 {
    SPRING_AMPLITUDE_CM * theta.sin() + SPRING_AMPLITUDE_CM
}

/// Hooke's law
pub fn body_spring_force(constant: f64, displacement: f64) -> f64 {
    constant * displacement
}

/// Both force readouts at once
pub fn force_readout(torque: f64, radius: f64, theta: f64) -> Result<ForceReadout, DomainError> {
    Ok(ForceReadout {
        instantaneous: instantaneous_force(torque, radius, theta)?,
        maximum: maximum_force(torque, radius)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::pixels_from_cm;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    const CENTER: Point2 = Point2::new(400.0, 300.0);

    #[test]
    fn crank_pin_traces_circle() {
        let r = pixels_from_cm(3.0);
        let p = crank_pin_position(CENTER, 0.0, r, 1.0);
        assert!((p.x - (400.0 + r)).abs() < 1e-9);
        assert!((p.y - 300.0).abs() < 1e-9);

        let p = crank_pin_position(CENTER, PI / 2.0, r, 2.0);
        assert!((p.x - 400.0).abs() < 1e-9);
        assert!((p.y - (300.0 + 2.0 * r)).abs() < 1e-9);

        for i in 0..16 {
            let theta = i as f64 * PI / 8.0;
            let p = crank_pin_position(CENTER, theta, r, 1.5);
            assert!((p.distance(CENTER) - 1.5 * r).abs() < 1e-9);
        }
    }

    #[test]
    fn slider_stays_on_pivot_axis() {
        let r = 100.0;
        for i in 0..16 {
            let theta = i as f64 * PI / 8.0;
            let s = slider_end_position(CENTER, theta, r, 200.0, 1.0);
            assert_eq!(s.x, CENTER.x);
            let pin = crank_pin_position(CENTER, theta, r, 1.0);
            assert!((s.y - (pin.y + 200.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn slider_scales_with_zoom() {
        let s = slider_end_position(CENTER, PI / 2.0, 100.0, 200.0, 0.5);
        assert!((s.y - (300.0 + 100.0 + 50.0)).abs() < 1e-9);
    }

    #[test]
    fn fixed_rod_end_uses_rod_length() {
        let pin = crank_pin_position(CENTER, PI / 2.0, 100.0, 1.0);
        let end = fixed_rod_end_position(CENTER, pin, 250.0, 1.0);
        assert_eq!(end.x, CENTER.x);
        assert!((end.y - 550.0).abs() < 1e-9);

        let pin = crank_pin_position(CENTER, 0.0, 30.0, 1.0);
        let end = fixed_rod_end_position(CENTER, pin, 50.0, 1.0);
        assert!((end.y - 340.0).abs() < 1e-9);
    }

    #[test]
    fn short_rod_never_produces_nan() {
        let pin = crank_pin_position(CENTER, 0.0, 500.0, 1.0);
        let end = fixed_rod_end_position(CENTER, pin, 10.0, 1.0);
        assert!(end.is_finite());
        assert_eq!(end, CENTER);
    }

    #[test]
    fn torque_scenario() {
        let r = pixels_from_cm(3.0);
        let max = maximum_force(10.0, r).unwrap();
        assert!((max - 10.0 / 3.0).abs() < 1e-9);
        let inst = instantaneous_force(10.0, r, 0.0).unwrap();
        assert!((inst - 3.333_333_333).abs() < 1e-6);
    }

    #[test]
    fn force_is_signed() {
        let r = pixels_from_cm(2.0);
        let at_pi = instantaneous_force(20.0, r, PI).unwrap();
        assert!((at_pi + 10.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        assert_eq!(
            maximum_force(10.0, 0.0),
            Err(DomainError::NonPositiveRadius(0.0))
        );
        assert_eq!(
            instantaneous_force(10.0, -5.0, 0.0),
            Err(DomainError::NonPositiveRadius(-5.0))
        );
        assert!(force_readout(10.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn vanishing_radius_overflow_is_rejected() {
        assert!(matches!(
            maximum_force(200.0, 1e-308),
            Err(DomainError::NonFinite { quantity: "force", .. })
        ));
        assert!(matches!(
            instantaneous_force(200.0, 1e-308, 0.0),
            Err(DomainError::NonFinite { quantity: "force", .. })
        ));
        assert!(force_readout(200.0, 1e-308, 0.0).is_err());
        assert!(maximum_force(200.0, 1e-3).unwrap().is_finite());
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        assert!(matches!(
            maximum_force(f64::NAN, 10.0),
            Err(DomainError::NonFinite { quantity: "torque", .. })
        ));
        assert!(matches!(
            maximum_force(10.0, f64::INFINITY),
            Err(DomainError::NonFinite { quantity: "crank radius", .. })
        ));
        assert!(matches!(
            instantaneous_force(10.0, 10.0, f64::NAN),
            Err(DomainError::NonFinite { quantity: "crank angle", .. })
        ));
    }

    #[test]
    fn spring_follows_hookes_law() {
        assert_eq!(spring_displacement(0.0), 3.0);
        assert!((spring_displacement(PI / 2.0) - 6.0).abs() < 1e-12);
        assert!(spring_displacement(1.5 * PI).abs() < 1e-12);
        assert_eq!(body_spring_force(2.0, 3.0), 6.0);
        assert_eq!(body_spring_force(2.0, 0.0), 0.0);
    }

    proptest! {
        #[test]
        fn dead_centers_have_zero_force(torque in 1.0f64..200.0, radius_cm in 1.0f64..20.0) {
            let r = pixels_from_cm(radius_cm);
            prop_assert!(instantaneous_force(torque, r, PI / 2.0).unwrap().abs() < 1e-9);
            prop_assert!(instantaneous_force(torque, r, 1.5 * PI).unwrap().abs() < 1e-9);
        }

        #[test]
        fn extremes_match_maximum(torque in 1.0f64..200.0, radius_cm in 1.0f64..20.0) {
            let r = pixels_from_cm(radius_cm);
            let max = maximum_force(torque, r).unwrap();
            prop_assert!((instantaneous_force(torque, r, 0.0).unwrap().abs() - max).abs() < 1e-9);
            prop_assert!((instantaneous_force(torque, r, PI).unwrap().abs() - max).abs() < 1e-9);
        }

        #[test]
        fn force_never_exceeds_maximum(
            torque in 1.0f64..200.0,
            radius_cm in 1.0f64..20.0,
            theta in 0.0f64..std::f64::consts::TAU,
        ) {
            let r = pixels_from_cm(radius_cm);
            let readout = force_readout(torque, r, theta).unwrap();
            prop_assert!(readout.instantaneous.abs() <= readout.maximum + 1e-9);
        }

        #[test]
        fn spring_displacement_is_non_negative(theta in -100.0f64..100.0) {
            prop_assert!(spring_displacement(theta) >= -1e-12);
        }
    }
}
