use crate::math::clamp_finite;
use crate::units::{cm_from_pixels, pixels_from_cm};
use std::f64::consts::{PI, TAU};

/// Slider rest offset range in centimeters
pub const SLIDER_OFFSET_RANGE: (f64, f64) = (0.0, 30.0);
/// Spring constant range in kgF/cm
pub const SPRING_CONSTANT_RANGE: (f64, f64) = (0.1, 100.0);

/// Mechanism inputs. Lengths are stored in pixels, torque in kgF·cm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MechanismParameters {
    pub torque: f64,
    pub crank_radius: f64,
    pub rod_length: f64,
    /// rad/s
    pub angular_velocity: f64,
    pub time_scale: f64,
    /// Distance from the pivot to the slider's rest position
    pub slider_offset: f64,
    /// kgF per cm of spring displacement
    pub spring_constant: f64,
}

impl Default for MechanismParameters {
    fn default() -> Self {
        MechanismParameters {
            torque: 10.0,
            crank_radius: pixels_from_cm(3.0),
            rod_length: pixels_from_cm(8.0),
            angular_velocity: PI,
            time_scale: 1.0,
            slider_offset: pixels_from_cm(6.0),
            spring_constant: 1.5,
        }
    }
}

impl MechanismParameters {
    pub fn crank_radius_cm(&self) -> f64 {
        cm_from_pixels(self.crank_radius)
    }

    pub fn rod_length_cm(&self) -> f64 {
        cm_from_pixels(self.rod_length)
    }

    /// Piston strokes per minute
    pub fn pump_frequency(&self) -> f64 {
        self.angular_velocity / TAU * 60.0
    }

    /// Copy with every slider parameter forced into its valid range
    pub fn clamped(&self) -> Self {
        let defaults = MechanismParameters::default();
        let mut out = *self;
        for parameter in Parameter::ALL {
            let value = parameter.get(self);
            if !value.is_finite() {
                tracing::debug!(parameter = parameter.label(), "non-finite parameter reset");
                parameter.restore(&mut out, &defaults);
                continue;
            }
            let (min, max) = parameter.range();
            let fixed = value.clamp(min, max);
            if fixed != value {
                tracing::debug!(
                    parameter = parameter.label(),
                    requested = value,
                    clamped = fixed,
                    "parameter clamped"
                );
                parameter.set(&mut out, fixed);
            }
        }
        let offset_cm = cm_from_pixels(self.slider_offset);
        out.slider_offset = match bounded("Slider Offset", offset_cm, SLIDER_OFFSET_RANGE) {
            Some(cm) if cm == offset_cm => self.slider_offset,
            Some(cm) => pixels_from_cm(cm),
            None => defaults.slider_offset,
        };
        out.spring_constant = bounded("Spring Constant", self.spring_constant, SPRING_CONSTANT_RANGE)
            .unwrap_or(defaults.spring_constant);
        out
    }
}

/// Clamps a parameter without a panel row; `None` when it is not finite
fn bounded(label: &'static str, value: f64, (min, max): (f64, f64)) -> Option<f64> {
    if !value.is_finite() {
        tracing::debug!(parameter = label, "non-finite parameter reset");
        return None;
    }
    let fixed = value.clamp(min, max);
    if fixed != value {
        tracing::debug!(
            parameter = label,
            requested = value,
            clamped = fixed,
            "parameter clamped"
        );
    }
    Some(fixed)
}

/// User-adjustable parameters, in panel order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Torque,
    CrankRadius,
    RodLength,
    AngularVelocity,
    TimeScale,
}

impl Parameter {
    pub const ALL: [Parameter; 5] = [
        Parameter::Torque,
        Parameter::CrankRadius,
        Parameter::RodLength,
        Parameter::AngularVelocity,
        Parameter::TimeScale,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Parameter::Torque => "Torque",
            Parameter::CrankRadius => "Crank Radius",
            Parameter::RodLength => "Connecting Rod Length",
            Parameter::AngularVelocity => "Angular Velocity",
            Parameter::TimeScale => "Time Scale",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Parameter::Torque => "kgF*cm",
            Parameter::CrankRadius | Parameter::RodLength => "cm",
            Parameter::AngularVelocity => "rad/s",
            Parameter::TimeScale => "x",
        }
    }

    /// Valid range in display units
    pub fn range(self) -> (f64, f64) {
        match self {
            Parameter::Torque => (1.0, 200.0),
            Parameter::CrankRadius => (1.0, 20.0),
            Parameter::RodLength => (5.0, 30.0),
            Parameter::AngularVelocity => (PI, 6.0 * PI),
            Parameter::TimeScale => (0.1, 3.0),
        }
    }

    /// Increment applied by one arrow key press
    pub fn step(self) -> f64 {
        match self {
            Parameter::Torque => 1.0,
            Parameter::CrankRadius | Parameter::RodLength => 0.5,
            Parameter::AngularVelocity => PI / 12.0,
            Parameter::TimeScale => 0.1,
        }
    }

    /// Current value in display units
    pub fn get(self, params: &MechanismParameters) -> f64 {
        match self {
            Parameter::Torque => params.torque,
            Parameter::CrankRadius => params.crank_radius_cm(),
            Parameter::RodLength => params.rod_length_cm(),
            Parameter::AngularVelocity => params.angular_velocity,
            Parameter::TimeScale => params.time_scale,
        }
    }

    /// Writes a value given in display units without clamping
    pub fn set(self, params: &mut MechanismParameters, value: f64) {
        match self {
            Parameter::Torque => params.torque = value,
            Parameter::CrankRadius => params.crank_radius = pixels_from_cm(value),
            Parameter::RodLength => params.rod_length = pixels_from_cm(value),
            Parameter::AngularVelocity => params.angular_velocity = value,
            Parameter::TimeScale => params.time_scale = value,
        }
    }

    /// Copies this parameter's raw value from `source`
    fn restore(self, params: &mut MechanismParameters, source: &MechanismParameters) {
        match self {
            Parameter::Torque => params.torque = source.torque,
            Parameter::CrankRadius => params.crank_radius = source.crank_radius,
            Parameter::RodLength => params.rod_length = source.rod_length,
            Parameter::AngularVelocity => params.angular_velocity = source.angular_velocity,
            Parameter::TimeScale => params.time_scale = source.time_scale,
        }
    }

    /// Moves the value by `steps` increments and clamps it into range
    pub fn adjust(self, params: &mut MechanismParameters, steps: i32) {
        let (min, max) = self.range();
        let value = self.get(params) + steps as f64 * self.step();
        self.set(params, clamp_finite(value, min, max, min));
    }

    pub fn next(self) -> Parameter {
        let index = Parameter::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Parameter::ALL[(index + 1) % Parameter::ALL.len()]
    }

    pub fn previous(self) -> Parameter {
        let index = Parameter::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Parameter::ALL[(index + Parameter::ALL.len() - 1) % Parameter::ALL.len()]
    }
}
