use crate::math::wrap_angle;

/// Advances the crank angle by `omega * dt * time_scale`, wrapped into [0, 2π).
///
/// `dt` is the caller's frame time in seconds. A step that is not finite
/// leaves the angle where it was.
pub fn advance(theta: f64, omega: f64, dt: f64, time_scale: f64) -> f64 {
    let step = omega * dt * time_scale;
    if !step.is_finite() {
        return wrap_angle(if theta.is_finite() { theta } else { 0.0 });
    }
    let next = theta + step;
    if next.is_finite() {
        wrap_angle(next)
    } else {
        0.0
    }
}

/// Owns the crank angle and the elapsed simulated time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimulationClock {
    theta: f64,
    elapsed: f64,
}

impl SimulationClock {
    pub fn new(theta: f64) -> Self {
        SimulationClock {
            theta: advance(theta, 0.0, 0.0, 0.0),
            elapsed: 0.0,
        }
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Simulated seconds since the clock was created or reset
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn tick(&mut self, omega: f64, dt: f64, time_scale: f64) -> f64 {
        self.theta = advance(self.theta, omega, dt, time_scale);
        let scaled = dt * time_scale;
        if scaled.is_finite() && scaled > 0.0 {
            self.elapsed += scaled;
        }
        self.theta
    }

    pub fn reset(&mut self) {
        *self = SimulationClock::default();
    }
}
