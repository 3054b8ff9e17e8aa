use crate::clock::SimulationClock;
use crate::math::Point2;
use crate::mechanism::{
    body_spring_force, crank_pin_position, fixed_rod_end_position, force_readout,
    slider_end_position, spring_displacement, DerivedGeometry, ForceReadout,
};
use crate::params::{MechanismParameters, Parameter};
use crate::viewport::Viewport;

/// Configuration the simulation returns to on reset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Startup {
    pub params: MechanismParameters,
    pub center: Point2,
    pub zoom: f64,
    pub theta: f64,
}

/// Application state
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Written by the parameter panel, read by the model
    pub params: MechanismParameters,
    /// Crank angle and simulated time
    pub clock: SimulationClock,
    /// Pan and zoom
    pub viewport: Viewport,
    /// Parameter row the arrow keys adjust
    pub selected: Parameter,
    /// Enable debug mode
    pub debug: bool,
    /// Simulation paused
    pub paused: bool,
    startup: Startup,
}

/// Everything the scene needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub params: MechanismParameters,
    pub theta: f64,
    pub viewport: Viewport,
    pub geometry: DerivedGeometry,
    pub forces: ForceReadout,
    pub spring_displacement: f64,
    pub spring_force: f64,
    pub pump_frequency: f64,
}

impl SimulationState {
    pub fn new(startup: Startup) -> Self {
        let startup = Startup {
            params: startup.params.clamped(),
            ..startup
        };
        SimulationState {
            params: startup.params,
            clock: SimulationClock::new(startup.theta),
            viewport: Viewport::new(startup.center, startup.zoom),
            selected: Parameter::Torque,
            debug: false,
            paused: false,
            startup,
        }
    }

    pub fn theta(&self) -> f64 {
        self.clock.theta()
    }

    /// Advances the crank by one frame of `dt` seconds unless paused
    pub fn tick(&mut self, dt: f64) {
        self.params = self.params.clamped();
        if self.paused {
            return;
        }
        self.clock
            .tick(self.params.angular_velocity, dt, self.params.time_scale);
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.viewport.end_drag();
        tracing::info!(paused = self.paused, "pause toggled");
    }

    pub fn adjust_selected(&mut self, steps: i32) {
        self.selected.adjust(&mut self.params, steps);
    }

    /// Restores startup parameters, angle and view
    pub fn reset(&mut self) {
        self.params = self.startup.params;
        self.clock = SimulationClock::new(self.startup.theta);
        self.viewport = Viewport::new(self.startup.center, self.startup.zoom);
        tracing::info!("simulation reset");
    }

    /// Derives geometry and forces from the current state
    pub fn snapshot(&self) -> Snapshot {
        let params = self.params.clamped();
        let theta = self.clock.theta();
        let center = self.viewport.center();
        let zoom = self.viewport.zoom();

        let crank_pin = crank_pin_position(center, theta, params.crank_radius, zoom);
        let geometry = DerivedGeometry {
            pivot: center,
            crank_pin,
            slider_end: slider_end_position(
                center,
                theta,
                params.crank_radius,
                params.slider_offset,
                zoom,
            ),
            fixed_rod_end: fixed_rod_end_position(center, crank_pin, params.rod_length, zoom),
        };

        let forces = force_readout(params.torque, params.crank_radius, theta).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "force readout unavailable");
            ForceReadout::default()
        });
        let displacement = spring_displacement(theta);

        Snapshot {
            params,
            theta,
            viewport: self.viewport,
            geometry,
            forces,
            spring_displacement: displacement,
            spring_force: body_spring_force(params.spring_constant, displacement),
            pump_frequency: params.pump_frequency(),
        }
    }
}
