use crate::math::Point2;
use crate::params::MechanismParameters;
use crate::state::Startup;
use crate::units::pixels_from_cm;
use clap::Parser;
use std::f64::consts::PI;
use std::path::PathBuf;

/// Interactive slider-crank mechanism simulator
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// Motor torque in kgF*cm [1, 200]
    #[arg(long, default_value_t = 10.0)]
    pub torque: f64,

    /// Crank radius in cm [1, 20]
    #[arg(long, default_value_t = 3.0)]
    pub radius: f64,

    /// Connecting rod length in cm [5, 30]
    #[arg(long, default_value_t = 8.0)]
    pub rod_length: f64,

    /// Angular velocity in rad/s [pi, 6pi]
    #[arg(long, default_value_t = PI)]
    pub omega: f64,

    /// Simulation speed multiplier [0.1, 3.0]
    #[arg(long, default_value_t = 1.0)]
    pub time_scale: f64,

    /// Initial zoom [0.1, 5.0]
    #[arg(long, default_value_t = 0.5)]
    pub zoom: f64,

    /// Distance from the crank pivot to the slider's rest position, in cm (0-30)
    #[arg(long, default_value_t = 6.0)]
    pub slider_offset: f64,

    /// Body spring constant in kgF/cm (0.1-100)
    #[arg(long, default_value_t = 1.5)]
    pub spring_constant: f64,

    /// Target frame rate
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Start with the debug overlay shown
    #[arg(short, long)]
    pub debug: bool,

    /// Start paused
    #[arg(long)]
    pub paused: bool,

    /// Write logs to this file (the terminal is used for drawing)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Mechanism parameters in internal units; clamping happens in the core
    pub fn parameters(&self) -> MechanismParameters {
        MechanismParameters {
            torque: self.torque,
            crank_radius: pixels_from_cm(self.radius),
            rod_length: pixels_from_cm(self.rod_length),
            angular_velocity: self.omega,
            time_scale: self.time_scale,
            slider_offset: pixels_from_cm(self.slider_offset),
            spring_constant: self.spring_constant,
        }
    }

    /// Startup configuration with the pivot placed at `center`
    pub fn startup(&self, center: Point2) -> Startup {
        Startup {
            params: self.parameters(),
            center,
            zoom: self.zoom,
            theta: 0.0,
        }
    }
}
