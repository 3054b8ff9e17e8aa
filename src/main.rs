use clap::Parser;
use crankshaft_sim::config::Args;
use crankshaft_sim::error::AppError;
use crankshaft_sim::state::SimulationState;
use crankshaft_sim::widget;
use std::fs::File;
use std::sync::Mutex;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Main function
pub fn main() -> Result<(), AppError> {
    let args = Args::parse();
    setup_tracing(&args)?;

    let (cols, _rows) = widget::terminal_size();
    let params = args.parameters();
    let startup = args.startup(widget::initial_center(cols, &params, args.zoom));
    info!(
        version = env!("CARGO_PKG_VERSION"),
        torque = startup.params.torque,
        radius_cm = startup.params.crank_radius_cm(),
        rod_length_cm = startup.params.rod_length_cm(),
        omega = startup.params.angular_velocity,
        time_scale = startup.params.time_scale,
        zoom = startup.zoom,
        fps = args.fps,
        "starting simulation"
    );

    let mut state = SimulationState::new(startup);
    state.debug = args.debug;
    state.paused = args.paused;

    let frames = widget::run(&mut state, args.fps)?;
    info!(frames, theta = state.theta(), "simulation stopped");

    Ok(())
}

/// Installs a file subscriber when `--log-file` is given; the terminal is
/// owned by the renderer so nothing is logged to it
fn setup_tracing(args: &Args) -> Result<(), AppError> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path).map_err(|source| AppError::LogFile {
        path: path.clone(),
        source,
    })?;

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .compact()
        .init();
    Ok(())
}
