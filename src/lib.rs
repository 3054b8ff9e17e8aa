pub mod clock;
pub mod config;
pub mod error;
pub mod graphics;
pub mod math;
pub mod mechanism;
pub mod params;
pub mod scene;
pub mod state;
pub mod units;
pub mod viewport;
pub mod widget;
