use thiserror::Error;

/// A mechanism input that a force computation cannot accept
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DomainError {
    #[error("crank radius must be positive, got {0}")]
    NonPositiveRadius(f64),
    #[error("{quantity} must be finite, got {value}")]
    NonFinite { quantity: &'static str, value: f64 },
}

/// Errors that end the application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("cannot open log file {}: {source}", .path.display())]
    LogFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}
