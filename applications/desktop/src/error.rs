/// Desktop application errors
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DesktopError>;

#[derive(Debug, Error)]
pub enum DesktopError {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration parsed but is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An explicitly requested config file does not exist
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The sounds directory could not be read
    #[error("Cannot read sounds from {}: {source}", path.display())]
    SoundsDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
}
