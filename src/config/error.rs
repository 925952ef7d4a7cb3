use crate::config::step::Step;

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    DateOrder,
    DateParse {
        field: &'static str,
        source: chrono::ParseError,
    },
    Io(std::io::Error),
    Json(serde_json::Error),
    ValidRange { min: f32, max: f32 },
    ScaleFactor(f32),
    MissingPath { step: Step, field: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DateOrder => write!(f, "end_date cannot be earlier than start_date"),
            ConfigError::DateParse { field, source } => {
                write!(f, "Invalid {} format: {}", field, source)
            }
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse JSON: {}", e),
            ConfigError::ValidRange { min, max } => {
                write!(f, "valid_range min ({}) must be <= max ({})", min, max)
            }
            ConfigError::ScaleFactor(v) => {
                write!(f, "scale_factor must be finite and non-zero, got {}", v)
            }
            ConfigError::MissingPath { step, field } => {
                write!(f, "step '{}' requires '{}' to be set", step, field)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Json(err)
    }
}
