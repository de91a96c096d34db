//! Unified error types for tpfanctl
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Operator input rejected by the profile validator
    #[error("Invalid settings: {0}")]
    Validation(#[from] ValidationError),

    /// Temperature sensor could not be read
    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    /// Fan level could not be written
    #[error("Actuator error: {0}")]
    Actuator(#[from] ActuatorError),

    /// Control engine refused an operation
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error (terminal output, prompts)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from profile validation
///
/// A rejected profile never replaces the one already running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Safe temperature must be strictly below the critical one
    #[error("Safe temperature ({safe}°C) must be < critical temperature ({critical}°C)")]
    SafeNotBelowCritical { safe: i32, critical: i32 },

    /// The first curve step would already reach the critical temperature
    #[error(
        "Safe temperature ({safe}°C) + delta ({delta}°C) must be < critical temperature ({critical}°C)"
    )]
    DeltaReachesCritical { safe: i32, delta: i32, critical: i32 },

    /// Curve delta must be a positive number of degrees
    #[error("Temperature delta must be > 0 (got {0}°C)")]
    NonPositiveDelta(i32),

    /// Curve step must raise the level by at least one
    #[error("Speed step must be >= 1")]
    ZeroStep,

    /// Speed level outside 0 (auto) ..= 8 (full speed)
    #[error("Invalid fan level: {0} (must be 0-8, auto or full)")]
    InvalidSpeedLevel(u8),

    /// Speed level text that names no level
    #[error("Invalid fan level '{0}' (expected auto, 1-7 or full)")]
    UnknownSpeedLevel(String),

    /// Scan interval of zero seconds
    #[error("Scan interval must be at least 1 second")]
    ZeroScanInterval,
}

/// Errors from reading the temperature sensor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor file does not exist or cannot be opened
    #[error("Temperature sensor unavailable at {path}: {reason}")]
    Unavailable { path: String, reason: String },

    /// The sensor file exists but its content is not understood
    #[error("Unexpected temperature sensor output: {0}")]
    Malformed(String),
}

/// Errors from writing the fan level
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActuatorError {
    /// Writing the level command failed
    #[error("Failed to set fan level {level} via {path}: {reason}")]
    WriteFailed {
        level: String,
        path: String,
        reason: String,
    },

    /// Fan status could not be read back
    #[error("Failed to read fan status from {path}: {reason}")]
    ReadFailed { path: String, reason: String },
}

/// Errors from control engine operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A tick was requested while no mode is running
    #[error("Fan control is not running")]
    NotRunning,

    /// The sensor failed; the run was stopped
    #[error("Fan control stopped: {0}")]
    Sensor(#[from] SensorError),

    /// The final restore-to-auto write failed
    #[error("Could not restore automatic fan control: {0}")]
    Restore(#[from] ActuatorError),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: ValidationError,
    },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::SafeNotBelowCritical {
            safe: 70,
            critical: 60,
        };
        assert_eq!(
            err.to_string(),
            "Safe temperature (70°C) must be < critical temperature (60°C)"
        );
    }

    #[test]
    fn test_delta_error_display() {
        let err = ValidationError::DeltaReachesCritical {
            safe: 40,
            delta: 40,
            critical: 80,
        };
        assert!(err.to_string().contains("delta (40°C)"));
        assert!(err.to_string().contains("(80°C)"));
    }

    #[test]
    fn test_sensor_error_display() {
        let err = SensorError::Unavailable {
            path: "/proc/acpi/ibm/thermal".to_string(),
            reason: "No such file or directory".to_string(),
        };
        assert!(err.to_string().contains("/proc/acpi/ibm/thermal"));
    }

    #[test]
    fn test_error_conversion() {
        let err: AppError = ValidationError::ZeroStep.into();
        assert!(matches!(err, AppError::Validation(_)));

        let err: AppError = EngineError::NotRunning.into();
        assert!(matches!(err, AppError::Engine(EngineError::NotRunning)));
    }

    #[test]
    fn test_config_error_keeps_source() {
        let err = ConfigError::InvalidValue {
            key: "auto.speed".to_string(),
            source: ValidationError::InvalidSpeedLevel(9),
        };
        assert!(err.to_string().contains("auto.speed"));
        assert!(err.to_string().contains("0-8"));
    }
}
