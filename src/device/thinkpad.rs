//! thinkpad_acpi implementation
//!
//! Reads the CPU temperature from `/proc/acpi/ibm/thermal` and drives the
//! fan through `/proc/acpi/ibm/fan`. Writing a level requires the module
//! to be loaded with `fan_control=1` and root privileges.

use crate::device::traits::{FanActuator, TemperatureSensor};
use crate::domain::{FanStatus, SpeedLevel, Temperature};
use crate::error::{ActuatorError, SensorError};

use std::fs;
use std::path::{Path, PathBuf};

/// Default thermal sensor file
pub const DEFAULT_THERMAL_PATH: &str = "/proc/acpi/ibm/thermal";
/// Default fan control file
pub const DEFAULT_FAN_PATH: &str = "/proc/acpi/ibm/fan";

/// CPU temperature sensor backed by the ACPI thermal file
#[derive(Debug, Clone)]
pub struct AcpiThermal {
    path: PathBuf,
}

impl AcpiThermal {
    /// Create a sensor reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the thermal file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for AcpiThermal {
    fn default() -> Self {
        Self::new(DEFAULT_THERMAL_PATH)
    }
}

impl TemperatureSensor for AcpiThermal {
    fn read_temperature(&mut self) -> Result<Temperature, SensorError> {
        let content = fs::read_to_string(&self.path).map_err(|e| SensorError::Unavailable {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        parse_thermal(&content)
    }
}

/// Parse the first reading of a `temperatures:` line
///
/// The first value is the CPU sensor; the others are ignored.
pub fn parse_thermal(content: &str) -> Result<Temperature, SensorError> {
    let rest = content
        .trim_start()
        .strip_prefix("temperatures:")
        .ok_or_else(|| SensorError::Malformed(content.trim().to_string()))?;

    rest.split_whitespace()
        .next()
        .and_then(|v| v.parse::<i32>().ok())
        .map(Temperature::new)
        .ok_or_else(|| SensorError::Malformed(content.trim().to_string()))
}

/// Fan actuator backed by the ACPI fan file
#[derive(Debug, Clone)]
pub struct AcpiFan {
    path: PathBuf,
}

impl AcpiFan {
    /// Create an actuator writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the fan file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for AcpiFan {
    fn default() -> Self {
        Self::new(DEFAULT_FAN_PATH)
    }
}

impl FanActuator for AcpiFan {
    fn write_speed(&mut self, level: SpeedLevel) -> Result<(), ActuatorError> {
        let command = format!("level {}\n", level.acpi_arg());
        fs::write(&self.path, command).map_err(|e| ActuatorError::WriteFailed {
            level: level.acpi_arg(),
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        log::debug!("Wrote fan level {} to {}", level.acpi_arg(), self.path.display());
        Ok(())
    }

    fn fan_status(&self) -> Result<FanStatus, ActuatorError> {
        let content = fs::read_to_string(&self.path).map_err(|e| ActuatorError::ReadFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(FanStatus::parse(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_thermal() {
        let content = "temperatures:\t52 0 40 0 32 0 33 0 0 0 0 0 0 0 0 0\n";
        assert_eq!(parse_thermal(content).unwrap(), Temperature::new(52));
    }

    #[test]
    fn test_parse_thermal_negative() {
        let content = "temperatures:\t-5 -128 -128\n";
        assert_eq!(parse_thermal(content).unwrap(), Temperature::new(-5));
    }

    #[test]
    fn test_parse_thermal_malformed() {
        assert!(matches!(
            parse_thermal("status: enabled\n"),
            Err(SensorError::Malformed(_))
        ));
        assert!(matches!(
            parse_thermal("temperatures:\n"),
            Err(SensorError::Malformed(_))
        ));
        assert!(matches!(
            parse_thermal("temperatures:\tn/a\n"),
            Err(SensorError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_thermal_file() {
        let mut sensor = AcpiThermal::new("/nonexistent/acpi/ibm/thermal");
        assert!(matches!(
            sensor.read_temperature(),
            Err(SensorError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_default_paths() {
        assert_eq!(AcpiThermal::default().path(), Path::new(DEFAULT_THERMAL_PATH));
        assert_eq!(AcpiFan::default().path(), Path::new(DEFAULT_FAN_PATH));
    }
}
