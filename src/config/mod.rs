//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging. The
//! configuration is only read; operator changes are never written back.

pub mod builder;
pub mod file;

pub use builder::{AutoOverrides, ConfigBuilder, CurveOverrides, ManualOverrides};
pub use file::ConfigFile;

use crate::device::thinkpad::{DEFAULT_FAN_PATH, DEFAULT_THERMAL_PATH};
use crate::domain::{
    validate_auto, validate_curve, validate_manual, AutoProfile, FanCurve, ManualProfile, Profile,
    ScanInterval, SpeedLevel, Temperature,
};
use crate::engine::ExitPolicy;
use crate::error::{ConfigError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Sensor and actuator files
    pub device: DeviceConfig,
    /// Mode selection for `run`
    pub control: ControlConfig,
    /// Auto (threshold) mode settings
    pub auto: AutoConfig,
    /// Manual mode settings
    pub manual: ManualConfig,
    /// Curve mode settings
    pub curve: CurveConfig,
}

impl Config {
    /// Validated profile for the configured mode
    pub fn profile(&self) -> Result<Profile, ConfigError> {
        match self.control.mode {
            ControlMode::Auto => self.auto.to_profile().map(Profile::Auto),
            ControlMode::Manual => self.manual.to_profile().map(Profile::Manual),
            ControlMode::Curve => self.curve.to_profile().map(Profile::Curve),
        }
    }
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
    /// Dry run mode
    pub dry_run: bool,
    /// What to do with a non-auto fan level on exit
    pub on_exit: ExitPolicy,
}

/// Device file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// thinkpad_acpi thermal file
    pub thermal_path: String,
    /// thinkpad_acpi fan file
    pub fan_path: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            thermal_path: DEFAULT_THERMAL_PATH.to_string(),
            fan_path: DEFAULT_FAN_PATH.to_string(),
        }
    }
}

/// Control mode selection
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ControlConfig {
    /// Mode started by `run`
    pub mode: ControlMode,
}

/// Control mode names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    #[default]
    Auto,
    Manual,
    Curve,
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMode::Auto => write!(f, "auto"),
            ControlMode::Manual => write!(f, "manual"),
            ControlMode::Curve => write!(f, "curve"),
        }
    }
}

/// A fan level as written in the config file: `3`, `"auto"` or `"full"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSetting {
    Number(u8),
    Name(String),
}

impl LevelSetting {
    /// Convert to a validated level
    pub fn to_level(&self) -> Result<SpeedLevel, ValidationError> {
        match self {
            LevelSetting::Number(n) => SpeedLevel::new(*n),
            LevelSetting::Name(name) => name.parse(),
        }
    }
}

impl From<SpeedLevel> for LevelSetting {
    fn from(level: SpeedLevel) -> Self {
        LevelSetting::Number(level.value())
    }
}

/// Auto mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoConfig {
    /// Temperature considered safe
    pub safe_temp: i32,
    /// Temperature from which the critical level is applied
    pub critical_temp: i32,
    /// Level applied while critical
    pub critical_speed: LevelSetting,
    /// Seconds between checks
    pub interval_seconds: u32,
}

impl Default for AutoConfig {
    fn default() -> Self {
        Self {
            safe_temp: 50,
            critical_temp: 70,
            critical_speed: LevelSetting::Name("full".to_string()),
            interval_seconds: 5,
        }
    }
}

impl AutoConfig {
    /// Convert to an AutoProfile domain object
    pub fn to_profile(&self) -> Result<AutoProfile, ConfigError> {
        let speed = field("auto.critical_speed", self.critical_speed.to_level())?;
        let interval = field(
            "auto.interval_seconds",
            ScanInterval::from_secs(self.interval_seconds),
        )?;
        field(
            "auto",
            validate_auto(
                Temperature::new(self.safe_temp),
                Temperature::new(self.critical_temp),
                speed,
                interval,
            ),
        )
    }
}

/// Manual mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualConfig {
    /// Fixed fan level
    pub speed: LevelSetting,
    /// Seconds between status checks
    pub interval_seconds: u32,
}

impl Default for ManualConfig {
    fn default() -> Self {
        Self {
            speed: LevelSetting::Number(3),
            interval_seconds: 5,
        }
    }
}

impl ManualConfig {
    /// Convert to a ManualProfile domain object
    pub fn to_profile(&self) -> Result<ManualProfile, ConfigError> {
        let speed = field("manual.speed", self.speed.to_level())?;
        let interval = field(
            "manual.interval_seconds",
            ScanInterval::from_secs(self.interval_seconds),
        )?;
        Ok(validate_manual(speed, interval))
    }
}

/// Curve mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Temperature at which the curve starts
    pub safe_temp: i32,
    /// Temperature from which `critical_speed` is applied
    pub critical_temp: i32,
    /// Degrees per step
    pub delta_temp: i32,
    /// Levels per step
    pub step: u8,
    /// Level at or below `safe_temp`
    pub safe_speed: LevelSetting,
    /// Level at or above `critical_temp`
    pub critical_speed: LevelSetting,
    /// Seconds between checks
    pub interval_seconds: u32,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            safe_temp: 45,
            critical_temp: 80,
            delta_temp: 5,
            step: 1,
            safe_speed: LevelSetting::Number(1),
            critical_speed: LevelSetting::Number(7),
            interval_seconds: 5,
        }
    }
}

impl CurveConfig {
    /// Convert to a FanCurve domain object
    pub fn to_profile(&self) -> Result<FanCurve, ConfigError> {
        let safe_speed = field("curve.safe_speed", self.safe_speed.to_level())?;
        let crit_speed = field("curve.critical_speed", self.critical_speed.to_level())?;
        let interval = field(
            "curve.interval_seconds",
            ScanInterval::from_secs(self.interval_seconds),
        )?;
        field(
            "curve",
            validate_curve(
                Temperature::new(self.safe_temp),
                Temperature::new(self.critical_temp),
                self.delta_temp,
                self.step,
                safe_speed,
                crit_speed,
                interval,
            ),
        )
    }
}

fn field<T>(key: &str, result: Result<T, ValidationError>) -> Result<T, ConfigError> {
    result.map_err(|source| ConfigError::InvalidValue {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.control.mode, ControlMode::Auto);
        assert_eq!(config.device.fan_path, "/proc/acpi/ibm/fan");
        assert_eq!(config.general.on_exit, ExitPolicy::Ask);
    }

    #[test]
    fn test_default_profiles_are_valid() {
        let config = Config::default();
        let auto = config.auto.to_profile().unwrap();
        assert_eq!(auto.critical_speed(), SpeedLevel::FULL);
        assert_eq!(config.manual.to_profile().unwrap().fixed_speed().value(), 3);
        assert!(config.curve.to_profile().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            [general]
            on_exit = "restore"

            [control]
            mode = "curve"

            [auto]
            critical_speed = 7

            [curve]
            safe_temp = 40
            critical_temp = 80
            delta_temp = 10
            safe_speed = "auto"
            critical_speed = "full"
            "#,
        )
        .unwrap();

        assert_eq!(config.general.on_exit, ExitPolicy::Restore);
        assert_eq!(config.auto.critical_speed, LevelSetting::Number(7));
        match config.profile().unwrap() {
            Profile::Curve(curve) => {
                assert_eq!(curve.safe_speed(), SpeedLevel::AUTO);
                assert_eq!(curve.crit_speed(), SpeedLevel::FULL);
                assert_eq!(curve.delta_temp(), 10);
            }
            other => panic!("Expected curve profile, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_values_name_the_key() {
        let mut config = Config::default();
        config.auto.safe_temp = 80;
        let err = config.auto.to_profile().unwrap_err();
        assert!(err.to_string().contains("'auto'"));

        config.manual.speed = LevelSetting::Number(12);
        let err = config.manual.to_profile().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                source: ValidationError::InvalidSpeedLevel(12),
                ..
            }
        ));

        config.curve.interval_seconds = 0;
        let err = config.curve.to_profile().unwrap_err();
        assert!(err.to_string().contains("curve.interval_seconds"));
    }
}
