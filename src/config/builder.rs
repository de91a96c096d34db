//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile, ControlMode, LevelSetting};
use crate::domain::SpeedLevel;
use crate::engine::ExitPolicy;
use crate::error::ConfigError;

/// Command-line values for the `[auto]` section
#[derive(Debug, Clone, Default)]
pub struct AutoOverrides {
    pub safe_temp: Option<i32>,
    pub critical_temp: Option<i32>,
    pub critical_speed: Option<SpeedLevel>,
    pub interval_seconds: Option<u32>,
}

/// Command-line values for the `[manual]` section
#[derive(Debug, Clone, Default)]
pub struct ManualOverrides {
    pub speed: Option<SpeedLevel>,
    pub interval_seconds: Option<u32>,
}

/// Command-line values for the `[curve]` section
#[derive(Debug, Clone, Default)]
pub struct CurveOverrides {
    pub safe_temp: Option<i32>,
    pub critical_temp: Option<i32>,
    pub delta_temp: Option<i32>,
    pub step: Option<u8>,
    pub safe_speed: Option<SpeedLevel>,
    pub critical_speed: Option<SpeedLevel>,
    pub interval_seconds: Option<u32>,
}

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    ///
    /// An explicit path must load; without one the default locations are
    /// searched and the built-in defaults kept if none is found.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::load_default(),
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        Ok(self)
    }

    /// Override with CLI verbose flag
    pub fn with_verbose(mut self, verbose: Option<bool>) -> Self {
        if let Some(v) = verbose {
            self.config.general.verbose = v;
        }
        self
    }

    /// Override with CLI dry-run flag
    pub fn with_dry_run(mut self, dry_run: Option<bool>) -> Self {
        if let Some(d) = dry_run {
            self.config.general.dry_run = d;
        }
        self
    }

    /// Override the exit policy
    pub fn with_on_exit(mut self, on_exit: Option<ExitPolicy>) -> Self {
        if let Some(p) = on_exit {
            self.config.general.on_exit = p;
        }
        self
    }

    /// Override the thermal file
    pub fn with_thermal_path(mut self, path: Option<String>) -> Self {
        if let Some(p) = path {
            self.config.device.thermal_path = p;
        }
        self
    }

    /// Override the fan file
    pub fn with_fan_path(mut self, path: Option<String>) -> Self {
        if let Some(p) = path {
            self.config.device.fan_path = p;
        }
        self
    }

    /// Override the mode started by `run`
    pub fn with_mode(mut self, mode: Option<ControlMode>) -> Self {
        if let Some(m) = mode {
            self.config.control.mode = m;
        }
        self
    }

    /// Override auto mode settings
    pub fn with_auto(mut self, overrides: AutoOverrides) -> Self {
        let auto = &mut self.config.auto;
        if let Some(t) = overrides.safe_temp {
            auto.safe_temp = t;
        }
        if let Some(t) = overrides.critical_temp {
            auto.critical_temp = t;
        }
        if let Some(s) = overrides.critical_speed {
            auto.critical_speed = LevelSetting::from(s);
        }
        if let Some(i) = overrides.interval_seconds {
            auto.interval_seconds = i;
        }
        self
    }

    /// Override manual mode settings
    pub fn with_manual(mut self, overrides: ManualOverrides) -> Self {
        let manual = &mut self.config.manual;
        if let Some(s) = overrides.speed {
            manual.speed = LevelSetting::from(s);
        }
        if let Some(i) = overrides.interval_seconds {
            manual.interval_seconds = i;
        }
        self
    }

    /// Override curve mode settings
    pub fn with_curve(mut self, overrides: CurveOverrides) -> Self {
        let curve = &mut self.config.curve;
        if let Some(t) = overrides.safe_temp {
            curve.safe_temp = t;
        }
        if let Some(t) = overrides.critical_temp {
            curve.critical_temp = t;
        }
        if let Some(d) = overrides.delta_temp {
            curve.delta_temp = d;
        }
        if let Some(s) = overrides.step {
            curve.step = s;
        }
        if let Some(s) = overrides.safe_speed {
            curve.safe_speed = LevelSetting::from(s);
        }
        if let Some(s) = overrides.critical_speed {
            curve.critical_speed = LevelSetting::from(s);
        }
        if let Some(i) = overrides.interval_seconds {
            curve.interval_seconds = i;
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::new().build();
        assert!(!config.general.verbose);
        assert!(!config.general.dry_run);
        assert_eq!(config.control.mode, ControlMode::Auto);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigBuilder::new()
            .with_verbose(Some(true))
            .with_dry_run(Some(true))
            .with_on_exit(Some(ExitPolicy::Keep))
            .with_fan_path(Some("/tmp/fan".to_string()))
            .with_thermal_path(None)
            .with_mode(Some(ControlMode::Curve))
            .build();

        assert!(config.general.verbose);
        assert!(config.general.dry_run);
        assert_eq!(config.general.on_exit, ExitPolicy::Keep);
        assert_eq!(config.device.fan_path, "/tmp/fan");
        assert_eq!(config.device.thermal_path, "/proc/acpi/ibm/thermal");
        assert_eq!(config.control.mode, ControlMode::Curve);
    }

    #[test]
    fn test_mode_overrides_only_touch_given_fields() {
        let config = ConfigBuilder::new()
            .with_auto(AutoOverrides {
                critical_temp: Some(85),
                ..Default::default()
            })
            .with_curve(CurveOverrides {
                step: Some(2),
                critical_speed: Some(SpeedLevel::FULL),
                ..Default::default()
            })
            .with_manual(ManualOverrides {
                speed: Some(SpeedLevel::AUTO),
                interval_seconds: None,
            })
            .build();

        assert_eq!(config.auto.safe_temp, 50);
        assert_eq!(config.auto.critical_temp, 85);
        assert_eq!(config.curve.step, 2);
        assert_eq!(config.curve.delta_temp, 5);
        assert_eq!(
            config.curve.to_profile().unwrap().crit_speed(),
            SpeedLevel::FULL
        );
        assert_eq!(
            config.manual.to_profile().unwrap().fixed_speed(),
            SpeedLevel::AUTO
        );
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[auto]\nsafe_temp = 40\ncritical_temp = 75").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = ConfigBuilder::new()
            .with_file(Some(&path))
            .unwrap()
            .with_auto(AutoOverrides {
                safe_temp: Some(45),
                ..Default::default()
            })
            .build();
        assert_eq!(config.auto.safe_temp, 45);
        assert_eq!(config.auto.critical_temp, 75);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = ConfigBuilder::new().with_file(Some("/nonexistent/tpfanctl.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
