//! Fan-related domain types
//!
//! Provides the validated fan level type and the fan status read back
//! from the actuator.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete fan level understood by `thinkpad_acpi`
///
/// Ordinal 0 hands control to the embedded controller (auto), 1-7 are
/// fixed levels and 8 is full speed. Values outside 0..=8 cannot be
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SpeedLevel(u8);

impl SpeedLevel {
    /// Firmware-controlled fan speed
    pub const AUTO: Self = Self(0);
    /// Maximum fan speed
    pub const FULL: Self = Self(8);
    /// Highest ordinal
    pub const MAX: u8 = 8;

    /// Create a new SpeedLevel with validation
    ///
    /// # Errors
    /// Returns `ValidationError::InvalidSpeedLevel` if value > 8
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if value > Self::MAX {
            return Err(ValidationError::InvalidSpeedLevel(value));
        }
        Ok(Self(value))
    }

    /// Get the ordinal (0-8)
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Whether this level leaves the fan to the firmware
    #[inline]
    pub const fn is_auto(&self) -> bool {
        self.0 == 0
    }

    /// Raise the level by `steps`, or `None` if that would pass full speed
    pub fn checked_raise(self, steps: u8) -> Option<Self> {
        self.0
            .checked_add(steps)
            .filter(|v| *v <= Self::MAX)
            .map(Self)
    }

    /// Argument for the `level` command of the ACPI fan interface
    pub fn acpi_arg(&self) -> String {
        match self.0 {
            0 => "auto".to_string(),
            8 => "full-speed".to_string(),
            n => n.to_string(),
        }
    }
}

impl Default for SpeedLevel {
    fn default() -> Self {
        Self::AUTO
    }
}

impl fmt::Display for SpeedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "Auto"),
            8 => write!(f, "Full-Speed"),
            n => write!(f, "{}", n),
        }
    }
}

impl FromStr for SpeedLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "auto" => Ok(Self::AUTO),
            "full" | "full-speed" | "max" => Ok(Self::FULL),
            other => other
                .parse::<u8>()
                .map_err(|_| ValidationError::UnknownSpeedLevel(s.to_string()))
                .and_then(Self::new),
        }
    }
}

impl TryFrom<u8> for SpeedLevel {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SpeedLevel> for u8 {
    fn from(level: SpeedLevel) -> Self {
        level.0
    }
}

/// Fan state as reported by the actuator interface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanStatus {
    /// Whether the fan is enabled
    pub enabled: Option<bool>,
    /// Current speed in RPM
    pub rpm: Option<u32>,
    /// Level as reported by the driver (may be `auto`, `disengaged`, ...)
    pub level: Option<String>,
}

impl FanStatus {
    /// Parse the `key:\tvalue` lines of `/proc/acpi/ibm/fan`
    pub fn parse(content: &str) -> Self {
        let mut status = Self::default();

        for line in content.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "status" => status.enabled = Some(value == "enabled"),
                "speed" => status.rpm = value.parse().ok(),
                "level" => status.level = Some(value.to_string()),
                _ => {}
            }
        }

        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_level_valid() {
        assert!(SpeedLevel::new(0).is_ok());
        assert!(SpeedLevel::new(4).is_ok());
        assert!(SpeedLevel::new(8).is_ok());
    }

    #[test]
    fn test_speed_level_invalid() {
        assert_eq!(
            SpeedLevel::new(9),
            Err(ValidationError::InvalidSpeedLevel(9))
        );
        assert!(SpeedLevel::new(255).is_err());
    }

    #[test]
    fn test_speed_level_ordering() {
        assert!(SpeedLevel::AUTO < SpeedLevel::new(1).unwrap());
        assert!(SpeedLevel::new(7).unwrap() < SpeedLevel::FULL);
    }

    #[test]
    fn test_speed_level_display() {
        assert_eq!(SpeedLevel::AUTO.to_string(), "Auto");
        assert_eq!(SpeedLevel::new(3).unwrap().to_string(), "3");
        assert_eq!(SpeedLevel::FULL.to_string(), "Full-Speed");
    }

    #[test]
    fn test_speed_level_acpi_arg() {
        assert_eq!(SpeedLevel::AUTO.acpi_arg(), "auto");
        assert_eq!(SpeedLevel::new(5).unwrap().acpi_arg(), "5");
        assert_eq!(SpeedLevel::FULL.acpi_arg(), "full-speed");
    }

    #[test]
    fn test_speed_level_parse() {
        assert_eq!("auto".parse::<SpeedLevel>().unwrap(), SpeedLevel::AUTO);
        assert_eq!("Full".parse::<SpeedLevel>().unwrap(), SpeedLevel::FULL);
        assert_eq!("full-speed".parse::<SpeedLevel>().unwrap(), SpeedLevel::FULL);
        assert_eq!("6".parse::<SpeedLevel>().unwrap().value(), 6);
        assert!(matches!(
            "turbo".parse::<SpeedLevel>(),
            Err(ValidationError::UnknownSpeedLevel(_))
        ));
        assert!(matches!(
            "12".parse::<SpeedLevel>(),
            Err(ValidationError::InvalidSpeedLevel(12))
        ));
    }

    #[test]
    fn test_checked_raise_saturates_at_full() {
        let six = SpeedLevel::new(6).unwrap();
        assert_eq!(six.checked_raise(2), Some(SpeedLevel::FULL));
        assert_eq!(six.checked_raise(3), None);
        assert_eq!(SpeedLevel::FULL.checked_raise(255), None);
    }

    #[test]
    fn test_fan_status_parse() {
        let content = "status:\t\tenabled\nspeed:\t\t2650\nlevel:\t\tauto\ncommands:\tlevel <level>\n";
        let status = FanStatus::parse(content);
        assert_eq!(status.enabled, Some(true));
        assert_eq!(status.rpm, Some(2650));
        assert_eq!(status.level.as_deref(), Some("auto"));
    }

    #[test]
    fn test_fan_status_parse_partial() {
        let status = FanStatus::parse("level:\t\t3\n");
        assert_eq!(status.enabled, None);
        assert_eq!(status.rpm, None);
        assert_eq!(status.level.as_deref(), Some("3"));
    }
}
