//! Check command implementation
//!
//! Validates the merged configuration and shows what `run` would start.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, ProfileSummary};
use crate::config::Config;
use crate::domain::curve::{breakpoints, check_curve};
use crate::domain::Profile;
use crate::error::Result;

/// Validate the configuration and print the resolved profile
pub fn run_check(config: &Config, format: OutputFormat) -> Result<()> {
    print_output(&summarize(config)?, format)?;
    Ok(())
}

fn summarize(config: &Config) -> Result<ProfileSummary> {
    let profile = config.profile()?;

    let (warning, curve) = match &profile {
        Profile::Curve(c) => (check_curve(c), breakpoints(c)),
        _ => (None, Vec::new()),
    };

    Ok(ProfileSummary {
        profile,
        on_exit: config.general.on_exit,
        warning,
        curve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControlMode;
    use crate::error::{AppError, ConfigError};

    #[test]
    fn test_summarize_default_auto() {
        let summary = summarize(&Config::default()).unwrap();
        assert!(matches!(summary.profile, Profile::Auto(_)));
        assert!(summary.curve.is_empty());
        assert!(summary.warning.is_none());
    }

    #[test]
    fn test_summarize_curve_has_preview() {
        let mut config = Config::default();
        config.control.mode = ControlMode::Curve;

        let summary = summarize(&config).unwrap();
        let first = summary.curve.first().unwrap();
        let last = summary.curve.last().unwrap();
        assert_eq!(first.temperature.as_celsius(), 45);
        assert_eq!(last.temperature.as_celsius(), 80);
        assert_eq!(last.speed.value(), 7);
    }

    #[test]
    fn test_summarize_curve_overflow_warns() {
        let mut config = Config::default();
        config.control.mode = ControlMode::Curve;
        config.curve.step = 3;

        let summary = summarize(&config).unwrap();
        assert!(summary.warning.is_some());
    }

    #[test]
    fn test_summarize_rejects_invalid_config() {
        let mut config = Config::default();
        config.auto.critical_temp = 40;

        assert!(matches!(
            summarize(&config),
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));
    }
}
