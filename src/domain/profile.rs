//! Control profiles and their validation
//!
//! Each control mode has its own profile type. Profiles are only built by
//! the `validate_*` functions, so a value of one of these types always
//! satisfies its invariants. Validation is pure: a rejected profile never
//! touches the one already running.

use crate::domain::{SpeedLevel, Temperature};
use crate::error::ValidationError;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Seconds between two control ticks (at least one)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ScanInterval(u32);

impl ScanInterval {
    /// Create a new ScanInterval
    ///
    /// # Errors
    /// Returns `ValidationError::ZeroScanInterval` for zero seconds
    pub fn from_secs(secs: u32) -> Result<Self, ValidationError> {
        if secs == 0 {
            return Err(ValidationError::ZeroScanInterval);
        }
        Ok(Self(secs))
    }

    /// Interval in seconds
    #[inline]
    pub const fn as_secs(&self) -> u32 {
        self.0
    }

    /// Interval as a Duration
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.0))
    }
}

impl fmt::Display for ScanInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Threshold profile: firmware control below `crit_temp`, a fixed level above it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AutoProfile {
    safe_temp: Temperature,
    crit_temp: Temperature,
    critical_speed: SpeedLevel,
    scan_interval: ScanInterval,
}

impl AutoProfile {
    pub fn safe_temp(&self) -> Temperature {
        self.safe_temp
    }

    pub fn crit_temp(&self) -> Temperature {
        self.crit_temp
    }

    /// Level applied once `crit_temp` is reached
    pub fn critical_speed(&self) -> SpeedLevel {
        self.critical_speed
    }

    pub fn scan_interval(&self) -> ScanInterval {
        self.scan_interval
    }
}

impl fmt::Display for AutoProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Safe: {}, Critical: {}, Scan interval: {}, Fan speed when critical: {}",
            self.safe_temp, self.crit_temp, self.scan_interval, self.critical_speed
        )
    }
}

/// Fixed-level profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManualProfile {
    fixed_speed: SpeedLevel,
    scan_interval: ScanInterval,
}

impl ManualProfile {
    pub fn fixed_speed(&self) -> SpeedLevel {
        self.fixed_speed
    }

    pub fn scan_interval(&self) -> ScanInterval {
        self.scan_interval
    }
}

impl fmt::Display for ManualProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fan level: {}, Scan interval: {}",
            self.fixed_speed, self.scan_interval
        )
    }
}

/// Stepped fan curve
///
/// At `safe_temp` the fan runs at `safe_speed`; every `delta_temp` degrees
/// above it adds `step` levels, and from `crit_temp` on the fan runs at
/// `crit_speed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FanCurve {
    safe_temp: Temperature,
    crit_temp: Temperature,
    delta_temp: i32,
    step: u8,
    safe_speed: SpeedLevel,
    crit_speed: SpeedLevel,
    scan_interval: ScanInterval,
}

impl FanCurve {
    pub fn safe_temp(&self) -> Temperature {
        self.safe_temp
    }

    pub fn crit_temp(&self) -> Temperature {
        self.crit_temp
    }

    /// Degrees per step (always > 0)
    pub fn delta_temp(&self) -> i32 {
        self.delta_temp
    }

    /// Levels per step (always >= 1)
    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn safe_speed(&self) -> SpeedLevel {
        self.safe_speed
    }

    pub fn crit_speed(&self) -> SpeedLevel {
        self.crit_speed
    }

    pub fn scan_interval(&self) -> ScanInterval {
        self.scan_interval
    }
}

impl fmt::Display for FanCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}, +{} every {}°C, {} from {}, Scan interval: {}",
            self.safe_speed,
            self.safe_temp,
            self.step,
            self.delta_temp,
            self.crit_speed,
            self.crit_temp,
            self.scan_interval
        )
    }
}

/// Any validated profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Profile {
    Auto(AutoProfile),
    Manual(ManualProfile),
    Curve(FanCurve),
}

impl Profile {
    pub fn scan_interval(&self) -> ScanInterval {
        match self {
            Profile::Auto(p) => p.scan_interval(),
            Profile::Manual(p) => p.scan_interval(),
            Profile::Curve(c) => c.scan_interval(),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Auto(p) => write!(f, "auto ({})", p),
            Profile::Manual(p) => write!(f, "manual ({})", p),
            Profile::Curve(c) => write!(f, "curve ({})", c),
        }
    }
}

/// Validate an auto (threshold) profile
///
/// # Errors
/// Returns `ValidationError::SafeNotBelowCritical` iff `safe >= crit`
pub fn validate_auto(
    safe: Temperature,
    crit: Temperature,
    critical_speed: SpeedLevel,
    scan_interval: ScanInterval,
) -> Result<AutoProfile, ValidationError> {
    ensure_safe_below_critical(safe, crit)?;

    Ok(AutoProfile {
        safe_temp: safe,
        crit_temp: crit,
        critical_speed,
        scan_interval,
    })
}

/// Build a manual profile; any valid level is accepted
pub fn validate_manual(fixed_speed: SpeedLevel, scan_interval: ScanInterval) -> ManualProfile {
    ManualProfile {
        fixed_speed,
        scan_interval,
    }
}

/// Validate a fan curve
///
/// # Errors
/// - `SafeNotBelowCritical` if `safe >= crit`
/// - `NonPositiveDelta` if `delta <= 0`
/// - `DeltaReachesCritical` if `safe + delta >= crit`
/// - `ZeroStep` if `step == 0`
#[allow(clippy::too_many_arguments)]
pub fn validate_curve(
    safe: Temperature,
    crit: Temperature,
    delta: i32,
    step: u8,
    safe_speed: SpeedLevel,
    crit_speed: SpeedLevel,
    scan_interval: ScanInterval,
) -> Result<FanCurve, ValidationError> {
    ensure_safe_below_critical(safe, crit)?;

    if delta <= 0 {
        return Err(ValidationError::NonPositiveDelta(delta));
    }

    if safe.offset(delta) >= crit {
        return Err(ValidationError::DeltaReachesCritical {
            safe: safe.as_celsius(),
            delta,
            critical: crit.as_celsius(),
        });
    }

    if step == 0 {
        return Err(ValidationError::ZeroStep);
    }

    Ok(FanCurve {
        safe_temp: safe,
        crit_temp: crit,
        delta_temp: delta,
        step,
        safe_speed,
        crit_speed,
        scan_interval,
    })
}

fn ensure_safe_below_critical(safe: Temperature, crit: Temperature) -> Result<(), ValidationError> {
    if safe >= crit {
        return Err(ValidationError::SafeNotBelowCritical {
            safe: safe.as_celsius(),
            critical: crit.as_celsius(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u32) -> ScanInterval {
        ScanInterval::from_secs(n).unwrap()
    }

    fn level(n: u8) -> SpeedLevel {
        SpeedLevel::new(n).unwrap()
    }

    #[test]
    fn test_scan_interval() {
        assert_eq!(
            ScanInterval::from_secs(0),
            Err(ValidationError::ZeroScanInterval)
        );
        assert_eq!(secs(30).as_duration(), Duration::from_secs(30));
        assert_eq!(secs(5).to_string(), "5s");
    }

    #[test]
    fn test_validate_auto_accepts_safe_below_critical() {
        for (safe, crit) in [(40, 70), (-10, 0), (69, 70), (0, 100)] {
            let profile = validate_auto(
                Temperature::new(safe),
                Temperature::new(crit),
                SpeedLevel::FULL,
                secs(5),
            )
            .unwrap();
            assert_eq!(profile.safe_temp().as_celsius(), safe);
            assert_eq!(profile.crit_temp().as_celsius(), crit);
        }
    }

    #[test]
    fn test_validate_auto_rejects_safe_at_or_above_critical() {
        for (safe, crit) in [(70, 70), (71, 70), (100, -5)] {
            let result = validate_auto(
                Temperature::new(safe),
                Temperature::new(crit),
                SpeedLevel::FULL,
                secs(5),
            );
            assert_eq!(
                result,
                Err(ValidationError::SafeNotBelowCritical {
                    safe,
                    critical: crit
                })
            );
        }
    }

    #[test]
    fn test_validate_manual_keeps_values() {
        let profile = validate_manual(level(3), secs(10));
        assert_eq!(profile.fixed_speed(), level(3));
        assert_eq!(profile.scan_interval(), secs(10));
    }

    #[test]
    fn test_validate_curve_valid() {
        let curve = validate_curve(
            Temperature::new(40),
            Temperature::new(80),
            10,
            1,
            level(1),
            level(7),
            secs(5),
        )
        .unwrap();
        assert_eq!(curve.delta_temp(), 10);
        assert_eq!(curve.step(), 1);
        assert_eq!(curve.crit_speed(), level(7));
    }

    #[test]
    fn test_validate_curve_rejects_safe_not_below_critical() {
        let result = validate_curve(
            Temperature::new(80),
            Temperature::new(80),
            5,
            1,
            level(1),
            level(7),
            secs(5),
        );
        assert!(matches!(
            result,
            Err(ValidationError::SafeNotBelowCritical { .. })
        ));
    }

    #[test]
    fn test_validate_curve_rejects_delta_reaching_critical() {
        let result = validate_curve(
            Temperature::new(40),
            Temperature::new(80),
            40,
            1,
            level(1),
            level(7),
            secs(5),
        );
        assert_eq!(
            result,
            Err(ValidationError::DeltaReachesCritical {
                safe: 40,
                delta: 40,
                critical: 80
            })
        );

        // one degree below is fine
        assert!(validate_curve(
            Temperature::new(40),
            Temperature::new(80),
            39,
            1,
            level(1),
            level(7),
            secs(5),
        )
        .is_ok());
    }

    #[test]
    fn test_validate_curve_rejects_bad_delta_and_step() {
        let base = |delta, step| {
            validate_curve(
                Temperature::new(40),
                Temperature::new(80),
                delta,
                step,
                level(1),
                level(7),
                secs(5),
            )
        };
        assert_eq!(base(0, 1), Err(ValidationError::NonPositiveDelta(0)));
        assert_eq!(base(-5, 1), Err(ValidationError::NonPositiveDelta(-5)));
        assert_eq!(base(10, 0), Err(ValidationError::ZeroStep));
    }

    #[test]
    fn test_profile_display() {
        let profile = validate_auto(
            Temperature::new(50),
            Temperature::new(70),
            SpeedLevel::FULL,
            secs(5),
        )
        .unwrap();
        assert_eq!(
            profile.to_string(),
            "Safe: 50°C, Critical: 70°C, Scan interval: 5s, Fan speed when critical: Full-Speed"
        );
    }
}
