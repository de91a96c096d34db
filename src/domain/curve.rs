//! Fan curve solver
//!
//! Maps a temperature onto a discrete level using a stepped [`FanCurve`].

use crate::domain::{FanCurve, SpeedLevel, Temperature};
use serde::Serialize;
use std::fmt;

/// Non-fatal problem with a curve's arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigurationWarning {
    /// The steps pass full speed before the critical temperature is reached
    ExceedsFullSpeed { at: Temperature },
}

impl fmt::Display for ConfigurationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationWarning::ExceedsFullSpeed { at } => write!(
                f,
                "curve hits full speed at {} before the critical temperature, check delta and step",
                at
            ),
        }
    }
}

/// Result of solving a curve for one temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurveSolution {
    pub speed: SpeedLevel,
    pub warning: Option<ConfigurationWarning>,
}

impl CurveSolution {
    fn exact(speed: SpeedLevel) -> Self {
        Self {
            speed,
            warning: None,
        }
    }
}

/// A (temperature, level) pair where the curve changes level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurvePoint {
    pub temperature: Temperature,
    pub speed: SpeedLevel,
}

/// Solve the curve for `temp`
///
/// - at or above `crit_temp`: `crit_speed`, regardless of the steps
/// - at or below `safe_temp`: `safe_speed`
/// - otherwise `safe_speed` plus `step` for every whole `delta_temp`
///   above `safe_temp`; if that passes full speed the result is clamped
///   to [`SpeedLevel::FULL`] and a warning is attached
pub fn solve(curve: &FanCurve, temp: Temperature) -> CurveSolution {
    if temp >= curve.crit_temp() {
        return CurveSolution::exact(curve.crit_speed());
    }
    if temp <= curve.safe_temp() {
        return CurveSolution::exact(curve.safe_speed());
    }

    // delta_temp > 0 and temp < crit_temp, so this terminates
    let mut bracket = curve.safe_temp();
    let mut speed = curve.safe_speed();
    loop {
        let next = bracket.offset(curve.delta_temp());
        if next > temp {
            return CurveSolution::exact(speed);
        }
        match speed.checked_raise(curve.step()) {
            Some(raised) => speed = raised,
            None => {
                return CurveSolution {
                    speed: SpeedLevel::FULL,
                    warning: Some(ConfigurationWarning::ExceedsFullSpeed { at: next }),
                }
            }
        }
        bracket = next;
    }
}

/// Target level for `temp`, dropping any configuration warning
pub fn speed_for_temperature(curve: &FanCurve, temp: Temperature) -> SpeedLevel {
    solve(curve, temp).speed
}

/// Warning for the curve as a whole, if its steps overflow before `crit_temp`
pub fn check_curve(curve: &FanCurve) -> Option<ConfigurationWarning> {
    solve(curve, curve.crit_temp().offset(-1)).warning
}

/// Every temperature at which the curve changes level, from `safe_temp` to `crit_temp`
pub fn breakpoints(curve: &FanCurve) -> Vec<CurvePoint> {
    let mut points = vec![CurvePoint {
        temperature: curve.safe_temp(),
        speed: curve.safe_speed(),
    }];

    let mut temp = curve.safe_temp().offset(curve.delta_temp());
    while temp < curve.crit_temp() {
        let solution = solve(curve, temp);
        points.push(CurvePoint {
            temperature: temp,
            speed: solution.speed,
        });
        if solution.warning.is_some() {
            break;
        }
        temp = temp.offset(curve.delta_temp());
    }

    points.push(CurvePoint {
        temperature: curve.crit_temp(),
        speed: curve.crit_speed(),
    });
    points
}
