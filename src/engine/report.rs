//! Values returned by engine operations

use crate::domain::{ConfigurationWarning, SpeedLevel, Temperature};
use crate::error::ActuatorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which control mode the engine is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Stopped,
    Auto,
    Manual,
    Curve,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeKind::Stopped => write!(f, "Stopped"),
            ModeKind::Auto => write!(f, "Automatic control"),
            ModeKind::Manual => write!(f, "Manual control"),
            ModeKind::Curve => write!(f, "Curve control"),
        }
    }
}

/// Outcome of one control tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Sampled temperature
    pub temperature: Temperature,
    /// Mode that handled the tick
    pub mode: ModeKind,
    /// Level the fan is at after the tick
    pub speed: SpeedLevel,
    /// Whether the tick wrote a new level
    pub changed: bool,
    /// Human-readable status line
    pub status: String,
    /// Curve arithmetic problem, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ConfigurationWarning>,
    /// Failed write, if any; retried on the next tick
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "as_display")]
    pub write_error: Option<ActuatorError>,
}

fn as_display<S: serde::Serializer>(
    err: &Option<ActuatorError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match err {
        Some(e) => serializer.serialize_str(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - CPU Temp: {} - {}",
            self.mode, self.temperature, self.status
        )?;
        if let Some(warning) = &self.warning {
            write!(f, " (warning: {})", warning)?;
        }
        if let Some(err) = &self.write_error {
            write!(f, " (error: {})", err)?;
        }
        Ok(())
    }
}

/// What an `apply_*` call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Same profile already running; nothing touched
    Unchanged,
    /// Mode (re)started, with the report of its immediate tick
    Started(TickReport),
    /// New curve values adopted; picked up by the next scheduled tick
    Adopted,
    /// New curve values adopted and the schedule reinstalled at a new interval
    Rescheduled,
}

/// Operator answer to the exit prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitChoice {
    /// Hand the fan back to the firmware, then terminate
    RestoreAuto,
    /// Terminate, leaving the fan at its current level
    Keep,
    /// Do not exit; keep the current schedule running
    Defer,
}

/// Result of the exit sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Terminate,
    Resumed,
}

/// How the daemon answers the exit prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitPolicy {
    /// Ask the operator
    #[default]
    Ask,
    /// Always restore firmware control
    Restore,
    /// Always leave the fan as it is
    Keep,
}

impl fmt::Display for ExitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitPolicy::Ask => write!(f, "ask"),
            ExitPolicy::Restore => write!(f, "restore"),
            ExitPolicy::Keep => write!(f, "keep"),
        }
    }
}
