//! Dry-run actuator
//!
//! Logs the level it would have written and remembers it, so status
//! output stays meaningful without touching the hardware.

use crate::device::traits::FanActuator;
use crate::domain::{FanStatus, SpeedLevel};
use crate::error::ActuatorError;

/// Actuator that never writes
#[derive(Debug, Default)]
pub struct DryRunFan {
    last: Option<SpeedLevel>,
}

impl DryRunFan {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FanActuator for DryRunFan {
    fn write_speed(&mut self, level: SpeedLevel) -> Result<(), ActuatorError> {
        log::info!("[DRY RUN] Would set fan level to {}", level);
        self.last = Some(level);
        Ok(())
    }

    fn fan_status(&self) -> Result<FanStatus, ActuatorError> {
        Ok(FanStatus {
            enabled: None,
            rpm: None,
            level: self.last.map(|l| l.acpi_arg()),
        })
    }
}
