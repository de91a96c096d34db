//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod check;
pub mod control;
pub mod set;
pub mod status;

pub use check::run_check;
pub use control::{run_auto, run_curve, run_from_config, run_manual};
pub use set::run_set;
pub use status::run_status;

use crate::config::Config;
use crate::device::{AcpiFan, AcpiThermal, DryRunFan, FanActuator};

/// Sensor for the configured thermal file
pub(crate) fn open_sensor(config: &Config) -> AcpiThermal {
    AcpiThermal::new(&config.device.thermal_path)
}

/// Actuator for the configured fan file, or a logging stand-in for dry runs
pub(crate) fn open_actuator(config: &Config) -> Box<dyn FanActuator> {
    if config.general.dry_run {
        Box::new(DryRunFan::new())
    } else {
        Box::new(AcpiFan::new(&config.device.fan_path))
    }
}
