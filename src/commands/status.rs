//! Status command implementation

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, StatusReport};
use crate::config::Config;
use crate::device::{AcpiFan, FanActuator, TemperatureSensor};
use crate::error::Result;

/// Show the CPU temperature and the fan state reported by the driver
pub fn run_status(config: &Config, format: OutputFormat) -> Result<()> {
    let mut sensor = super::open_sensor(config);
    let temperature = sensor.read_temperature()?;

    // reading is harmless, so dry runs still show the real fan
    let fan = AcpiFan::new(&config.device.fan_path).fan_status()?;

    print_output(&StatusReport { temperature, fan }, format)?;
    Ok(())
}
