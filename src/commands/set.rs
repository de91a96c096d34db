//! Set command implementation
//!
//! One-shot write of a fan level without starting a control loop.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, Message};
use crate::config::Config;
use crate::domain::SpeedLevel;
use crate::error::Result;

/// Write `level` once and exit
pub fn run_set(level: SpeedLevel, config: &Config, format: OutputFormat) -> Result<()> {
    let mut actuator = super::open_actuator(config);
    actuator.write_speed(level)?;
    log::info!("Fan speed set to {}", level);

    let message = if config.general.dry_run {
        format!("[DRY RUN] Would set fan level to {}", level)
    } else if level.is_auto() {
        "Fan returned to firmware control".to_string()
    } else {
        format!("Fan level set to {}", level)
    };

    print_output(
        &Message {
            message,
            success: true,
        },
        format,
    )?;
    Ok(())
}
