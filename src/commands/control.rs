//! Control command implementation
//!
//! Runs the control loop for one of the three modes until the operator
//! stops it.

use crate::cli::args::OutputFormat;
use crate::cli::output::print_output;
use crate::config::Config;
use crate::domain::{Profile, SpeedLevel};
use crate::engine::{ApplyOutcome, ControlEngine, ExitChoice};
use crate::error::Result;
use crate::services::{Daemon, DaemonConfig};

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Run threshold control with the `[auto]` settings
pub fn run_auto(config: &Config, format: OutputFormat) -> Result<()> {
    let profile = config.auto.to_profile()?;
    run_control(Profile::Auto(profile), config, format)
}

/// Hold the `[manual]` fan level
pub fn run_manual(config: &Config, format: OutputFormat) -> Result<()> {
    let profile = config.manual.to_profile()?;
    run_control(Profile::Manual(profile), config, format)
}

/// Follow the `[curve]` fan curve
pub fn run_curve(config: &Config, format: OutputFormat) -> Result<()> {
    let curve = config.curve.to_profile()?;
    run_control(Profile::Curve(curve), config, format)
}

/// Start the mode selected by `[control] mode`
pub fn run_from_config(config: &Config, format: OutputFormat) -> Result<()> {
    run_control(config.profile()?, config, format)
}

fn run_control(profile: Profile, config: &Config, format: OutputFormat) -> Result<()> {
    log::info!("Starting control loop");
    log::info!("  Profile: {}", profile);
    log::info!("  Dry run: {}", config.general.dry_run);
    log::info!("  On exit: {}", config.general.on_exit);

    let sensor = super::open_sensor(config);
    let mut engine = ControlEngine::new(sensor, super::open_actuator(config));

    if let ApplyOutcome::Started(report) = engine.apply(profile)? {
        print_output(&report, format)?;
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        flag.store(true, Ordering::SeqCst);
    }) {
        log::warn!(
            "Failed to set signal handler: {}. The fan will not be restored on Ctrl+C.",
            e
        );
    }

    let mut daemon = Daemon::new(
        engine,
        DaemonConfig {
            on_exit: config.general.on_exit,
            ..Default::default()
        },
    );

    daemon.run(
        &shutdown,
        |report| {
            if let Err(e) = print_output(report, format) {
                log::warn!("Failed to print status: {}", e);
            }
        },
        |speed| {
            let stdin = io::stdin();
            prompt_exit(speed, &mut stdin.lock(), &mut io::stderr())
        },
    )
}

/// Ask whether to hand the fan back to the firmware before exiting
///
/// `y` restores auto, `n` exits at the current level, `c` keeps running.
/// Anything else asks again; end of input restores auto.
pub fn prompt_exit<R: BufRead, W: Write>(
    speed: SpeedLevel,
    input: &mut R,
    out: &mut W,
) -> ExitChoice {
    loop {
        let _ = write!(
            out,
            "Current fan speed: {} ({}). Restore automatic fan control? [y]es / [n]o / [c]ontinue: ",
            speed,
            speed.value()
        );
        let _ = out.flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return ExitChoice::RestoreAuto,
            Ok(_) => {}
        }

        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return ExitChoice::RestoreAuto,
            "n" | "no" => return ExitChoice::Keep,
            "c" | "continue" => return ExitChoice::Defer,
            _ => {}
        }
    }
}
