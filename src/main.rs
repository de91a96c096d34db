//! tpfanctl - ThinkPad fan control tool
//!
//! A command-line tool that drives the ThinkPad fan from the CPU
//! temperature through thinkpad_acpi.

use clap::Parser;
use tpfanctl::cli::args::{generate_completions, Cli, Commands};
use tpfanctl::commands::{
    run_auto, run_check, run_curve, run_from_config, run_manual, run_set, run_status,
};
use tpfanctl::config::{
    AutoOverrides, Config, ConfigBuilder, ControlMode, CurveOverrides, ManualOverrides,
};
use tpfanctl::error::{ActuatorError, AppError, EngineError, SensorError};

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    if let Commands::Completions { shell } = &cli.command {
        generate_completions(*shell);
        return Ok(());
    }

    let config = build_config(cli)?;
    if config.general.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    match &cli.command {
        Commands::Status => run_status(&config, cli.format),

        Commands::Set { level } => run_set(*level, &config, cli.format),

        Commands::Auto(_) => run_auto(&config, cli.format),

        Commands::Manual(_) => run_manual(&config, cli.format),

        Commands::Curve(_) => run_curve(&config, cli.format),

        Commands::Run => run_from_config(&config, cli.format),

        Commands::Check => run_check(&config, cli.format),

        Commands::Completions { .. } => Ok(()),
    }
}

/// Merge the config file with the global and per-mode CLI options
fn build_config(cli: &Cli) -> Result<Config, AppError> {
    let mut builder = ConfigBuilder::new()
        .with_file(cli.config.as_deref())?
        .with_verbose(cli.verbose.then_some(true))
        .with_dry_run(cli.dry_run.then_some(true))
        .with_on_exit(cli.on_exit.map(Into::into))
        .with_thermal_path(cli.thermal_path.clone())
        .with_fan_path(cli.fan_path.clone());

    builder = match &cli.command {
        Commands::Auto(args) => builder
            .with_mode(Some(ControlMode::Auto))
            .with_auto(AutoOverrides::from(args)),
        Commands::Manual(args) => builder
            .with_mode(Some(ControlMode::Manual))
            .with_manual(ManualOverrides::from(args)),
        Commands::Curve(args) => builder
            .with_mode(Some(ControlMode::Curve))
            .with_curve(CurveOverrides::from(args)),
        _ => builder,
    };

    Ok(builder.build())
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Sensor(SensorError::Unavailable { .. })
        | AppError::Engine(EngineError::Sensor(_)) => {
            eprintln!();
            eprintln!("Hint: Is the kernel running with thinkpad_acpi?");
            eprintln!("      Check that /proc/acpi/ibm/thermal exists.");
        }
        AppError::Actuator(ActuatorError::WriteFailed { .. })
        | AppError::Engine(EngineError::Restore(_)) => {
            eprintln!();
            eprintln!("Hint: Load thinkpad_acpi with fan_control=1 and run as root:");
            eprintln!("      modprobe -r thinkpad_acpi && modprobe thinkpad_acpi fan_control=1");
        }
        _ => {}
    }
}
