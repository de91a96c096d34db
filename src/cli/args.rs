//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use crate::config::{AutoOverrides, CurveOverrides, ManualOverrides};
use crate::domain::SpeedLevel;
use crate::engine::ExitPolicy;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// ThinkPad fan control tool
///
/// Drive the ThinkPad fan from the CPU temperature through thinkpad_acpi.
#[derive(Parser, Debug)]
#[command(name = "tpfanctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TPFANCTL_CONFIG")]
    pub config: Option<String>,

    /// Dry run mode - don't actually write fan levels
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Thermal file to read the CPU temperature from
    #[arg(long, global = true, value_name = "PATH")]
    pub thermal_path: Option<String>,

    /// Fan file to write levels to
    #[arg(long, global = true, value_name = "PATH")]
    pub fan_path: Option<String>,

    /// What to do with a non-auto fan level on exit
    #[arg(long, global = true, value_enum)]
    pub on_exit: Option<ExitPolicyArg>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show CPU temperature and fan status
    Status,

    /// Write a fan level once and exit
    Set {
        /// Level: 0-7, auto or full
        level: SpeedLevel,
    },

    /// Firmware control below the critical temperature, a fixed level above
    Auto(AutoArgs),

    /// Hold a fixed fan level
    Manual(ManualArgs),

    /// Follow a stepped fan curve
    Curve(CurveArgs),

    /// Start the mode selected in the configuration file
    Run,

    /// Validate the configuration and show the resolved profile
    Check,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for auto mode
#[derive(Parser, Debug, Default)]
pub struct AutoArgs {
    /// Safe temperature in Celsius
    #[arg(long, allow_negative_numbers = true)]
    pub safe: Option<i32>,

    /// Critical temperature in Celsius
    #[arg(long, allow_negative_numbers = true)]
    pub critical: Option<i32>,

    /// Fan level applied at the critical temperature
    #[arg(long)]
    pub speed: Option<SpeedLevel>,

    /// Seconds between checks
    #[arg(short, long)]
    pub interval: Option<u32>,
}

impl From<&AutoArgs> for AutoOverrides {
    fn from(args: &AutoArgs) -> Self {
        Self {
            safe_temp: args.safe,
            critical_temp: args.critical,
            critical_speed: args.speed,
            interval_seconds: args.interval,
        }
    }
}

/// Arguments for manual mode
#[derive(Parser, Debug, Default)]
pub struct ManualArgs {
    /// Level to hold: 0-7, auto or full
    pub level: Option<SpeedLevel>,

    /// Seconds between checks
    #[arg(short, long)]
    pub interval: Option<u32>,
}

impl From<&ManualArgs> for ManualOverrides {
    fn from(args: &ManualArgs) -> Self {
        Self {
            speed: args.level,
            interval_seconds: args.interval,
        }
    }
}

/// Arguments for curve mode
#[derive(Parser, Debug, Default)]
pub struct CurveArgs {
    /// Temperature at which the curve starts
    #[arg(long, allow_negative_numbers = true)]
    pub safe: Option<i32>,

    /// Temperature from which the critical level applies
    #[arg(long, allow_negative_numbers = true)]
    pub critical: Option<i32>,

    /// Degrees per step
    #[arg(long, allow_negative_numbers = true)]
    pub delta: Option<i32>,

    /// Levels added per step
    #[arg(long)]
    pub step: Option<u8>,

    /// Level at or below the safe temperature
    #[arg(long)]
    pub safe_speed: Option<SpeedLevel>,

    /// Level at or above the critical temperature
    #[arg(long)]
    pub critical_speed: Option<SpeedLevel>,

    /// Seconds between checks
    #[arg(short, long)]
    pub interval: Option<u32>,
}

impl From<&CurveArgs> for CurveOverrides {
    fn from(args: &CurveArgs) -> Self {
        Self {
            safe_temp: args.safe,
            critical_temp: args.critical,
            delta_temp: args.delta,
            step: args.step,
            safe_speed: args.safe_speed,
            critical_speed: args.critical_speed,
            interval_seconds: args.interval,
        }
    }
}

/// Exit policy argument
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ExitPolicyArg {
    /// Ask before exiting with the fan off auto
    Ask,
    /// Hand the fan back to the firmware
    Restore,
    /// Leave the fan at its level
    Keep,
}

impl From<ExitPolicyArg> for ExitPolicy {
    fn from(arg: ExitPolicyArg) -> Self {
        match arg {
            ExitPolicyArg::Ask => ExitPolicy::Ask,
            ExitPolicyArg::Restore => ExitPolicy::Restore,
            ExitPolicyArg::Keep => ExitPolicy::Keep,
        }
    }
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
