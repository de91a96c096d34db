//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::domain::{
    ConfigurationWarning, CurvePoint, FanStatus, Profile, ScanInterval, Temperature,
};
use crate::engine::{ExitPolicy, TickReport};
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            // one object per line so a running loop stays parseable
            let json = serde_json::to_string(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// Temperature and fan state
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub temperature: Temperature,
    pub fan: FanStatus,
}

impl TableDisplay for StatusReport {
    fn to_table(&self) -> String {
        let mut output = format!("CPU Temperature: {}\n", self.temperature);

        match self.fan.enabled {
            Some(true) => output.push_str("Fan: enabled\n"),
            Some(false) => output.push_str("Fan: disabled\n"),
            None => output.push_str("Fan: unknown\n"),
        }
        if let Some(rpm) = self.fan.rpm {
            output.push_str(&format!("  Speed: {} RPM\n", rpm));
        }
        if let Some(level) = &self.fan.level {
            output.push_str(&format!("  Level: {}\n", level));
        }

        output
    }

    fn to_compact(&self) -> String {
        format!(
            "{} {} {}",
            self.temperature,
            self.fan.level.as_deref().unwrap_or("?"),
            self.fan
                .rpm
                .map(|r| format!("{}rpm", r))
                .unwrap_or_default()
        )
        .trim_end()
        .to_string()
    }
}

impl TableDisplay for TickReport {
    fn to_table(&self) -> String {
        self.to_string()
    }

    fn to_compact(&self) -> String {
        format!("{} {}", self.temperature, self.speed)
    }
}

/// Resolved configuration as shown by `check`
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub profile: Profile,
    pub on_exit: ExitPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ConfigurationWarning>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub curve: Vec<CurvePoint>,
}

impl ProfileSummary {
    fn interval(&self) -> ScanInterval {
        self.profile.scan_interval()
    }
}

impl TableDisplay for ProfileSummary {
    fn to_table(&self) -> String {
        let mut output = format!("Profile: {}\n", self.profile);
        output.push_str(&format!("  Scan interval: {}\n", self.interval()));
        output.push_str(&format!("  On exit: {}\n", self.on_exit));

        if !self.curve.is_empty() {
            output.push_str("\n  Temp     Level\n");
            output.push_str("  ──────────────────\n");
            for point in &self.curve {
                output.push_str(&format!(
                    "  {:<8} {}\n",
                    point.temperature.to_string(),
                    point.speed
                ));
            }
        }

        if let Some(warning) = &self.warning {
            output.push_str(&format!("\n  Warning: {}\n", warning));
        }

        output
    }

    fn to_compact(&self) -> String {
        match &self.warning {
            Some(w) => format!("{} (warning: {})", self.profile, w),
            None => self.profile.to_string(),
        }
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        if self.success {
            format!("✓ {}", self.message)
        } else {
            format!("✗ {}", self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{validate_manual, SpeedLevel};

    #[test]
    fn test_status_report_table() {
        let report = StatusReport {
            temperature: Temperature::new(48),
            fan: FanStatus {
                enabled: Some(true),
                rpm: Some(2650),
                level: Some("auto".to_string()),
            },
        };

        let output = report.to_table();
        assert!(output.contains("48°C"));
        assert!(output.contains("2650 RPM"));
        assert_eq!(report.to_compact(), "48°C auto 2650rpm");
    }

    #[test]
    fn test_profile_summary_without_curve() {
        let summary = ProfileSummary {
            profile: Profile::Manual(validate_manual(
                SpeedLevel::new(3).unwrap(),
                ScanInterval::from_secs(5).unwrap(),
            )),
            on_exit: ExitPolicy::Ask,
            warning: None,
            curve: Vec::new(),
        };

        let output = summary.to_table();
        assert!(output.contains("manual"));
        assert!(!output.contains("Temp"));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["profile"]["mode"], "manual");
        assert!(json.get("curve").is_none());
    }

    #[test]
    fn test_message_display() {
        let msg = Message {
            message: "Fan level set to 3".to_string(),
            success: true,
        };

        assert!(msg.to_table().starts_with('✓'));
    }
}
