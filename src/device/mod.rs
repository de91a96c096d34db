//! Device abstraction layer
//!
//! Provides trait-based abstractions over the temperature sensor and the
//! fan actuator for testability.

pub mod dry_run;
pub mod thinkpad;
pub mod traits;

pub use dry_run::DryRunFan;
pub use thinkpad::{AcpiFan, AcpiThermal};
pub use traits::{FanActuator, TemperatureSensor};
