//! Domain models for tpfanctl
//!
//! This module contains all domain types with validation.
//! Types are validated on construction (fail-fast pattern).

pub mod curve;
pub mod fan;
pub mod profile;
pub mod thermal;

pub use curve::{ConfigurationWarning, CurvePoint, CurveSolution};
pub use fan::{FanStatus, SpeedLevel};
pub use profile::{
    validate_auto, validate_curve, validate_manual, AutoProfile, FanCurve, ManualProfile, Profile,
    ScanInterval,
};
pub use thermal::Temperature;
