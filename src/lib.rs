//! tpfanctl - ThinkPad fan control library
//!
//! This library provides the control engine that maps CPU temperature to
//! a thinkpad_acpi fan level, in threshold, manual or stepped-curve mode.
//!
//! # Modules
//!
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`device`]: Sensor and actuator access
//! - [`domain`]: Domain models with validation
//! - [`engine`]: Control engine state machine
//! - [`error`]: Error types
//! - [`services`]: Control loop daemon

pub mod cli;
pub mod commands;
pub mod config;
pub mod device;
pub mod domain;
pub mod engine;
pub mod error;
pub mod services;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};
