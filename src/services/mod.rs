//! Service layer for fan control
//!
//! Services drive the control engine over time.

pub mod daemon;

pub use daemon::{Daemon, DaemonConfig};
