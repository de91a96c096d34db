//! Trait definitions for sensor and actuator access
//!
//! These traits abstract over the ACPI files so the control engine can be
//! driven by fakes in tests.

use crate::domain::{FanStatus, SpeedLevel, Temperature};
use crate::error::{ActuatorError, SensorError};

/// Source of CPU temperature readings
pub trait TemperatureSensor {
    /// Read the current temperature
    ///
    /// May block on file I/O. An error means the device or driver is not
    /// available.
    fn read_temperature(&mut self) -> Result<Temperature, SensorError>;
}

/// Fan level actuator
pub trait FanActuator {
    /// Request that the hardware run the fan at `level`
    ///
    /// Level 0 hands control back to the firmware, 8 is full speed.
    fn write_speed(&mut self, level: SpeedLevel) -> Result<(), ActuatorError>;

    /// Read back the fan state, if the actuator can report it
    fn fan_status(&self) -> Result<FanStatus, ActuatorError> {
        Ok(FanStatus::default())
    }
}

impl<S: TemperatureSensor + ?Sized> TemperatureSensor for Box<S> {
    fn read_temperature(&mut self) -> Result<Temperature, SensorError> {
        (**self).read_temperature()
    }
}

impl<A: FanActuator + ?Sized> FanActuator for Box<A> {
    fn write_speed(&mut self, level: SpeedLevel) -> Result<(), ActuatorError> {
        (**self).write_speed(level)
    }

    fn fan_status(&self) -> Result<FanStatus, ActuatorError> {
        (**self).fan_status()
    }
}
