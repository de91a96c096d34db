//! Mock implementations for testing
//!
//! Provides a scripted temperature sensor and a recording fan actuator for
//! unit testing without ThinkPad hardware.

use crate::device::{FanActuator, TemperatureSensor};
use crate::domain::{FanStatus, SpeedLevel, Temperature};
use crate::error::{ActuatorError, SensorError};

use std::collections::VecDeque;

/// Sensor returning queued readings
///
/// Once the queue is empty the last successful reading repeats.
#[derive(Debug, Default)]
pub struct ScriptedSensor {
    queue: VecDeque<Result<Temperature, SensorError>>,
    last: Option<Temperature>,
    reads: usize,
}

impl ScriptedSensor {
    /// Sensor that will return `readings` in order
    pub fn new(readings: impl IntoIterator<Item = i32>) -> Self {
        Self {
            queue: readings
                .into_iter()
                .map(|c| Ok(Temperature::new(c)))
                .collect(),
            last: None,
            reads: 0,
        }
    }

    /// Queue another reading
    pub fn push(&mut self, celsius: i32) {
        self.queue.push_back(Ok(Temperature::new(celsius)));
    }

    /// Queue a failed read
    pub fn push_failure(&mut self) {
        self.queue.push_back(Err(SensorError::Unavailable {
            path: "mock".to_string(),
            reason: "sensor removed".to_string(),
        }));
    }

    /// Number of reads so far
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl TemperatureSensor for ScriptedSensor {
    fn read_temperature(&mut self) -> Result<Temperature, SensorError> {
        self.reads += 1;
        match self.queue.pop_front() {
            Some(Ok(temp)) => {
                self.last = Some(temp);
                Ok(temp)
            }
            Some(Err(e)) => Err(e),
            None => self.last.ok_or_else(|| SensorError::Unavailable {
                path: "mock".to_string(),
                reason: "no readings scripted".to_string(),
            }),
        }
    }
}

/// Actuator recording every successful write
#[derive(Debug, Default)]
pub struct RecordingFan {
    writes: Vec<SpeedLevel>,
    failures_left: usize,
    attempts: usize,
}

impl RecordingFan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` writes fail
    pub fn fail_next(&mut self, count: usize) {
        self.failures_left = count;
    }

    /// Successful writes, oldest first
    pub fn writes(&self) -> &[SpeedLevel] {
        &self.writes
    }

    /// Write attempts including failed ones
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl FanActuator for RecordingFan {
    fn write_speed(&mut self, level: SpeedLevel) -> Result<(), ActuatorError> {
        self.attempts += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(ActuatorError::WriteFailed {
                level: level.acpi_arg(),
                path: "mock".to_string(),
                reason: "permission denied".to_string(),
            });
        }
        self.writes.push(level);
        Ok(())
    }

    fn fan_status(&self) -> Result<FanStatus, ActuatorError> {
        Ok(FanStatus {
            enabled: Some(true),
            rpm: None,
            level: self.writes.last().map(|l| l.acpi_arg()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_sensor_repeats_last_reading() {
        let mut sensor = ScriptedSensor::new([40, 50]);
        assert_eq!(sensor.read_temperature().unwrap().as_celsius(), 40);
        assert_eq!(sensor.read_temperature().unwrap().as_celsius(), 50);
        assert_eq!(sensor.read_temperature().unwrap().as_celsius(), 50);
        assert_eq!(sensor.reads(), 3);
    }

    #[test]
    fn test_scripted_sensor_failure() {
        let mut sensor = ScriptedSensor::default();
        assert!(sensor.read_temperature().is_err());

        sensor.push(45);
        sensor.push_failure();
        assert!(sensor.read_temperature().is_ok());
        assert!(sensor.read_temperature().is_err());
    }

    #[test]
    fn test_recording_fan() {
        let mut fan = RecordingFan::new();
        fan.fail_next(1);
        assert!(fan.write_speed(SpeedLevel::FULL).is_err());
        fan.write_speed(SpeedLevel::AUTO).unwrap();

        assert_eq!(fan.writes(), &[SpeedLevel::AUTO]);
        assert_eq!(fan.attempts(), 2);
        assert_eq!(fan.fan_status().unwrap().level.as_deref(), Some("auto"));
    }
}
