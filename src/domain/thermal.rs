//! Thermal domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperature in whole degrees Celsius
///
/// Readings are not assumed to be monotonic or bounded; sensors can be
/// noisy and repeat the same value indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Temperature(i32);

impl Temperature {
    /// Create a new Temperature
    pub const fn new(celsius: i32) -> Self {
        Self(celsius)
    }

    /// Get the temperature in Celsius
    #[inline]
    pub const fn as_celsius(&self) -> i32 {
        self.0
    }

    /// This temperature shifted by `delta` degrees, saturating at the i32 bounds
    pub const fn offset(&self, delta: i32) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°C", self.0)
    }
}

impl From<i32> for Temperature {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<Temperature> for i32 {
    fn from(temp: Temperature) -> Self {
        temp.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_display() {
        let temp = Temperature::new(65);
        assert_eq!(temp.to_string(), "65°C");
    }

    #[test]
    fn test_temperature_comparisons() {
        let t1 = Temperature::new(50);
        let t2 = Temperature::new(75);
        assert!(t1 < t2);
        assert_eq!(Temperature::from(50), t1);
    }

    #[test]
    fn test_temperature_offset() {
        assert_eq!(Temperature::new(40).offset(10).as_celsius(), 50);
        assert_eq!(Temperature::new(40).offset(-45).as_celsius(), -5);
        assert_eq!(Temperature::new(i32::MAX).offset(1).as_celsius(), i32::MAX);
    }
}
