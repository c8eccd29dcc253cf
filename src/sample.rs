// KrishiRakshak - Edge inference core
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Sensor samples and condition classes
//!
//! A [`SensorSample`] is one reading of the four field sensors. Every
//! feature has a physical range; generated samples are clipped into it
//! before they reach preprocessing.

use crate::error::KrishiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of input features per sample
pub const NUM_FEATURES: usize = 4;

/// Number of condition classes
pub const NUM_CLASSES: usize = 3;

/// Farm condition predicted by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionClass {
    /// Healthy crop
    Normal = 0,
    /// Dry soil, hot and dry air
    WaterStress = 1,
    /// Elevated insect acoustic activity
    PestRisk = 2,
}

impl ConditionClass {
    /// All classes in label order
    pub const ALL: [ConditionClass; NUM_CLASSES] = [
        ConditionClass::Normal,
        ConditionClass::WaterStress,
        ConditionClass::PestRisk,
    ];

    /// Integer label (0, 1, 2)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Class for an integer label
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Name used in dataset exports
    pub fn name(self) -> &'static str {
        match self {
            ConditionClass::Normal => "Normal",
            ConditionClass::WaterStress => "WaterStress",
            ConditionClass::PestRisk => "PestRisk",
        }
    }

    /// Name used in console output
    pub fn display_name(self) -> &'static str {
        match self {
            ConditionClass::Normal => "Normal",
            ConditionClass::WaterStress => "Water Stress",
            ConditionClass::PestRisk => "Pest Risk",
        }
    }

    /// True for [`ConditionClass::Normal`]
    pub fn is_normal(self) -> bool {
        self == ConditionClass::Normal
    }
}

impl TryFrom<u8> for ConditionClass {
    type Error = KrishiError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value as usize).ok_or(KrishiError::InvalidClass(value))
    }
}

impl From<ConditionClass> for u8 {
    fn from(class: ConditionClass) -> Self {
        class as u8
    }
}

impl fmt::Display for ConditionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Closed physical range of one feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRange {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl FeatureRange {
    /// Create a range
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Bound a value into the range
    pub fn clip(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Check whether a value lies in the range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Soil moisture, percent
pub const SOIL_MOISTURE_RANGE: FeatureRange = FeatureRange::new(0.0, 100.0);
/// Air temperature, °C
pub const TEMPERATURE_RANGE: FeatureRange = FeatureRange::new(10.0, 50.0);
/// Relative humidity, percent
pub const HUMIDITY_RANGE: FeatureRange = FeatureRange::new(0.0, 100.0);
/// Normalised acoustic energy
pub const AUDIO_ENERGY_RANGE: FeatureRange = FeatureRange::new(0.0, 1.0);

/// High temperature warning level, °C
pub const TEMPERATURE_HIGH_THRESHOLD: f64 = 40.0;
/// Low temperature warning level, °C
pub const TEMPERATURE_LOW_THRESHOLD: f64 = 5.0;
/// High humidity warning level, percent
pub const HUMIDITY_HIGH_THRESHOLD: f64 = 90.0;
/// Low humidity warning level, percent
pub const HUMIDITY_LOW_THRESHOLD: f64 = 20.0;
/// Low soil moisture warning level, percent
pub const SOIL_MOISTURE_LOW_THRESHOLD: f64 = 25.0;

/// One reading of the field sensors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Soil moisture (0-100 %)
    pub soil_moisture: f64,
    /// Air temperature (10-50 °C)
    pub temperature: f64,
    /// Relative humidity (0-100 %)
    pub humidity: f64,
    /// Acoustic energy (0-1)
    pub audio_energy: f64,
    /// Condition the sample was drawn from, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionClass>,
    /// Acquisition time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl SensorSample {
    /// Create an unlabeled sample
    pub fn new(soil_moisture: f64, temperature: f64, humidity: f64, audio_energy: f64) -> Self {
        Self {
            soil_moisture,
            temperature,
            humidity,
            audio_energy,
            condition: None,
            timestamp: None,
        }
    }

    /// Attach a condition label
    pub fn with_condition(mut self, condition: ConditionClass) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Attach a timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Copy with every feature bounded to its physical range
    pub fn clipped(&self) -> Self {
        Self {
            soil_moisture: SOIL_MOISTURE_RANGE.clip(self.soil_moisture),
            temperature: TEMPERATURE_RANGE.clip(self.temperature),
            humidity: HUMIDITY_RANGE.clip(self.humidity),
            audio_energy: AUDIO_ENERGY_RANGE.clip(self.audio_energy),
            ..*self
        }
    }

    /// Check that every feature lies in its physical range
    pub fn is_within_bounds(&self) -> bool {
        SOIL_MOISTURE_RANGE.contains(self.soil_moisture)
            && TEMPERATURE_RANGE.contains(self.temperature)
            && HUMIDITY_RANGE.contains(self.humidity)
            && AUDIO_ENERGY_RANGE.contains(self.audio_energy)
    }

    /// Raw feature values in model input order
    pub fn features(&self) -> [f64; NUM_FEATURES] {
        [
            self.soil_moisture,
            self.temperature,
            self.humidity,
            self.audio_energy,
        ]
    }

    /// Readings outside the agronomic warning levels
    pub fn threshold_warnings(&self) -> Vec<ThresholdWarning> {
        let mut warnings = Vec::new();

        if self.temperature > TEMPERATURE_HIGH_THRESHOLD {
            warnings.push(ThresholdWarning::HighTemperature(self.temperature));
        } else if self.temperature < TEMPERATURE_LOW_THRESHOLD {
            warnings.push(ThresholdWarning::LowTemperature(self.temperature));
        }

        if self.humidity > HUMIDITY_HIGH_THRESHOLD {
            warnings.push(ThresholdWarning::HighHumidity(self.humidity));
        } else if self.humidity < HUMIDITY_LOW_THRESHOLD {
            warnings.push(ThresholdWarning::LowHumidity(self.humidity));
        }

        if self.soil_moisture < SOIL_MOISTURE_LOW_THRESHOLD {
            warnings.push(ThresholdWarning::LowSoilMoisture(self.soil_moisture));
        }

        warnings
    }
}

impl fmt::Display for SensorSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Moisture={:.1}%, Temp={:.1}°C, Humidity={:.1}%, Audio={:.2}",
            self.soil_moisture, self.temperature, self.humidity, self.audio_energy
        )
    }
}

/// A reading outside its warning level
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdWarning {
    HighTemperature(f64),
    LowTemperature(f64),
    HighHumidity(f64),
    LowHumidity(f64),
    LowSoilMoisture(f64),
}

impl fmt::Display for ThresholdWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdWarning::HighTemperature(v) => write!(f, "high temperature {:.1}°C", v),
            ThresholdWarning::LowTemperature(v) => write!(f, "low temperature {:.1}°C", v),
            ThresholdWarning::HighHumidity(v) => write!(f, "high humidity {:.1}%", v),
            ThresholdWarning::LowHumidity(v) => write!(f, "low humidity {:.1}%", v),
            ThresholdWarning::LowSoilMoisture(v) => write!(f, "low soil moisture {:.1}%", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_index_roundtrip() {
        for class in ConditionClass::ALL {
            assert_eq!(ConditionClass::from_index(class.index()), Some(class));
        }
        assert_eq!(ConditionClass::from_index(3), None);
    }

    #[test]
    fn test_class_try_from_invalid() {
        let err = ConditionClass::try_from(7u8).unwrap_err();
        assert!(matches!(err, KrishiError::InvalidClass(7)));
    }

    #[test]
    fn test_class_names() {
        assert_eq!(ConditionClass::WaterStress.name(), "WaterStress");
        assert_eq!(ConditionClass::WaterStress.display_name(), "Water Stress");
        assert_eq!(ConditionClass::PestRisk.to_string(), "PestRisk");
    }

    #[test]
    fn test_clipped() {
        let sample = SensorSample::new(-3.0, 55.0, 104.0, 1.2).clipped();
        assert_eq!(sample.soil_moisture, 0.0);
        assert_eq!(sample.temperature, 50.0);
        assert_eq!(sample.humidity, 100.0);
        assert_eq!(sample.audio_energy, 1.0);
        assert!(sample.is_within_bounds());
    }

    #[test]
    fn test_clipped_keeps_label() {
        let sample = SensorSample::new(50.0, 5.0, 60.0, 0.1)
            .with_condition(ConditionClass::PestRisk)
            .clipped();
        assert_eq!(sample.condition, Some(ConditionClass::PestRisk));
        assert_eq!(sample.temperature, 10.0);
    }

    #[test]
    fn test_out_of_bounds() {
        assert!(!SensorSample::new(50.0, 9.9, 60.0, 0.1).is_within_bounds());
        assert!(SensorSample::new(0.0, 10.0, 100.0, 1.0).is_within_bounds());
    }

    #[test]
    fn test_threshold_warnings() {
        let sample = SensorSample::new(18.0, 42.0, 15.0, 0.2);
        let warnings = sample.threshold_warnings();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.contains(&ThresholdWarning::HighTemperature(42.0)));
        assert!(warnings.contains(&ThresholdWarning::LowHumidity(15.0)));
        assert!(warnings.contains(&ThresholdWarning::LowSoilMoisture(18.0)));

        let healthy = SensorSample::new(50.0, 25.0, 65.0, 0.1);
        assert!(healthy.threshold_warnings().is_empty());
    }
}
