//! Feature preprocessing
//!
//! Fixed affine normalisation of a [`SensorSample`] into the model's
//! input vector. Every component maps its physical range onto [0, 1].

use crate::sample::{SensorSample, NUM_FEATURES};

/// Model input vector
pub type FeatureVector = [f64; NUM_FEATURES];

/// Normalise a sample for the classifier.
///
/// Moisture and humidity are divided by 100, temperature is mapped from
/// 10-50 °C, audio energy is already in unit range.
pub fn preprocess(sample: &SensorSample) -> FeatureVector {
    [
        sample.soil_moisture / 100.0,
        (sample.temperature - 10.0) / 40.0,
        sample.humidity / 100.0,
        sample.audio_energy,
    ]
}
