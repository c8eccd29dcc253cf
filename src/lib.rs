//! # KrishiRakshak - Edge inference core
//!
//! Farm condition classification from four field sensors, sized for an
//! edge device.
//!
//! ## Key Features
//!
//! - **Fixed-shape samples**: soil moisture, temperature, humidity and
//!   acoustic energy with physical ranges
//! - **Deterministic preprocessing**: affine normalisation into [0, 1]
//! - **Pluggable classifier**: any [`Classifier`]; a small dense network ships built in
//! - **Alerting rule**: confident non-normal predictions only
//! - **Latency statistics**: mean, spread and tail percentiles
//!
//! ## Quick Start
//!
//! ```rust
//! use krishi::{alert_policy, preprocess, Classifier, FeedForwardNetwork, InferenceResult, SensorSample};
//!
//! let network = FeedForwardNetwork::default();
//! let sample = SensorSample::new(22.0, 36.5, 31.0, 0.2);
//!
//! let features = preprocess(&sample);
//! let probabilities = network.predict(&features).unwrap();
//! let result = InferenceResult::from_probabilities(probabilities, 0.0, chrono::Utc::now()).unwrap();
//!
//! println!("{} ({:.1}%): {}", result.predicted_class, result.confidence * 100.0, alert_policy(&result));
//! ```
//!
//! ## Modules
//!
//! - [`sample`]: Sensor samples, condition classes, physical ranges
//! - [`preprocess`]: Feature normalisation
//! - [`classifier`]: Classifier trait and the built-in network
//! - [`inference`]: Inference results and the alert policy
//! - [`metrics`]: Latency history and statistics

// Modules
pub mod classifier;
pub mod error;
pub mod inference;
pub mod metrics;
pub mod preprocess;
pub mod sample;

// Re-exports for convenient access
pub use classifier::{Classifier, FeedForwardNetwork, ModelInfo, TrainingConfig, TrainingSummary};
pub use error::{ClassifierError, KrishiError, Result, StatsError};
pub use inference::{alert_policy, AlertPolicy, AlertStatus, InferenceResult};
pub use metrics::{LatencyHistory, LatencyStats, PerformanceRating, DEFAULT_LATENCY_TARGET_MS};
pub use preprocess::{preprocess, FeatureVector};
pub use sample::{ConditionClass, SensorSample, ThresholdWarning, NUM_CLASSES, NUM_FEATURES};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_basic_pipeline() {
        let network = FeedForwardNetwork::default();
        let sample = SensorSample::new(50.0, 25.0, 65.0, 0.1);

        let probabilities = network.predict(&preprocess(&sample)).unwrap();
        let result =
            InferenceResult::from_probabilities(probabilities, 0.0, chrono::Utc::now()).unwrap();

        assert!((0.0..=1.0).contains(&result.confidence));
        assert!(result.predicted_class.index() < NUM_CLASSES);
    }
}
