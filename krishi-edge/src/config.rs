// KrishiRakshak Edge - Inference simulator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Configuration types for the edge simulator

use crate::error::{Result, SimulatorError};
use krishi::inference::DEFAULT_CONFIDENCE_THRESHOLD;
use krishi::{TrainingConfig, DEFAULT_LATENCY_TARGET_MS};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Seed of the sample generator (default: 42)
    pub seed: u64,

    /// Confidence above which a prediction is acted on (default: 0.7)
    pub confidence_threshold: f64,

    /// Mean inference latency the hardware must stay under (default: 50 ms)
    pub latency_target_ms: f64,

    /// Samples per class for the default classifier (default: 100)
    pub training_samples_per_class: usize,

    /// Log benchmark progress every this many iterations (default: 100)
    pub benchmark_progress_interval: usize,

    /// Hyper-parameters of the default classifier
    pub training: TrainingConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            latency_target_ms: DEFAULT_LATENCY_TARGET_MS,
            training_samples_per_class: 100,
            benchmark_progress_interval: 100,
            training: TrainingConfig::default(),
        }
    }
}

impl SimulatorConfig {
    /// Create a default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the generator seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the confidence threshold
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the latency target
    pub fn with_latency_target_ms(mut self, target_ms: f64) -> Self {
        self.latency_target_ms = target_ms;
        self
    }

    /// Set the training set size of the default classifier
    pub fn with_training_samples_per_class(mut self, n: usize) -> Self {
        self.training_samples_per_class = n;
        self
    }

    /// Set the training hyper-parameters
    pub fn with_training(mut self, training: TrainingConfig) -> Self {
        self.training = training;
        self
    }

    /// Reject values the simulator cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_threshold > 0.0 && self.confidence_threshold < 1.0) {
            return Err(SimulatorError::InvalidConfig(format!(
                "confidence threshold {} must lie in (0, 1)",
                self.confidence_threshold
            )));
        }
        if !(self.latency_target_ms > 0.0) || !self.latency_target_ms.is_finite() {
            return Err(SimulatorError::InvalidConfig(format!(
                "latency target {} ms must be positive",
                self.latency_target_ms
            )));
        }
        if self.benchmark_progress_interval == 0 {
            return Err(SimulatorError::InvalidConfig(
                "benchmark progress interval must be at least 1".to_string(),
            ));
        }
        if self.training.batch_size == 0 {
            return Err(SimulatorError::InvalidConfig(
                "training batch size must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.training.dropout) {
            return Err(SimulatorError::InvalidConfig(format!(
                "dropout {} must lie in [0, 1)",
                self.training.dropout
            )));
        }
        Ok(())
    }
}
