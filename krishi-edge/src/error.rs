// KrishiRakshak Edge - Inference simulator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Error types for the edge simulator

use krishi::{ClassifierError, StatsError};
use krishi_testdata::DatasetError;
use thiserror::Error;

/// Main error type for simulator operations
#[derive(Error, Debug)]
pub enum SimulatorError {
    /// Inference requested before a classifier was loaded or trained
    #[error("No classifier loaded: call load_classifier, load_model or train_default_classifier first")]
    ClassifierNotLoaded,

    /// Sampling interval of zero
    #[error("Invalid sampling interval: must be greater than zero")]
    InvalidInterval,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Classifier failure (training, prediction, model file)
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// Statistics over an empty latency history
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// Training dataset failure
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// IO error (report or config file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed report or config file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;
