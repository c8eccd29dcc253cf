//! Error types for the KrishiRakshak core
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, KrishiError>;

/// Main error type for core operations
#[derive(Error, Debug)]
pub enum KrishiError {
    /// Classifier error
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// Statistics error
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    /// Condition label outside {0, 1, 2}
    #[error("Invalid condition class index: {0}")]
    InvalidClass(u8),
}

/// Errors raised by a classifier or by the checks around it
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Wrong number of values (features, probabilities, labels)
    #[error("Shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Probability vector is not a distribution over the classes
    #[error("Invalid probabilities: {0}")]
    InvalidProbabilities(String),

    /// Training requested without any samples
    #[error("Empty training set")]
    EmptyTrainingSet,

    /// Model file does not describe a usable network
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// IO error while saving or loading a model
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed model file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from latency statistics
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsError {
    /// Statistics requested before any inference was recorded
    #[error("No latencies recorded: statistics over an empty history are undefined")]
    Empty,
}
