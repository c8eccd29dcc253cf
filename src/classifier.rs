// KrishiRakshak - Edge inference core
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Classifier collaborator
//!
//! The simulator consumes a classifier through two operations only:
//! training on a feature matrix with labels, and predicting the class
//! probability vector of one preprocessed feature vector. Any type
//! implementing [`Classifier`] can be substituted for the built-in
//! [`FeedForwardNetwork`].

pub mod network;

pub use network::{Activation, FeedForwardNetwork, TrainingConfig, HIDDEN_LAYERS};

use crate::error::ClassifierError;
use crate::preprocess::FeatureVector;
use crate::sample::{ConditionClass, NUM_CLASSES};
use serde::{Deserialize, Serialize};

/// Absolute slack allowed around [0, 1] for rounding in probabilities
const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Summary of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Number of passes over the training set
    pub epochs: usize,
    /// Number of training samples
    pub samples: usize,
    /// Mean cross-entropy of the last epoch
    pub final_loss: f64,
    /// Training accuracy of the last epoch (0.0-1.0)
    pub final_accuracy: f64,
}

/// Static description of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Number of input features
    pub input_size: usize,
    /// Number of output classes
    pub output_size: usize,
    /// Width of every layer, input included
    pub layer_widths: Vec<usize>,
    /// Total number of trainable parameters
    pub parameter_count: usize,
}

/// A condition classifier
pub trait Classifier {
    /// Fit the model to preprocessed feature vectors and their labels
    fn train(
        &mut self,
        features: &[FeatureVector],
        labels: &[ConditionClass],
    ) -> Result<TrainingSummary, ClassifierError>;

    /// Class probabilities for one preprocessed feature vector
    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>, ClassifierError>;

    /// Model description, when the implementation has one
    fn info(&self) -> Option<ModelInfo> {
        None
    }
}

/// Check that a prediction is a probability vector over the classes
pub fn validate_probabilities(probabilities: &[f64]) -> Result<(), ClassifierError> {
    if probabilities.len() != NUM_CLASSES {
        return Err(ClassifierError::ShapeMismatch {
            expected: NUM_CLASSES,
            actual: probabilities.len(),
        });
    }

    for (i, p) in probabilities.iter().enumerate() {
        if !p.is_finite() || *p < -PROBABILITY_TOLERANCE || *p > 1.0 + PROBABILITY_TOLERANCE {
            return Err(ClassifierError::InvalidProbabilities(format!(
                "class {} has probability {}",
                i, p
            )));
        }
    }

    Ok(())
}

/// Index and value of the largest probability; the first wins on ties
pub fn argmax(probabilities: &[f64]) -> Option<(usize, f64)> {
    probabilities
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, p)| match best {
            Some((_, best_p)) if best_p >= p => best,
            _ => Some((i, p)),
        })
}
