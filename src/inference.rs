// KrishiRakshak - Edge inference core
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Inference results and the alerting rule
//!
//! An [`InferenceResult`] is produced once per classifier call. The
//! [`AlertPolicy`] turns it into the status the device reports: only
//! confident, non-normal predictions raise an alert.

use crate::classifier::{argmax, validate_probabilities};
use crate::error::ClassifierError;
use crate::sample::ConditionClass;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default confidence above which a prediction is acted on
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Outcome of one classifier call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Class with the highest probability
    pub predicted_class: ConditionClass,
    /// Highest probability (0.0-1.0)
    pub confidence: f64,
    /// Probability of every class, in label order
    pub raw_predictions: Vec<f64>,
    /// Wall-clock duration of the classifier call
    pub inference_time_ms: f64,
    /// Completion time
    pub timestamp: DateTime<Utc>,
}

impl InferenceResult {
    /// Build a result from a classifier's probability vector
    pub fn from_probabilities(
        probabilities: Vec<f64>,
        inference_time_ms: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ClassifierError> {
        validate_probabilities(&probabilities)?;

        let (index, confidence) = argmax(&probabilities).ok_or(ClassifierError::ShapeMismatch {
            expected: probabilities.len(),
            actual: 0,
        })?;
        let predicted_class =
            ConditionClass::from_index(index).ok_or(ClassifierError::ShapeMismatch {
                expected: crate::sample::NUM_CLASSES,
                actual: probabilities.len(),
            })?;

        Ok(Self {
            predicted_class,
            confidence: confidence.clamp(0.0, 1.0),
            raw_predictions: probabilities,
            inference_time_ms,
            timestamp,
        })
    }
}

/// Device status after applying the alert policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStatus {
    /// Confident non-normal prediction
    Alert(ConditionClass),
    /// Confident normal prediction; no alert
    Normal,
    /// Confidence at or below the threshold
    LowConfidence,
}

impl AlertStatus {
    /// True when an alert is raised
    pub fn is_alert(&self) -> bool {
        matches!(self, AlertStatus::Alert(_))
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertStatus::Alert(class) => write!(f, "ALERT: {}", class.display_name()),
            AlertStatus::Normal => f.write_str("Normal"),
            AlertStatus::LowConfidence => f.write_str("Low confidence"),
        }
    }
}

/// Confidence-threshold alerting rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertPolicy {
    /// Strict lower bound on confidence for acting on a prediction
    pub confidence_threshold: f64,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl AlertPolicy {
    /// Create a policy with a custom threshold
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            confidence_threshold,
        }
    }

    /// Status for a result.
    ///
    /// Above the threshold a non-normal class alerts and a normal class
    /// does not. At or below it the status is low confidence whatever
    /// the class.
    pub fn evaluate(&self, result: &InferenceResult) -> AlertStatus {
        if result.confidence > self.confidence_threshold {
            if result.predicted_class.is_normal() {
                AlertStatus::Normal
            } else {
                AlertStatus::Alert(result.predicted_class)
            }
        } else {
            AlertStatus::LowConfidence
        }
    }
}

/// Apply the default 0.7 policy
pub fn alert_policy(result: &InferenceResult) -> AlertStatus {
    AlertPolicy::default().evaluate(result)
}
