// KrishiRakshak Edge - Inference simulator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Simulation report
//!
//! JSON layout:
//!
//! ```json
//! {
//!   "timestamp": "2025-01-01T00:00:00Z",
//!   "performance_metrics": {
//!     "total_inferences": 124,
//!     "average_inference_time_ms": 0.21,
//!     "min_inference_time_ms": 0.12,
//!     "max_inference_time_ms": 1.9,
//!     "std_inference_time_ms": 0.17
//!   },
//!   "hardware_compatibility": {
//!     "target_inference_time_ms": 50.0,
//!     "achieved_inference_time_ms": 0.21,
//!     "meets_requirements": true
//!   }
//! }
//! ```

use crate::error::Result;
use chrono::{DateTime, Utc};
use krishi::{LatencyStats, ModelInfo};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Aggregate latency figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_inferences: usize,
    pub average_inference_time_ms: f64,
    pub min_inference_time_ms: f64,
    pub max_inference_time_ms: f64,
    pub std_inference_time_ms: f64,
}

impl From<&LatencyStats> for PerformanceMetrics {
    fn from(stats: &LatencyStats) -> Self {
        Self {
            total_inferences: stats.count,
            average_inference_time_ms: stats.mean_ms,
            min_inference_time_ms: stats.min_ms,
            max_inference_time_ms: stats.max_ms,
            std_inference_time_ms: stats.std_ms,
        }
    }
}

/// Mean latency against the hardware target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareCompatibility {
    pub target_inference_time_ms: f64,
    pub achieved_inference_time_ms: f64,
    pub meets_requirements: bool,
}

/// Report exported after a simulation or benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub timestamp: DateTime<Utc>,
    pub performance_metrics: PerformanceMetrics,
    pub hardware_compatibility: HardwareCompatibility,
    /// Installed model, when it describes itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelInfo>,
}

impl SimulationReport {
    /// Build a report from latency statistics
    pub fn new(stats: &LatencyStats, target_ms: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            performance_metrics: PerformanceMetrics::from(stats),
            hardware_compatibility: HardwareCompatibility {
                target_inference_time_ms: target_ms,
                achieved_inference_time_ms: stats.mean_ms,
                meets_requirements: stats.meets_target(target_ms),
            },
            model: None,
        }
    }

    /// Attach the model description
    pub fn with_model(mut self, model: Option<ModelInfo>) -> Self {
        self.model = model;
        self
    }

    /// Write as pretty JSON
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a report written by [`SimulationReport::to_json_file`]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    #[test]
    fn test_report_fields() {
        let stats = LatencyStats::from_latencies(&[1.0, 3.0]).unwrap();
        let report = SimulationReport::new(&stats, 50.0, Utc::now());

        assert_eq!(report.performance_metrics.total_inferences, 2);
        assert_relative_eq!(report.performance_metrics.average_inference_time_ms, 2.0);
        assert_relative_eq!(report.performance_metrics.std_inference_time_ms, 1.0);
        assert_relative_eq!(report.hardware_compatibility.achieved_inference_time_ms, 2.0);
        assert!(report.hardware_compatibility.meets_requirements);
    }

    #[test]
    fn test_slow_report_fails_target() {
        let stats = LatencyStats::from_latencies(&[60.0, 80.0]).unwrap();
        let report = SimulationReport::new(&stats, 50.0, Utc::now());
        assert!(!report.hardware_compatibility.meets_requirements);
    }

    #[test]
    fn test_json_layout() {
        let stats = LatencyStats::from_latencies(&[0.5]).unwrap();
        let report = SimulationReport::new(&stats, 50.0, Utc::now());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("simulation_report.json");
        report.to_json_file(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["timestamp"].is_string());
        assert_eq!(value["performance_metrics"]["total_inferences"], 1);
        assert_eq!(value["hardware_compatibility"]["target_inference_time_ms"], 50.0);
        assert!(value.get("model").is_none());

        assert_eq!(SimulationReport::from_json_file(&path).unwrap(), report);
    }
}
