// KrishiRakshak Edge - Inference simulator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Edge device inference simulator
//!
//! [`EdgeSimulator`] is built in two steps: construction from a
//! [`SimulatorConfig`], then installation of a classifier through
//! [`EdgeSimulator::load_classifier`], [`EdgeSimulator::load_model`] or
//! [`EdgeSimulator::train_default_classifier`]. Every inference appends
//! its latency to the simulator's history; statistics are recomputed
//! from the history on demand.
//!
//! Execution is strictly sequential. The real-time loop blocks the
//! calling thread between samples.

use crate::config::SimulatorConfig;
use crate::error::{Result, SimulatorError};
use crate::report::SimulationReport;
use chrono::Utc;
use krishi::{
    preprocess, AlertPolicy, AlertStatus, Classifier, FeatureVector, FeedForwardNetwork,
    InferenceResult, LatencyHistory, LatencyStats, ModelInfo, PerformanceRating, SensorSample,
    StatsError, TrainingSummary,
};
use krishi_testdata::FarmDataGenerator;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Outcome of a real-time simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    /// Samples processed
    pub total_samples: usize,
    /// Samples that raised an alert
    pub alerts: usize,
    /// Latency statistics of this run
    pub stats: LatencyStats,
    /// Mean latency under the configured target
    pub meets_target: bool,
    /// Stopped early by the cancellation flag
    pub cancelled: bool,
}

impl SimulationSummary {
    /// Generate a human-readable report
    pub fn report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!("Total samples processed: {}\n", self.total_samples));
        report.push_str(&format!("Alerts generated: {}\n", self.alerts));
        report.push_str(&format!(
            "Average inference time: {:.4} ms\n",
            self.stats.mean_ms
        ));
        report.push_str(&format!("Min inference time: {:.4} ms\n", self.stats.min_ms));
        report.push_str(&format!("Max inference time: {:.4} ms\n", self.stats.max_ms));
        report.push_str(&format!("Std inference time: {:.4} ms\n", self.stats.std_ms));
        report.push_str(&format!(
            "Meets latency target: {}\n",
            if self.meets_target { "YES" } else { "NO" }
        ));
        if self.cancelled {
            report.push_str("Simulation cancelled before completion\n");
        }
        report
    }
}

/// Outcome of a benchmark
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResults {
    /// Latency statistics of this benchmark
    pub stats: LatencyStats,
    /// Band of the mean latency
    pub rating: PerformanceRating,
    /// Mean latency under the configured target
    pub meets_target: bool,
}

impl BenchmarkResults {
    /// Generate a human-readable report
    pub fn report(&self) -> String {
        format!(
            "{}Meets latency target: {}\n",
            self.stats.report(),
            if self.meets_target { "YES" } else { "NO" }
        )
    }
}

/// Simulated edge device running the condition classifier
pub struct EdgeSimulator {
    config: SimulatorConfig,
    generator: FarmDataGenerator,
    classifier: Option<Box<dyn Classifier>>,
    policy: AlertPolicy,
    history: LatencyHistory,
    cancel: Option<Arc<AtomicBool>>,
}

impl EdgeSimulator {
    /// Create a simulator without a classifier
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            generator: FarmDataGenerator::new(config.seed),
            policy: AlertPolicy::new(config.confidence_threshold),
            classifier: None,
            history: LatencyHistory::new(),
            cancel: None,
            config,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Sample generator owned by the simulator
    pub fn generator_mut(&mut self) -> &mut FarmDataGenerator {
        &mut self.generator
    }

    /// Install a classifier, replacing any previous one
    pub fn load_classifier<C: Classifier + 'static>(&mut self, classifier: C) {
        self.classifier = Some(Box::new(classifier));
    }

    /// Install a network saved with [`FeedForwardNetwork::save`]
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let network = FeedForwardNetwork::load(path)?;
        self.load_classifier(network);
        Ok(())
    }

    /// Train and install the built-in network on a balanced generated dataset
    pub fn train_default_classifier(&mut self) -> Result<TrainingSummary> {
        let (network, summary) = self.train_default_network()?;
        self.load_classifier(network);
        Ok(summary)
    }

    /// Train the built-in network without installing it.
    ///
    /// Draws the training set from the simulator's generator, so the
    /// samples that follow depend on this call.
    pub fn train_default_network(&mut self) -> Result<(FeedForwardNetwork, TrainingSummary)> {
        info!("Creating default classifier...");

        let dataset = self
            .generator
            .generate_balanced_dataset(self.config.training_samples_per_class);
        let features: Vec<FeatureVector> = dataset.samples().iter().map(preprocess).collect();
        let labels = dataset.labels()?;

        let mut network = FeedForwardNetwork::new(self.config.training.clone());
        let summary = network.train(&features, &labels)?;
        Ok((network, summary))
    }

    /// True once a classifier is installed
    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Description of the installed classifier
    pub fn model_info(&self) -> Option<ModelInfo> {
        self.classifier.as_ref().and_then(|c| c.info())
    }

    /// Share a flag that stops [`EdgeSimulator::simulate_real_time`] between samples
    pub fn set_cancel_flag(&mut self, flag: Arc<AtomicBool>) {
        self.cancel = Some(flag);
    }

    /// Normalised features of a sample.
    ///
    /// Out-of-range readings are clipped first.
    pub fn preprocess(&self, sample: &SensorSample) -> FeatureVector {
        if sample.is_within_bounds() {
            preprocess(sample)
        } else {
            warn!("Sample out of sensor range, clipping: {}", sample);
            preprocess(&sample.clipped())
        }
    }

    /// Classify one sample and record its latency
    pub fn run_inference(&mut self, sample: &SensorSample) -> Result<InferenceResult> {
        let features = self.preprocess(sample);

        let classifier = self
            .classifier
            .as_ref()
            .ok_or(SimulatorError::ClassifierNotLoaded)?;

        // latency covers the prediction call only
        let start = Instant::now();
        let probabilities = classifier.predict(&features)?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let result = InferenceResult::from_probabilities(probabilities, elapsed_ms, Utc::now())?;
        self.history.record(elapsed_ms);
        Ok(result)
    }

    /// Status for a result under the configured threshold
    pub fn alert_policy(&self, result: &InferenceResult) -> AlertStatus {
        self.policy.evaluate(result)
    }

    /// Classify one generated sample every `interval` for `duration`.
    ///
    /// Runs `floor(duration / interval)` samples and sleeps `interval`
    /// after each, the last one included.
    pub fn simulate_real_time(
        &mut self,
        duration: Duration,
        interval: Duration,
    ) -> Result<SimulationSummary> {
        if interval.is_zero() {
            return Err(SimulatorError::InvalidInterval);
        }
        if !self.has_classifier() {
            return Err(SimulatorError::ClassifierNotLoaded);
        }

        let total = (duration.as_nanos() / interval.as_nanos()) as usize;
        let first = self.history.len();
        let mut alerts = 0;
        let mut processed = 0;
        let mut cancelled = false;

        info!(
            "Starting real-time simulation: {:?} at {:?} intervals ({} samples)",
            duration, interval, total
        );

        for i in 0..total {
            if self.is_cancelled() {
                info!("Simulation cancelled after {} samples", processed);
                cancelled = true;
                break;
            }

            let sample = self.generator.generate_single_sample(None);
            for warning in sample.threshold_warnings() {
                warn!("Sample {}: {}", i + 1, warning);
            }

            let result = self.run_inference(&sample)?;
            let status = self.alert_policy(&result);
            if status.is_alert() {
                alerts += 1;
            }
            processed += 1;

            info!(
                "Sample {}/{}: {} | {} ({:.1}%) | {:.2} ms | {}",
                i + 1,
                total,
                sample,
                result.predicted_class.display_name(),
                result.confidence * 100.0,
                result.inference_time_ms,
                status
            );

            thread::sleep(interval);
        }

        let stats = self.history.stats_since(first)?;
        let meets_target = stats.meets_target(self.config.latency_target_ms);

        info!(
            "Simulation complete: {} samples, {} alerts, {:.4} ms average",
            processed, alerts, stats.mean_ms
        );

        Ok(SimulationSummary {
            total_samples: processed,
            alerts,
            stats,
            meets_target,
            cancelled,
        })
    }

    /// Run `iterations` generated samples back to back
    pub fn benchmark(&mut self, iterations: usize) -> Result<BenchmarkResults> {
        if !self.has_classifier() {
            return Err(SimulatorError::ClassifierNotLoaded);
        }

        info!("Running performance benchmark ({} iterations)...", iterations);

        let samples = self.generator.generate_real_time_samples(iterations);
        let first = self.history.len();
        let progress = self.config.benchmark_progress_interval;

        for (i, sample) in samples.iter().enumerate() {
            self.run_inference(sample)?;
            if (i + 1) % progress == 0 {
                info!("Completed {}/{} inferences", i + 1, iterations);
            }
        }

        let stats = self.history.stats_since(first)?;
        let rating = stats.rating();
        let meets_target = stats.meets_target(self.config.latency_target_ms);
        debug!("Benchmark rating: {}", rating);

        Ok(BenchmarkResults {
            stats,
            rating,
            meets_target,
        })
    }

    /// Statistics over every recorded latency
    pub fn stats(&self) -> std::result::Result<LatencyStats, StatsError> {
        self.history.stats()
    }

    /// Every recorded latency, in call order
    pub fn latency_history(&self) -> &LatencyHistory {
        &self.history
    }

    /// Report over the whole latency history
    pub fn export_report(&self) -> Result<SimulationReport> {
        let stats = self.stats()?;
        Ok(SimulationReport::new(&stats, self.config.latency_target_ms, Utc::now())
            .with_model(self.model_info()))
    }

    /// Write [`EdgeSimulator::export_report`] as JSON
    pub fn save_report(&self, path: impl AsRef<Path>) -> Result<SimulationReport> {
        let report = self.export_report()?;
        report.to_json_file(path.as_ref())?;
        info!("Report saved to {}", path.as_ref().display());
        Ok(report)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
