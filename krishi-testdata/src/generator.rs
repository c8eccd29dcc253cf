// KrishiRakshak Testdata - Core generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Seeded sample generation.
//!
//! All randomness flows through the single [`StdRng`] owned by a
//! [`FarmDataGenerator`]. Two generators built from the same seed and
//! driven through the same call sequence produce identical samples.

use crate::dataset::FarmDataset;
use crate::profiles::{
    ClassProfiles, Distribution, DATASET_PROFILES, REALTIME_CLASS_WEIGHTS, REALTIME_PROFILES,
};
use chrono::{DateTime, Duration, Utc};
use krishi::sample::{
    AUDIO_ENERGY_RANGE, HUMIDITY_RANGE, SOIL_MOISTURE_RANGE, TEMPERATURE_RANGE,
};
use krishi::{ConditionClass, SensorSample};
use log::debug;
use rand::prelude::*;
use rand::rngs::StdRng;

/// Default generator seed.
pub const DEFAULT_SEED: u64 = 42;

/// Seeded generator of labelled sensor samples.
#[derive(Debug, Clone)]
pub struct FarmDataGenerator {
    rng: StdRng,
    seed: u64,
    base_time: Option<DateTime<Utc>>,
}

impl Default for FarmDataGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl FarmDataGenerator {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            base_time: None,
        }
    }

    /// Fix the timestamp base of generated datasets.
    ///
    /// Without it the base is the wall clock at generation time.
    pub fn with_base_time(mut self, base_time: DateTime<Utc>) -> Self {
        self.base_time = Some(base_time);
        self
    }

    /// Seed the generator was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate `n` samples of one class from the dataset table.
    pub fn generate_class_batch(&mut self, class: ConditionClass, n: usize) -> Vec<SensorSample> {
        self.draw_batch(&DATASET_PROFILES, class, n)
    }

    /// Generate `samples_per_class` samples of every class.
    ///
    /// Rows come in label order; row `i` is stamped `base - i hours`.
    pub fn generate_balanced_dataset(&mut self, samples_per_class: usize) -> FarmDataset {
        let base = self.base_time.unwrap_or_else(Utc::now);
        let mut samples = Vec::with_capacity(samples_per_class * ConditionClass::ALL.len());

        for class in ConditionClass::ALL {
            samples.extend(self.generate_class_batch(class, samples_per_class));
        }

        let samples = samples
            .into_iter()
            .enumerate()
            .map(|(i, sample)| sample.with_timestamp(base - Duration::hours(i as i64)))
            .collect::<Vec<_>>();

        debug!(
            "generated balanced dataset: {} samples ({} per class, seed {})",
            samples.len(),
            samples_per_class,
            self.seed
        );

        FarmDataset::from_samples(samples)
    }

    /// Generate one sample from the real-time table.
    ///
    /// With no class given, the class is drawn first with probabilities
    /// [`REALTIME_CLASS_WEIGHTS`].
    pub fn generate_single_sample(&mut self, class: Option<ConditionClass>) -> SensorSample {
        let class = class.unwrap_or_else(|| self.choose_class());
        let profile = REALTIME_PROFILES.get(class);

        SensorSample {
            soil_moisture: SOIL_MOISTURE_RANGE.clip(profile.soil_moisture.sample(&mut self.rng)),
            temperature: TEMPERATURE_RANGE.clip(profile.temperature.sample(&mut self.rng)),
            humidity: HUMIDITY_RANGE.clip(profile.humidity.sample(&mut self.rng)),
            audio_energy: AUDIO_ENERGY_RANGE.clip(profile.audio_energy.sample(&mut self.rng)),
            condition: Some(class),
            timestamp: Some(Utc::now()),
        }
    }

    /// Generate `n` successive real-time samples with drawn classes.
    pub fn generate_real_time_samples(&mut self, n: usize) -> Vec<SensorSample> {
        (0..n).map(|_| self.generate_single_sample(None)).collect()
    }

    fn choose_class(&mut self) -> ConditionClass {
        let u: f64 = self.rng.gen();
        let mut cumulative = 0.0;
        for (class, weight) in ConditionClass::ALL.iter().zip(REALTIME_CLASS_WEIGHTS) {
            cumulative += weight;
            if u < cumulative {
                return *class;
            }
        }
        // rounding slack at the top of the unit interval
        ConditionClass::PestRisk
    }

    fn draw_batch(
        &mut self,
        profiles: &ClassProfiles,
        class: ConditionClass,
        n: usize,
    ) -> Vec<SensorSample> {
        let profile = profiles.get(class);

        let soil_moisture = self.draw_column(profile.soil_moisture, n);
        let temperature = self.draw_column(profile.temperature, n);
        let humidity = self.draw_column(profile.humidity, n);
        let audio_energy = self.draw_column(profile.audio_energy, n);

        (0..n)
            .map(|i| {
                SensorSample::new(
                    SOIL_MOISTURE_RANGE.clip(soil_moisture[i]),
                    TEMPERATURE_RANGE.clip(temperature[i]),
                    HUMIDITY_RANGE.clip(humidity[i]),
                    AUDIO_ENERGY_RANGE.clip(audio_energy[i]),
                )
                .with_condition(class)
            })
            .collect()
    }

    fn draw_column(&mut self, distribution: Distribution, n: usize) -> Vec<f64> {
        (0..n).map(|_| distribution.sample(&mut self.rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_batch_labels() {
        let mut gen = FarmDataGenerator::new(7);
        let batch = gen.generate_class_batch(ConditionClass::WaterStress, 25);
        assert_eq!(batch.len(), 25);
        assert!(batch
            .iter()
            .all(|s| s.condition == Some(ConditionClass::WaterStress)));
        assert!(batch.iter().all(|s| s.timestamp.is_none()));
    }

    #[test]
    fn test_empty_batch() {
        let mut gen = FarmDataGenerator::new(7);
        assert!(gen.generate_class_batch(ConditionClass::Normal, 0).is_empty());
    }

    #[test]
    fn test_single_sample_with_class() {
        let mut gen = FarmDataGenerator::new(3);
        let sample = gen.generate_single_sample(Some(ConditionClass::PestRisk));
        assert_eq!(sample.condition, Some(ConditionClass::PestRisk));
        assert!((0.7..=0.9).contains(&sample.audio_energy));
        assert!(sample.is_within_bounds());
    }

    #[test]
    fn test_choose_class_covers_all() {
        let mut gen = FarmDataGenerator::new(11);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[gen.choose_class().index()] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_seed_accessor() {
        assert_eq!(FarmDataGenerator::new(99).seed(), 99);
        assert_eq!(FarmDataGenerator::default().seed(), DEFAULT_SEED);
    }
}
