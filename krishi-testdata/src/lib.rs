// KrishiRakshak Testdata - Synthetic farm sensor data
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # KrishiRakshak Testdata
//!
//! Synthetic, labelled farm sensor data for training and exercising the
//! edge classifier.
//!
//! - **Class profiles**: per-class Gaussian/uniform feature distributions,
//!   one table for bulk datasets and one for real-time simulation
//! - **Seeded generation**: every draw comes from one owned RNG
//! - **Export**: CSV with a mirrored JSON file, plus per-class statistics
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use krishi_testdata::FarmDataGenerator;
//!
//! let mut generator = FarmDataGenerator::new(42);
//! let dataset = generator.generate_balanced_dataset(1000);
//!
//! dataset.save("farm_sensor_data.csv").unwrap();
//! println!("{}", dataset.report().unwrap());
//! ```

pub mod dataset;
pub mod generator;
pub mod profiles;

// Re-exports for convenience
pub use dataset::{ClassStats, DatasetError, DatasetRecord, FarmDataset, FeatureStats};
pub use generator::{FarmDataGenerator, DEFAULT_SEED};
pub use profiles::{
    ClassProfiles, Distribution, FeatureProfile, DATASET_PROFILES, REALTIME_CLASS_WEIGHTS,
    REALTIME_PROFILES,
};
