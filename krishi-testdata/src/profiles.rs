// KrishiRakshak Testdata - Class profiles
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Per-class sampling distributions.
//!
//! Two tables exist for the same three classes. [`DATASET_PROFILES`]
//! drives bulk training datasets; [`REALTIME_PROFILES`] drives the single
//! samples fed to the real-time simulation and is narrower for Normal and
//! WaterStress. The tables are intentionally kept apart; do not merge
//! them without confirming which one the model is meant to match.

use krishi::ConditionClass;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Distribution of one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Distribution {
    /// Gaussian with mean and standard deviation.
    Normal { mean: f64, std: f64 },
    /// Uniform on `[low, high)`.
    Uniform { low: f64, high: f64 },
}

impl Distribution {
    /// Draw one value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Distribution::Normal { mean, std } => {
                let z: f64 = rng.sample(StandardNormal);
                mean + std * z
            }
            Distribution::Uniform { low, high } => low + (high - low) * rng.gen::<f64>(),
        }
    }

    /// Expected value.
    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::Normal { mean, .. } => mean,
            Distribution::Uniform { low, high } => (low + high) / 2.0,
        }
    }
}

/// Distributions of the four features for one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureProfile {
    pub soil_moisture: Distribution,
    pub temperature: Distribution,
    pub humidity: Distribution,
    pub audio_energy: Distribution,
}

/// One [`FeatureProfile`] per class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProfiles {
    pub normal: FeatureProfile,
    pub water_stress: FeatureProfile,
    pub pest_risk: FeatureProfile,
}

impl ClassProfiles {
    /// Profile of a class.
    pub fn get(&self, class: ConditionClass) -> &FeatureProfile {
        match class {
            ConditionClass::Normal => &self.normal,
            ConditionClass::WaterStress => &self.water_stress,
            ConditionClass::PestRisk => &self.pest_risk,
        }
    }
}

const fn normal(mean: f64, std: f64) -> Distribution {
    Distribution::Normal { mean, std }
}

const fn uniform(low: f64, high: f64) -> Distribution {
    Distribution::Uniform { low, high }
}

/// Bulk dataset parameters.
pub const DATASET_PROFILES: ClassProfiles = ClassProfiles {
    normal: FeatureProfile {
        soil_moisture: normal(50.0, 8.0),
        temperature: normal(25.0, 2.0),
        humidity: normal(65.0, 10.0),
        audio_energy: uniform(0.0, 0.3),
    },
    water_stress: FeatureProfile {
        soil_moisture: normal(25.0, 6.0),
        temperature: normal(35.0, 3.0),
        humidity: normal(35.0, 8.0),
        audio_energy: uniform(0.1, 0.4),
    },
    pest_risk: FeatureProfile {
        soil_moisture: normal(45.0, 12.0),
        temperature: normal(28.0, 4.0),
        humidity: normal(55.0, 15.0),
        audio_energy: uniform(0.6, 0.9),
    },
};

/// Real-time single-sample parameters.
pub const REALTIME_PROFILES: ClassProfiles = ClassProfiles {
    normal: FeatureProfile {
        soil_moisture: normal(50.0, 5.0),
        temperature: normal(25.0, 1.5),
        humidity: normal(65.0, 5.0),
        audio_energy: uniform(0.0, 0.2),
    },
    water_stress: FeatureProfile {
        soil_moisture: normal(20.0, 4.0),
        temperature: normal(35.0, 2.0),
        humidity: normal(30.0, 4.0),
        audio_energy: uniform(0.1, 0.3),
    },
    pest_risk: FeatureProfile {
        soil_moisture: normal(45.0, 6.0),
        temperature: normal(28.0, 2.0),
        humidity: normal(55.0, 8.0),
        audio_energy: uniform(0.7, 0.9),
    },
};

/// Probability of each class when a real-time sample's class is drawn,
/// in label order.
pub const REALTIME_CLASS_WEIGHTS: [f64; 3] = [0.6, 0.2, 0.2];
