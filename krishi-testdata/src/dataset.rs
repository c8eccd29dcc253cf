// KrishiRakshak Testdata - Dataset structures
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Labelled dataset storage, export and statistics.
//!
//! CSV columns, in order:
//! `soil_moisture,temperature,humidity,audio_energy,timestamp,label,condition`.
//! The JSON export is an array of the same records.

use chrono::{DateTime, Utc};
use krishi::{ConditionClass, SensorSample, NUM_FEATURES};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Dataset error types.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error at record {record}: {message}")]
    Parse { record: usize, message: String },

    #[error("Empty dataset")]
    Empty,

    #[error("Invalid condition label: {0}")]
    InvalidClass(u8),

    #[error("Sample {0} has no condition label")]
    MissingLabel(usize),
}

/// One exported row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub soil_moisture: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub audio_energy: f64,
    pub timestamp: Option<DateTime<Utc>>,
    pub label: Option<u8>,
    pub condition: Option<String>,
}

impl From<&SensorSample> for DatasetRecord {
    fn from(sample: &SensorSample) -> Self {
        Self {
            soil_moisture: sample.soil_moisture,
            temperature: sample.temperature,
            humidity: sample.humidity,
            audio_energy: sample.audio_energy,
            timestamp: sample.timestamp,
            label: sample.condition.map(u8::from),
            condition: sample.condition.map(|c| c.name().to_string()),
        }
    }
}

impl DatasetRecord {
    fn into_sample(self, record: usize) -> Result<SensorSample, DatasetError> {
        let condition = match self.label {
            Some(label) => {
                let class = ConditionClass::from_index(label as usize)
                    .ok_or(DatasetError::InvalidClass(label))?;
                if let Some(name) = &self.condition {
                    if name != class.name() {
                        return Err(DatasetError::Parse {
                            record,
                            message: format!("label {} does not match condition '{}'", label, name),
                        });
                    }
                }
                Some(class)
            }
            None => None,
        };

        Ok(SensorSample {
            soil_moisture: self.soil_moisture,
            temperature: self.temperature,
            humidity: self.humidity,
            audio_energy: self.audio_energy,
            condition,
            timestamp: self.timestamp,
        })
    }
}

/// Ordered collection of generated samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FarmDataset {
    samples: Vec<SensorSample>,
}

impl FarmDataset {
    /// Wrap samples, keeping their order.
    pub fn from_samples(samples: Vec<SensorSample>) -> Self {
        Self { samples }
    }

    /// All samples in row order.
    pub fn samples(&self) -> &[SensorSample] {
        &self.samples
    }

    /// Get number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Condition label of every row; fails on the first unlabelled row.
    pub fn labels(&self) -> Result<Vec<ConditionClass>, DatasetError> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, s)| s.condition.ok_or(DatasetError::MissingLabel(i)))
            .collect()
    }

    /// Raw feature values of every row.
    pub fn feature_matrix(&self) -> Vec<[f64; NUM_FEATURES]> {
        self.samples.iter().map(SensorSample::features).collect()
    }

    /// Number of rows per class, in label order. Unlabelled rows are not counted.
    pub fn class_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for class in self.samples.iter().filter_map(|s| s.condition) {
            counts[class.index()] += 1;
        }
        counts
    }

    /// Export to CSV file.
    pub fn to_csv(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let mut writer = csv::Writer::from_path(path)?;
        for sample in &self.samples {
            writer.serialize(DatasetRecord::from(sample))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Import from CSV file.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut samples = Vec::new();
        for (i, record) in reader.deserialize::<DatasetRecord>().enumerate() {
            samples.push(record?.into_sample(i)?);
        }
        Ok(Self { samples })
    }

    /// Export to JSON file.
    pub fn to_json(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let records: Vec<DatasetRecord> = self.samples.iter().map(DatasetRecord::from).collect();
        serde_json::to_writer_pretty(writer, &records)?;
        Ok(())
    }

    /// Import from JSON file.
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let file = File::open(path)?;
        let records: Vec<DatasetRecord> = serde_json::from_reader(BufReader::new(file))?;
        let samples = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.into_sample(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { samples })
    }

    /// Write the CSV and a `.json` twin next to it; returns the CSV path.
    pub fn save(&self, csv_path: impl AsRef<Path>) -> Result<PathBuf, DatasetError> {
        let csv_path = csv_path.as_ref();
        let json_path = csv_path.with_extension("json");

        self.to_csv(csv_path)?;
        self.to_json(&json_path)?;

        info!(
            "saved {} samples to {} and {}",
            self.len(),
            csv_path.display(),
            json_path.display()
        );
        Ok(csv_path.to_path_buf())
    }

    /// Per-class feature statistics, in label order, for classes present.
    pub fn class_stats(&self) -> Result<Vec<ClassStats>, DatasetError> {
        if self.samples.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut stats = Vec::new();
        for class in ConditionClass::ALL {
            let rows: Vec<[f64; NUM_FEATURES]> = self
                .samples
                .iter()
                .filter(|s| s.condition == Some(class))
                .map(SensorSample::features)
                .collect();
            if rows.is_empty() {
                continue;
            }

            let column = |j: usize| FeatureStats::from_values(rows.iter().map(|r| r[j]));
            stats.push(ClassStats {
                class,
                count: rows.len(),
                soil_moisture: column(0),
                temperature: column(1),
                humidity: column(2),
                audio_energy: column(3),
            });
        }

        if stats.is_empty() {
            return Err(DatasetError::MissingLabel(0));
        }
        Ok(stats)
    }

    /// Generate a human-readable statistics report.
    pub fn report(&self) -> Result<String, DatasetError> {
        let mut report = String::new();
        for s in self.class_stats()? {
            report.push_str(&format!("{} ({} samples):\n", s.class, s.count));
            report.push_str(&format!(
                "  Soil Moisture: {:.1} ± {:.1}%\n",
                s.soil_moisture.mean, s.soil_moisture.std_dev
            ));
            report.push_str(&format!(
                "  Temperature: {:.1} ± {:.1}°C\n",
                s.temperature.mean, s.temperature.std_dev
            ));
            report.push_str(&format!(
                "  Humidity: {:.1} ± {:.1}%\n",
                s.humidity.mean, s.humidity.std_dev
            ));
            report.push_str(&format!(
                "  Audio Energy: {:.3} ± {:.3}\n",
                s.audio_energy.mean, s.audio_energy.std_dev
            ));
        }
        Ok(report)
    }
}

/// Mean and sample standard deviation of one feature column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub mean: f64,
    /// Sample (n - 1) standard deviation; 0 for a single value.
    pub std_dev: f64,
}

impl FeatureStats {
    fn from_values(values: impl Iterator<Item = f64> + Clone) -> Self {
        let count = values.clone().count();
        let mean = values.clone().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let variance =
                values.map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };
        Self { mean, std_dev }
    }
}

/// Feature statistics of one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStats {
    pub class: ConditionClass,
    pub count: usize,
    pub soil_moisture: FeatureStats,
    pub temperature: FeatureStats,
    pub humidity: FeatureStats,
    pub audio_energy: FeatureStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn sample(m: f64, class: ConditionClass) -> SensorSample {
        SensorSample::new(m, 25.0, 60.0, 0.1)
            .with_condition(class)
            .with_timestamp(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_dataset_creation() {
        let dataset = FarmDataset::default();
        assert!(dataset.is_empty());
        assert_eq!(dataset.class_counts(), [0, 0, 0]);
        assert!(matches!(dataset.class_stats(), Err(DatasetError::Empty)));
    }

    #[test]
    fn test_labels_and_counts() {
        let dataset = FarmDataset::from_samples(vec![
            sample(40.0, ConditionClass::Normal),
            sample(20.0, ConditionClass::WaterStress),
            sample(21.0, ConditionClass::WaterStress),
        ]);
        assert_eq!(dataset.class_counts(), [1, 2, 0]);
        assert_eq!(
            dataset.labels().unwrap(),
            vec![
                ConditionClass::Normal,
                ConditionClass::WaterStress,
                ConditionClass::WaterStress
            ]
        );
        assert_eq!(dataset.feature_matrix()[1], [20.0, 25.0, 60.0, 0.1]);
    }

    #[test]
    fn test_missing_label() {
        let dataset = FarmDataset::from_samples(vec![
            sample(40.0, ConditionClass::Normal),
            SensorSample::new(40.0, 25.0, 60.0, 0.1),
        ]);
        assert!(matches!(dataset.labels(), Err(DatasetError::MissingLabel(1))));
    }

    #[test]
    fn test_csv_roundtrip() {
        let dataset = FarmDataset::from_samples(vec![
            sample(40.0, ConditionClass::Normal),
            sample(12.5, ConditionClass::PestRisk),
        ]);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("farm.csv");
        dataset.to_csv(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(
            "soil_moisture,temperature,humidity,audio_energy,timestamp,label,condition"
        ));
        assert!(text.contains("PestRisk"));

        let loaded = FarmDataset::from_csv(&path).unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn test_csv_invalid_label() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            "soil_moisture,temperature,humidity,audio_energy,timestamp,label,condition\n\
             40.0,25.0,60.0,0.1,,7,\n",
        )
        .unwrap();
        assert!(matches!(
            FarmDataset::from_csv(&path),
            Err(DatasetError::InvalidClass(7))
        ));
    }

    #[test]
    fn test_csv_label_condition_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            "soil_moisture,temperature,humidity,audio_energy,timestamp,label,condition\n\
             40.0,25.0,60.0,0.1,,1,PestRisk\n",
        )
        .unwrap();
        assert!(matches!(
            FarmDataset::from_csv(&path),
            Err(DatasetError::Parse { record: 0, .. })
        ));
    }

    #[test]
    fn test_save_writes_both_files() {
        let dataset = FarmDataset::from_samples(vec![sample(40.0, ConditionClass::Normal)]);
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("farm_sensor_data.csv");

        let saved = dataset.save(&csv_path).unwrap();
        assert_eq!(saved, csv_path);
        assert_eq!(FarmDataset::from_csv(&saved).unwrap(), dataset);

        let json_path = dir.path().join("farm_sensor_data.json");
        assert_eq!(FarmDataset::from_json(&json_path).unwrap(), dataset);
    }

    #[test]
    fn test_class_stats_sample_std() {
        let dataset = FarmDataset::from_samples(vec![
            sample(2.0, ConditionClass::Normal),
            sample(4.0, ConditionClass::Normal),
            sample(6.0, ConditionClass::Normal),
            sample(30.0, ConditionClass::PestRisk),
        ]);
        let stats = dataset.class_stats().unwrap();
        assert_eq!(stats.len(), 2);

        assert_eq!(stats[0].class, ConditionClass::Normal);
        assert_eq!(stats[0].count, 3);
        assert_relative_eq!(stats[0].soil_moisture.mean, 4.0);
        // n - 1 denominator
        assert_relative_eq!(stats[0].soil_moisture.std_dev, 2.0);

        assert_eq!(stats[1].class, ConditionClass::PestRisk);
        assert_relative_eq!(stats[1].soil_moisture.std_dev, 0.0);

        let report = dataset.report().unwrap();
        assert!(report.contains("Normal (3 samples)"));
    }
}
