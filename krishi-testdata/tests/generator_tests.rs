//! Integration tests for dataset generation

use chrono::{Duration, TimeZone, Utc};
use krishi::ConditionClass;
use krishi_testdata::{FarmDataGenerator, FarmDataset};
use tempfile::TempDir;

fn fixed_generator(seed: u64) -> FarmDataGenerator {
    FarmDataGenerator::new(seed).with_base_time(Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap())
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    sum / n as f64
}

#[test]
fn test_all_samples_within_bounds() {
    let mut gen = FarmDataGenerator::new(42);
    let dataset = gen.generate_balanced_dataset(500);
    assert!(dataset.samples().iter().all(|s| s.is_within_bounds()));

    for sample in gen.generate_real_time_samples(500) {
        assert!(sample.is_within_bounds());
    }
}

#[test]
fn test_balanced_dataset_shape() {
    let mut gen = fixed_generator(42);
    let dataset = gen.generate_balanced_dataset(40);

    assert_eq!(dataset.len(), 120);
    assert_eq!(dataset.class_counts(), [40, 40, 40]);

    let labels = dataset.labels().unwrap();
    assert!(labels[..40].iter().all(|c| *c == ConditionClass::Normal));
    assert!(labels[40..80].iter().all(|c| *c == ConditionClass::WaterStress));
    assert!(labels[80..].iter().all(|c| *c == ConditionClass::PestRisk));
}

#[test]
fn test_timestamps_step_back_one_hour() {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap();
    let mut gen = fixed_generator(1);
    let dataset = gen.generate_balanced_dataset(5);

    let stamps: Vec<_> = dataset
        .samples()
        .iter()
        .map(|s| s.timestamp.unwrap())
        .collect();
    assert_eq!(stamps[0], base);
    for pair in stamps.windows(2) {
        assert_eq!(pair[0] - pair[1], Duration::hours(1));
    }
}

#[test]
fn test_same_seed_same_samples() {
    let mut a = fixed_generator(42);
    let mut b = fixed_generator(42);

    assert_eq!(
        a.generate_balanced_dataset(50),
        b.generate_balanced_dataset(50)
    );

    // real-time samples carry wall-clock timestamps; compare features
    let fa: Vec<_> = a
        .generate_real_time_samples(50)
        .iter()
        .map(|s| (s.features(), s.condition))
        .collect();
    let fb: Vec<_> = b
        .generate_real_time_samples(50)
        .iter()
        .map(|s| (s.features(), s.condition))
        .collect();
    assert_eq!(fa, fb);
}

#[test]
fn test_different_seed_different_samples() {
    let a = FarmDataGenerator::new(1).generate_class_batch(ConditionClass::Normal, 10);
    let b = FarmDataGenerator::new(2).generate_class_batch(ConditionClass::Normal, 10);
    assert_ne!(a, b);
}

#[test]
fn test_class_means_follow_dataset_table() {
    let mut gen = FarmDataGenerator::new(42);
    let dataset = gen.generate_balanced_dataset(2000);
    let stats = dataset.class_stats().unwrap();

    assert!((stats[0].soil_moisture.mean - 50.0).abs() < 1.0);
    assert!((stats[1].temperature.mean - 35.0).abs() < 0.5);
    assert!((stats[2].audio_energy.mean - 0.75).abs() < 0.02);
    assert!((stats[0].soil_moisture.std_dev - 8.0).abs() < 1.0);
}

#[test]
fn test_realtime_table_differs_from_dataset_table() {
    let mut gen = FarmDataGenerator::new(42);
    let n = 2000;

    let batch = gen.generate_class_batch(ConditionClass::WaterStress, n);
    let realtime: Vec<_> = (0..n)
        .map(|_| gen.generate_single_sample(Some(ConditionClass::WaterStress)))
        .collect();

    // dataset soil moisture N(25, 6), real-time N(20, 4)
    let batch_mean = mean(batch.iter().map(|s| s.soil_moisture));
    let realtime_mean = mean(realtime.iter().map(|s| s.soil_moisture));
    assert!((batch_mean - 25.0).abs() < 1.0);
    assert!((realtime_mean - 20.0).abs() < 1.0);
}

#[test]
fn test_realtime_class_frequencies() {
    let mut gen = FarmDataGenerator::new(7);
    let samples = gen.generate_real_time_samples(10_000);

    let mut counts = [0usize; 3];
    for s in &samples {
        counts[s.condition.unwrap().index()] += 1;
    }
    let freq: Vec<f64> = counts.iter().map(|c| *c as f64 / 10_000.0).collect();

    assert!((freq[0] - 0.6).abs() < 0.03);
    assert!((freq[1] - 0.2).abs() < 0.03);
    assert!((freq[2] - 0.2).abs() < 0.03);
}

#[test]
fn test_save_and_reload_generated_dataset() {
    let mut gen = fixed_generator(42);
    let dataset = gen.generate_balanced_dataset(20);

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("farm_sensor_data.csv");
    let saved = dataset.save(&csv_path).unwrap();
    assert_eq!(saved, csv_path);

    assert_eq!(FarmDataset::from_csv(&saved).unwrap(), dataset);
    assert_eq!(
        FarmDataset::from_json(saved.with_extension("json")).unwrap(),
        dataset
    );
}
