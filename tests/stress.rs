//! Stress tests for the inference core
//!
//! Run with: cargo test --release stress -- --ignored

use krishi::*;
use std::time::Instant;

fn sample(i: usize) -> SensorSample {
    let t = i as f64;
    SensorSample::new(
        50.0 + (t * 0.01).sin() * 40.0,
        30.0 + (t * 0.003).cos() * 15.0,
        60.0 + (t * 0.007).sin() * 35.0,
        ((t * 0.05).sin() + 1.0) / 2.0,
    )
}

#[test]
#[ignore] // Run manually with --ignored
fn stress_test_prediction() {
    let network = FeedForwardNetwork::default();
    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        let probabilities = network.predict(&preprocess(&sample(i))).unwrap();
        let result = InferenceResult::from_probabilities(probabilities, 0.0, chrono::Utc::now())
            .unwrap();
        let _status = alert_policy(&result);
    }

    let elapsed = start.elapsed();
    let rate = iterations as f64 / elapsed.as_secs_f64();

    println!("Classified {} samples in {:?}", iterations, elapsed);
    println!("Rate: {:.0} inferences/second", rate);

    // 50 ms latency target
    assert!(
        rate > 20.0,
        "Should classify at least 20 samples/s, got {:.0}",
        rate
    );
}

#[test]
#[ignore]
fn stress_test_latency_history() {
    let mut history = LatencyHistory::new();
    let iterations = 1_000_000;
    let start = Instant::now();

    for i in 0..iterations {
        history.record((i % 1000) as f64 * 0.001);
    }
    let stats = history.stats().unwrap();

    let elapsed = start.elapsed();
    println!(
        "Recorded and summarised {} latencies in {:?}",
        iterations, elapsed
    );
    println!("{}", stats.report());

    assert_eq!(stats.count, iterations);
    assert!(stats.p95_ms <= stats.p99_ms);
}

#[test]
#[ignore]
fn stress_test_training() {
    let features: Vec<FeatureVector> = (0..3000).map(|i| preprocess(&sample(i))).collect();
    let labels: Vec<ConditionClass> = features
        .iter()
        .map(|f| {
            if f[3] > 0.6 {
                ConditionClass::PestRisk
            } else if f[0] < 0.3 {
                ConditionClass::WaterStress
            } else {
                ConditionClass::Normal
            }
        })
        .collect();

    let mut network = FeedForwardNetwork::new(TrainingConfig::default().with_epochs(5));
    let start = Instant::now();
    let summary = network.train(&features, &labels).unwrap();
    let elapsed = start.elapsed();

    println!("Trained on {} samples in {:?}", summary.samples, elapsed);
    println!(
        "Final loss {:.4}, accuracy {:.1}%",
        summary.final_loss,
        summary.final_accuracy * 100.0
    );

    assert!(summary.final_loss.is_finite());
}
