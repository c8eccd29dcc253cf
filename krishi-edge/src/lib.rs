//! # KrishiRakshak Edge
//!
//! Simulation of the edge device loop: generate a reading, classify it,
//! apply the alert policy, record latency, report against the hardware
//! target.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use krishi_edge::{EdgeSimulator, SimulatorConfig};
//! use std::time::Duration;
//!
//! let mut simulator = EdgeSimulator::new(SimulatorConfig::default()).unwrap();
//! simulator.train_default_classifier().unwrap();
//!
//! let summary = simulator
//!     .simulate_real_time(Duration::from_secs(120), Duration::from_secs(5))
//!     .unwrap();
//! println!("{}", summary.report());
//!
//! let results = simulator.benchmark(100).unwrap();
//! println!("{}", results.report());
//!
//! simulator.save_report("simulation_report.json").unwrap();
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod simulator;

pub use config::SimulatorConfig;
pub use error::{Result, SimulatorError};
pub use report::{HardwareCompatibility, PerformanceMetrics, SimulationReport};
pub use simulator::{BenchmarkResults, EdgeSimulator, SimulationSummary};
