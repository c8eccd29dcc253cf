// KrishiRakshak Edge - Inference simulator CLI
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # krishi-edge
//!
//! Command-line front end for dataset generation and the edge simulator.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a balanced training dataset
//! krishi-edge generate --samples-per-class 1000 --output farm_sensor_data.csv
//!
//! # Two minutes of real-time simulation at 5 s intervals
//! krishi-edge simulate --duration-secs 120 --interval-secs 5
//!
//! # Benchmark a saved model
//! krishi-edge --model model.json benchmark --iterations 1000
//!
//! # Full demo: simulation, benchmark, report
//! krishi-edge run
//! ```

use clap::{Parser, Subcommand};
use krishi_edge::{EdgeSimulator, SimulatorConfig, SimulatorError};
use krishi_testdata::FarmDataGenerator;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// KrishiRakshak edge inference simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generator seed (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Saved model to load instead of training the default classifier
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Save the trained default classifier to this path
    #[arg(long, global = true)]
    save_model: Option<PathBuf>,

    /// Simulator configuration (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a balanced labelled dataset (CSV + JSON)
    Generate {
        /// Samples per condition class
        #[arg(long, default_value = "1000")]
        samples_per_class: usize,

        /// CSV output path; the JSON file is written next to it
        #[arg(short, long, default_value = "farm_sensor_data.csv")]
        output: PathBuf,
    },

    /// Run the real-time simulation loop
    Simulate {
        /// Total simulated time in seconds
        #[arg(long, default_value = "120")]
        duration_secs: f64,

        /// Seconds between samples
        #[arg(long, default_value = "5")]
        interval_secs: f64,

        /// Write the simulation report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Benchmark back-to-back inference latency
    Benchmark {
        /// Number of inferences
        #[arg(short = 'n', long, default_value = "100")]
        iterations: usize,

        /// Write the simulation report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Simulation, benchmark and report in one go
    Run {
        /// Report output path
        #[arg(long, default_value = "simulation_report.json")]
        report: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("KrishiRakshak Edge v{}", env!("CARGO_PKG_VERSION"));

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> krishi_edge::Result<()> {
    let config = load_config(args)?;

    match &args.command {
        Command::Generate {
            samples_per_class,
            output,
        } => {
            let mut generator = FarmDataGenerator::new(config.seed);
            let dataset = generator.generate_balanced_dataset(*samples_per_class);
            let csv_path = dataset.save(output)?;

            println!(
                "Generated {} samples -> {}, {}",
                dataset.len(),
                csv_path.display(),
                csv_path.with_extension("json").display()
            );
            println!("\nDataset Statistics:");
            print!("{}", dataset.report()?);
        }
        Command::Simulate {
            duration_secs,
            interval_secs,
            report,
        } => {
            let mut simulator = build_simulator(args, config)?;
            let summary = simulator
                .simulate_real_time(seconds(*duration_secs)?, seconds(*interval_secs)?)?;
            println!("\nSimulation Summary:");
            print!("{}", summary.report());
            if let Some(path) = report {
                simulator.save_report(path)?;
            }
        }
        Command::Benchmark { iterations, report } => {
            let mut simulator = build_simulator(args, config)?;
            let results = simulator.benchmark(*iterations)?;
            println!("\nBenchmark Results:");
            print!("{}", results.report());
            if let Some(path) = report {
                simulator.save_report(path)?;
            }
        }
        Command::Run { report } => {
            let mut simulator = build_simulator(args, config)?;

            let summary =
                simulator.simulate_real_time(Duration::from_secs(120), Duration::from_secs(5))?;
            println!("\nSimulation Summary:");
            print!("{}", summary.report());

            let results = simulator.benchmark(100)?;
            println!("\nBenchmark Results:");
            print!("{}", results.report());

            let exported = simulator.save_report(report)?;
            println!(
                "\nHardware compatibility: {:.4} ms of {:.1} ms target ({})",
                exported.hardware_compatibility.achieved_inference_time_ms,
                exported.hardware_compatibility.target_inference_time_ms,
                if exported.hardware_compatibility.meets_requirements {
                    "meets requirements"
                } else {
                    "too slow"
                }
            );
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> krishi_edge::Result<SimulatorConfig> {
    let mut config = match &args.config {
        Some(path) => SimulatorConfig::from_json_file(path)?,
        None => SimulatorConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn build_simulator(args: &Args, config: SimulatorConfig) -> krishi_edge::Result<EdgeSimulator> {
    let mut simulator = EdgeSimulator::new(config)?;

    // Ctrl-C stops the real-time loop before the next sample
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Shutdown signal received...");
        flag.store(true, Ordering::SeqCst);
    }) {
        warn!("Cannot install Ctrl-C handler: {}", e);
    }
    simulator.set_cancel_flag(cancel);

    let summary = match (&args.model, &args.save_model) {
        (Some(path), _) => {
            simulator.load_model(path)?;
            None
        }
        (None, Some(path)) => {
            let (network, summary) = simulator.train_default_network()?;
            network.save(path)?;
            simulator.load_classifier(network);
            Some(summary)
        }
        (None, None) => Some(simulator.train_default_classifier()?),
    };
    if let Some(summary) = summary {
        info!(
            "Default classifier trained: accuracy {:.1}%",
            summary.final_accuracy * 100.0
        );
    }

    if let Some(info) = simulator.model_info() {
        info!(
            "Model: {} inputs, {} classes, {} parameters",
            info.input_size, info.output_size, info.parameter_count
        );
    }

    Ok(simulator)
}

fn seconds(value: f64) -> krishi_edge::Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| SimulatorError::InvalidConfig(format!("duration {}: {}", value, e)))
}
