//! SugarSense CLI
//!
//! Offline training plus a one-shot prediction command for smoke-testing a
//! persisted bundle.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use sugarsense::inference::{InferenceSession, RawSample, RiskModel};
use sugarsense::schema::FeatureSchema;
use sugarsense::training::{Trainer, TrainerConfig};

#[derive(Parser)]
#[command(name = "sugarsense")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Diabetes risk assessment pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on a labeled dataset and persist the artifact bundle
    Train {
        /// Labeled CSV dataset (features plus an Outcome column)
        #[arg(short, long)]
        data: PathBuf,

        /// Output bundle path
        #[arg(short, long, default_value = "models/model.json")]
        output: PathBuf,

        /// Split seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Held-out fraction for evaluation
        #[arg(long, default_value = "0.2")]
        test_fraction: f64,

        /// Classifier iteration budget
        #[arg(long, default_value = "50000")]
        max_iter: usize,

        /// Gradient descent learning rate
        #[arg(long, default_value = "0.1")]
        learning_rate: f64,

        /// L2 regularization strength
        #[arg(long, default_value = "0.01")]
        l2: f64,
    },

    /// Classify one raw sample against a persisted bundle
    Predict {
        /// Trained bundle file
        #[arg(short, long, default_value = "models/model.json")]
        model: PathBuf,

        /// JSON file mapping feature names to values
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sugarsense=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            output,
            seed,
            test_fraction,
            max_iter,
            learning_rate,
            l2,
        } => {
            let config = TrainerConfig::new()
                .with_seed(seed)
                .with_test_fraction(test_fraction)
                .with_max_iter(max_iter)
                .with_learning_rate(learning_rate)
                .with_l2(l2);
            cmd_train(&data, &output, config)?;
        }
        Commands::Predict { model, input } => {
            cmd_predict(&model, &input)?;
        }
    }

    Ok(())
}

fn cmd_train(data: &PathBuf, output: &PathBuf, config: TrainerConfig) -> anyhow::Result<()> {
    println!("{}", "SugarSense - Training".blue().bold());
    println!();

    print!("Training on {}... ", data.display());
    let start = Instant::now();
    let trainer = Trainer::new(config);
    let outcome = trainer.run(data, output)?;
    println!("{} ({:?})", "ok".green(), start.elapsed());

    println!();
    println!("{}", "Results".yellow().bold());
    println!("{}", "─".repeat(44));
    println!("{}", outcome.report);
    println!("{}", "─".repeat(44));
    println!(
        "train/test: {}/{}  bundle: {}",
        outcome.n_train,
        outcome.n_test,
        output.display()
    );

    Ok(())
}

fn cmd_predict(model_path: &PathBuf, input: &PathBuf) -> anyhow::Result<()> {
    println!("{}", "SugarSense - Prediction".blue().bold());
    println!();

    let model = Arc::new(RiskModel::load(model_path)?);
    let sample = read_sample(input)?;
    validate_ranges(model.schema(), &sample)?;

    let mut session = InferenceSession::new(model);
    let prediction = session.assess(&sample)?;

    let label = match session.risk() {
        sugarsense::inference::RiskState::High => "HIGH RISK".red().bold(),
        _ => "LOW RISK".green().bold(),
    };
    println!(
        "{}  (probability {:.3})",
        label, prediction.probability
    );

    Ok(())
}

fn read_sample(path: &PathBuf) -> anyhow::Result<RawSample> {
    let json = std::fs::read_to_string(path)?;
    let sample: RawSample = serde_json::from_str(&json)?;
    Ok(sample)
}

/// Reject values outside the schema's declared input ranges before they ever
/// reach the pipeline, mirroring the bounded inputs of the UI layer.
fn validate_ranges(schema: &FeatureSchema, sample: &RawSample) -> anyhow::Result<()> {
    for (name, value) in sample {
        if let Ok((min, max)) = schema.range_of(name) {
            if *value < min || *value > max {
                anyhow::bail!(
                    "value {} for '{}' is outside the valid range {}..={}",
                    value,
                    name,
                    min,
                    max
                );
            }
        }
    }
    Ok(())
}
