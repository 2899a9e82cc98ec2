//! CLI argument parsing for abstat

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "abstat")]
#[command(version)]
#[command(about = "Bayesian win probability and sample ratio mismatch checks for A/B tests", long_about = None)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Analysis configuration file (TOML)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Probability that the variant's conversion rate beats control's
    Bayes(BayesArgs),
    /// Sample ratio mismatch check against a 50/50 split
    Srm(SrmArgs),
    /// Classify a probability into a traffic-light category
    Classify(ClassifyArgs),
    /// Project when an experiment reaches its target sample size
    Project(ProjectArgs),
}

#[derive(Args, Debug)]
pub struct BayesArgs {
    /// Control arm visits
    #[arg(long = "control-visits", value_name = "N")]
    pub control_visits: u64,

    /// Control arm conversions
    #[arg(long = "control-conversions", value_name = "N")]
    pub control_conversions: u64,

    /// Variant arm visits
    #[arg(long = "variant-visits", value_name = "N")]
    pub variant_visits: u64,

    /// Variant arm conversions
    #[arg(long = "variant-conversions", value_name = "N")]
    pub variant_conversions: u64,

    /// Classify as a secondary metric (stricter thresholds)
    #[arg(long = "secondary")]
    pub secondary: bool,

    /// Seed for reproducible Monte Carlo estimates
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SrmArgs {
    /// Control arm visits
    #[arg(long = "control", value_name = "N")]
    pub control: u64,

    /// Variant arm visits (repeat for multi-variant experiments)
    #[arg(long = "variant", value_name = "N", required = true)]
    pub variants: Vec<u64>,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Probability in [0, 1]
    #[arg(long = "probability", value_name = "P")]
    pub probability: f64,

    /// Use secondary-metric thresholds
    #[arg(long = "secondary")]
    pub secondary: bool,
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Experiment start date (YYYY-MM-DD)
    #[arg(long = "start", value_name = "DATE")]
    pub start: NaiveDate,

    /// Reference date (YYYY-MM-DD, default: today)
    #[arg(long = "today", value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Visits per arm so far (comma-separated or repeated)
    #[arg(long = "visits", value_name = "N", value_delimiter = ',', required = true)]
    pub visits: Vec<u64>,

    /// Target sample size per arm
    #[arg(long = "target", value_name = "N")]
    pub target: Option<u64>,
}

/// Variant labels in dashboard order: B, C, D, ... (control is A)
pub fn variant_label(index: usize) -> String {
    match index {
        0..=24 => format!("Variant-{}", (b'B' + index as u8) as char),
        _ => format!("Variant-{}", index + 2),
    }
}
