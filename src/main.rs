use abstat::bayesian::{BayesianEstimate, MetricRole};
use abstat::cli::{
    variant_label, BayesArgs, Cli, ClassifyArgs, Command, OutputFormat, ProjectArgs, SrmArgs,
};
use abstat::experiment::screen_sample_ratios;
use abstat::projection::{project_completion, ProjectionInput};
use abstat::{AnalysisConfig, BinomialSample, CellClass};
use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load the configuration file if one was given, defaults otherwise
fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct BayesOutput {
    #[serde(flatten)]
    estimate: BayesianEstimate,
    class: CellClass,
    role: MetricRole,
}

fn run_bayes(args: &BayesArgs, config: &AnalysisConfig, format: OutputFormat) -> Result<()> {
    let control = BinomialSample::new(args.control_visits, args.control_conversions);
    let variant = BinomialSample::new(args.variant_visits, args.variant_conversions);
    let estimator = config.estimator();

    let estimate = match args.seed {
        Some(seed) => {
            estimator.estimate_with_rng(&control, &variant, &mut StdRng::seed_from_u64(seed))
        }
        None => estimator.estimate(&control, &variant),
    };

    let role = MetricRole::from_is_primary(!args.secondary);
    let class = config.thresholds(role).classify(estimate.probability);

    match format {
        OutputFormat::Json => print_json(&BayesOutput {
            estimate,
            class,
            role,
        }),
        OutputFormat::Text => {
            println!(
                "P(variant > control): {:.4} ({:.2}%)",
                estimate.probability,
                estimate.probability * 100.0
            );
            println!("Method: {}", estimate.method.as_str());
            println!("Class: {}", class);
            Ok(())
        }
    }
}

fn run_srm(args: &SrmArgs, config: &AnalysisConfig, format: OutputFormat) -> Result<()> {
    let detector = config.srm_detector();

    if let [variant] = args.variants.as_slice() {
        let analysis = detector.analyze(args.control, *variant);
        return match format {
            OutputFormat::Json => print_json(&analysis),
            OutputFormat::Text => {
                print!("{}", analysis.to_report_string());
                Ok(())
            }
        };
    }

    let variants: Vec<(String, u64)> = args
        .variants
        .iter()
        .enumerate()
        .map(|(i, visits)| (variant_label(i), *visits))
        .collect();
    let screening = screen_sample_ratios(args.control, &variants, &detector);

    match format {
        OutputFormat::Json => print_json(&screening),
        OutputFormat::Text => {
            print!("{}", screening.to_report_string());
            Ok(())
        }
    }
}

fn run_classify(args: &ClassifyArgs, config: &AnalysisConfig, format: OutputFormat) -> Result<()> {
    if !(0.0..=1.0).contains(&args.probability) {
        anyhow::bail!(
            "Invalid value for --probability: {} (must be in [0, 1])",
            args.probability
        );
    }

    let role = MetricRole::from_is_primary(!args.secondary);
    let class = config.thresholds(role).classify(args.probability);

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "probability": args.probability,
            "role": role,
            "class": class,
        })),
        OutputFormat::Text => {
            println!("{}", class);
            Ok(())
        }
    }
}

fn run_project(args: &ProjectArgs, format: OutputFormat) -> Result<()> {
    let input = ProjectionInput {
        start_date: args.start,
        today: args
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        arm_visits: args.visits.clone(),
        target_sample_size: args.target,
    };
    let projection = project_completion(&input).context("Failed to project completion")?;

    match format {
        OutputFormat::Json => print_json(&projection),
        OutputFormat::Text => {
            print!("{}", projection.to_report_string());
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = load_config(&args)?;

    match &args.command {
        Command::Bayes(bayes) => run_bayes(bayes, &config, args.format),
        Command::Srm(srm) => run_srm(srm, &config, args.format),
        Command::Classify(classify) => run_classify(classify, &config, args.format),
        Command::Project(project) => run_project(project, args.format),
    }
}
