#![warn(missing_docs)]
//! BenchCheck CLI Library
//!
//! Command-line front end for the validator: reads a dataset from disk,
//! layers `benchcheck.toml` and command-line flags into validator settings,
//! runs the validation and writes the report.
//!
//! # Example
//!
//! ```ignore
//! fn main() {
//!     if let Err(e) = benchcheck_cli::run() {
//!         eprintln!("Error: {e}");
//!         std::process::exit(2);
//!     }
//! }
//! ```

mod config;
mod formatting;
mod loader;

pub use config::*;
pub use formatting::{format_human_output, format_power_line};
pub use loader::{load_records, parse_json, read_csv};

use anyhow::Context;
use benchcheck_logic::{ComparisonRequest, PowerRequest, Validator};
use benchcheck_report::{
    Outcome, OutputFormat, PowerOutcome, ValidationReport, generate_json_report,
};
use benchcheck_stats::{PowerMethod, power_with, required_sample_size};
use clap::{Parser, Subcommand};
use rayon::ThreadPoolBuilder;
use std::io::Write;
use std::path::PathBuf;

/// Exit code for a report whose assessment is FAILED
pub const EXIT_ASSESSMENT_FAILED: i32 = 1;

/// BenchCheck CLI arguments
#[derive(Parser, Debug)]
#[command(name = "benchcheck")]
#[command(author, version, about = "BenchCheck - statistical validation of benchmark datasets")]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a dataset and report intervals, effect sizes and power
    Validate(ValidateArgs),
    /// Compute statistical power for one effect size and sample size
    Power(PowerArgs),
    /// Print a default benchcheck.toml
    Init,
}

/// Arguments of `benchcheck validate`
#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Dataset to validate (.csv or .json)
    #[arg(name = "INPUT")]
    pub input: PathBuf,

    /// Output format: json, human
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Abort on the first invalid row
    #[arg(long)]
    pub strict: bool,

    /// Confidence level for every interval
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Cohen's d between two groups: GROUP_A::GROUP_B::metric (repeatable)
    #[arg(long = "compare", value_name = "A::B::METRIC")]
    pub compare: Vec<String>,

    /// Power for an effect size and sample size: d:n (repeatable)
    #[arg(long = "power", value_name = "D:N")]
    pub power: Vec<String>,

    /// Also require throughput ≈ batch_size / latency
    #[arg(long)]
    pub check_throughput_latency: bool,

    /// Number of threads for checks and estimation
    /// 0 = use all available cores, 1 = single-threaded
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// Explicit configuration file (skips discovery)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Arguments of `benchcheck power`
#[derive(clap::Args, Debug)]
pub struct PowerArgs {
    /// Standardized effect size (Cohen's d)
    #[arg(long)]
    pub effect: f64,

    /// Number of observations
    #[arg(long)]
    pub samples: usize,

    /// Significance level
    #[arg(long, default_value = "0.05")]
    pub alpha: f64,

    /// One-sided test
    #[arg(long)]
    pub one_sided: bool,

    /// Also report the smallest sample size reaching this power
    #[arg(long)]
    pub target: Option<f64>,
}

/// Run the BenchCheck CLI with the process arguments.
///
/// Exits the process with [`EXIT_ASSESSMENT_FAILED`] when a validation
/// completes but its assessment is FAILED.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the BenchCheck CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    let filter = if cli.verbose {
        "benchcheck=debug"
    } else {
        "benchcheck=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate(args) => {
            let report = validate(&args)?;
            if !report.is_passed() {
                eprintln!(
                    "\nAssessment {}: consistency {:.2}% over {} records",
                    report.assessment.status,
                    report.assessment.consistency_rate,
                    report.summary.total_records
                );
                std::process::exit(EXIT_ASSESSMENT_FAILED);
            }
        }
        Commands::Power(args) => {
            print!("{}", power_command(&args)?);
        }
        Commands::Init => {
            print!("{}", BenchCheckConfig::default_toml());
        }
    }

    Ok(())
}

/// Load configuration, validate the dataset and write the report
pub fn validate(args: &ValidateArgs) -> anyhow::Result<ValidationReport> {
    // Discover benchcheck.toml configuration (CLI flags override)
    let config = match &args.config {
        Some(path) => BenchCheckConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => BenchCheckConfig::discover().unwrap_or_default(),
    };

    let format: OutputFormat = args
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(anyhow::Error::msg)?;

    // Configure Rayon thread pool for checks and estimation
    let threads = args.threads.unwrap_or(config.runner.threads);
    if threads > 0 {
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .ok();
    }

    let mut options = config.validator_options();
    if args.strict {
        options.load_mode = benchcheck_core::LoadMode::Strict;
    }
    if let Some(level) = args.confidence {
        options.confidence_level = level;
    }
    if args.check_throughput_latency {
        options.policy.check_throughput_latency = true;
    }
    options.parallel = threads != 1;

    let mut request = config.request();
    for arg in &args.compare {
        request = request.compare(arg.parse::<ComparisonRequest>()?);
    }
    for arg in &args.power {
        let p: PowerRequest = arg.parse()?;
        request = request.power(p.effect_size, p.sample_size);
    }

    let rows = load_records(&args.input)?;
    tracing::info!(rows = rows.len(), input = %args.input.display(), "validating dataset");

    let mut validator = Validator::new(options).with_request(request);
    let report = validator.run(rows)?;

    let output = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Human => format_human_output(&report),
    };

    // Write output
    if let Some(ref path) = args.output {
        let path = config.output.resolve(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    Ok(report)
}

/// Text output of `benchcheck power`
pub fn power_command(args: &PowerArgs) -> anyhow::Result<String> {
    let two_sided = !args.one_sided;
    let estimate = power_with(
        args.effect,
        args.samples,
        args.alpha,
        two_sided,
        PowerMethod::NoncentralT,
    )?;

    let mut output = format_power_line(&PowerOutcome {
        effect_size: args.effect,
        sample_size: args.samples,
        result: Outcome::Ok(estimate),
    });
    output.push('\n');

    if let Some(target) = args.target {
        let n = required_sample_size(args.effect, args.alpha, target, two_sided)?;
        output.push_str(&format!(
            "smallest n reaching {:.1}% power: {}\n",
            target * 100.0,
            n
        ));
    }

    Ok(output)
}
