#![warn(missing_docs)]
//! Squashbench CLI Library
//!
//! Configuration, corpus loading, the trial runner and the sweep orchestrator,
//! plus the command-line front end. Use `squashbench::run()` (or
//! `squashbench_cli::run()`) in a main function to get the full CLI.
//!
//! # Example
//!
//! ```ignore
//! fn main() {
//!     if let Err(e) = squashbench_cli::run() {
//!         eprintln!("Error: {e:#}");
//!         std::process::exit(1);
//!     }
//! }
//! ```

mod config;
mod corpus;
mod error;
mod executor;
mod planner;

pub use config::*;
pub use corpus::{Corpus, CorpusError, DirectorySource, Sample, SampleCategory, SampleSource};
pub use error::BenchError;
pub use executor::{
    ExecutionConfig, Executor, MonotonicityWarning, SweepOutcome, TrialRunner,
    aggregate_instances, build_report, build_report_meta, check_monotonicity,
    format_human_output, run_sweep,
};
pub use planner::{ExecutionPlan, build_plan, parse_algorithms};

use anyhow::Context;
use clap::{Parser, Subcommand};
use regex::Regex;
use squashbench_codec::{Algorithm, Codec, CodecOptions, build_codec};
use squashbench_report::{
    JsonFileSink, OutputFormat, generate_csv_report, generate_json_report,
};
use std::path::PathBuf;
use std::time::Duration;

/// Squashbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "squashbench")]
#[command(
    author,
    version,
    about = "Squashbench - compression ratio and CPU time across codecs and levels"
)]
pub struct Cli {
    /// Optional subcommand (List, Run, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter sample categories by regex pattern
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Algorithms to run, comma separated (default: all)
    #[arg(long, value_delimiter = ',')]
    pub algorithms: Vec<String>,

    /// Terminal output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Path of the JSON report (default: results/results.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (default: discover squash.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the sample files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Exact number of numbered instances per category
    #[arg(long)]
    pub instances: Option<usize>,

    /// Rounds per (sample, algorithm, level)
    #[arg(long, short = 'n')]
    pub rounds: Option<usize>,

    /// Deadline for one codec invocation (e.g. "60s", "2m")
    #[arg(long)]
    pub timeout: Option<String>,

    /// Time LZMH by its self-reported encoding time
    #[arg(long)]
    pub reported_time: bool,

    /// Add host and run metadata to the report
    #[arg(long)]
    pub metadata: bool,

    /// Dry run - print the plan without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output (per-round debug logs)
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the sweep plan
    List,
    /// Run the sweep (default)
    Run,
    /// Write a default squash.toml to the current directory
    Init,
}

/// Run the Squashbench CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or the first fatal error of the sweep.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the Squashbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    if matches!(cli.command, Some(Commands::Init)) {
        return write_default_config();
    }

    let config = load_config(&cli)?;
    let plan = resolve_plan(&cli, &config)?;

    match cli.command {
        Some(Commands::List) => list_plan(&plan, &build_source(&cli, &config)),
        Some(Commands::Run) => run_benchmarks(&cli, &config, &plan)?,
        Some(Commands::Init) => {}
        None => {
            if cli.dry_run {
                list_plan(&plan, &build_source(&cli, &config));
            } else {
                run_benchmarks(&cli, &config, &plan)?;
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "squashbench=debug"
    } else {
        "squashbench=info"
    };
    // Already installed when run twice in one process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn write_default_config() -> anyhow::Result<()> {
    let path = PathBuf::from("squash.toml");
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    std::fs::write(&path, SquashConfig::default_toml())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Explicit --config wins; otherwise discover squash.toml, else defaults.
fn load_config(cli: &Cli) -> anyhow::Result<SquashConfig> {
    match &cli.config {
        Some(path) => SquashConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(SquashConfig::discover().unwrap_or_default()),
    }
}

/// Filter categories and algorithms: CLI flags first, then squash.toml.
fn resolve_plan(cli: &Cli, config: &SquashConfig) -> anyhow::Result<ExecutionPlan> {
    let filter = Regex::new(&cli.filter)
        .with_context(|| format!("invalid category filter '{}'", cli.filter))?;

    let names: Option<&[String]> = if cli.algorithms.is_empty() {
        config.runner.algorithms.as_deref()
    } else {
        Some(cli.algorithms.as_slice())
    };
    let algorithms = names
        .map(parse_algorithms)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    Ok(build_plan(
        &config.corpus.categories,
        Some(&filter),
        algorithms.as_deref(),
    ))
}

fn list_plan(plan: &ExecutionPlan, source: &DirectorySource) {
    println!("Squashbench Plan:");
    println!("├── corpus: {}", source.directory().display());
    let mut samples = 0;
    for category in &plan.categories {
        match source.load_category(category) {
            Ok(instances) => {
                samples += instances.len();
                println!("│   ├── {} ({} instances)", category, instances.len());
            }
            Err(e) => println!("│   ├── {} (unavailable: {})", category, e),
        }
    }
    println!("├── algorithms:");
    let mut units_per_sample = 0;
    for algorithm in &plan.algorithms {
        let levels = algorithm.levels();
        units_per_sample += levels.clone().count();
        println!(
            "│   ├── {} (levels {}-{})",
            algorithm,
            levels.start(),
            levels.end()
        );
    }
    println!(
        "{} categories, {} algorithms, {} units.",
        plan.categories.len(),
        plan.algorithms.len(),
        samples * units_per_sample
    );
}

/// Sample source from squash.toml, with CLI overrides.
fn build_source(cli: &Cli, config: &SquashConfig) -> DirectorySource {
    let directory = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.corpus.directory));
    DirectorySource::new(directory, config.corpus.extension.clone())
        .with_instances(cli.instances.or(config.corpus.instances))
}

/// Build an ExecutionConfig by layering: squash.toml defaults → CLI overrides.
fn build_execution_config(cli: &Cli, config: &SquashConfig) -> ExecutionConfig {
    ExecutionConfig {
        rounds: cli.rounds.unwrap_or(config.runner.rounds),
        monotonicity_tolerance: config.runner.monotonicity_tolerance,
        show_progress: !cli.no_progress && !cli.verbose,
    }
}

fn resolve_timeout(cli: &Cli, config: &SquashConfig) -> anyhow::Result<Duration> {
    let raw = cli.timeout.as_deref().unwrap_or(&config.runner.timeout);
    let timeout = SquashConfig::parse_duration(raw)?;
    if timeout.is_zero() {
        anyhow::bail!("timeout must be greater than zero");
    }
    Ok(timeout)
}

fn build_codecs(
    plan: &ExecutionPlan,
    cli: &Cli,
    config: &SquashConfig,
    timeout: Duration,
) -> Vec<Box<dyn Codec>> {
    let timing = if cli.reported_time {
        squashbench_codec::TimingSource::Reported
    } else {
        config.lzmh.timing_source()
    };

    plan.algorithms
        .iter()
        .map(|&algorithm: &Algorithm| {
            let options = CodecOptions {
                timeout,
                binary: Some(resolve_binary(algorithm, config)),
                timing,
                scratch_dir: config.lzmh.scratch_dir.clone(),
            };
            build_codec(algorithm, &options)
        })
        .collect()
}

/// Configured override for `algorithm`, else its default program.
fn resolve_binary(algorithm: Algorithm, config: &SquashConfig) -> PathBuf {
    config
        .tools
        .binary_for(algorithm)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(algorithm.default_binary()))
}

fn run_benchmarks(cli: &Cli, config: &SquashConfig, plan: &ExecutionPlan) -> anyhow::Result<()> {
    if plan.is_empty() {
        println!("No categories or algorithms selected.");
        return Ok(());
    }

    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(&config.output.format)
        .parse()
        .map_err(anyhow::Error::msg)?;
    let timeout = resolve_timeout(cli, config)?;
    let exec_config = build_execution_config(cli, config);
    let rounds = exec_config.rounds;
    let executor = Executor::new(exec_config)?;

    let source = build_source(cli, config);
    let corpus = Corpus::load(&source, &plan.categories)?;

    let codecs = build_codecs(plan, cli, config, timeout);
    tracing::info!(
        categories = plan.categories.len(),
        samples = corpus.sample_count(),
        algorithms = plan.algorithms.len(),
        rounds,
        "starting sweep"
    );

    let meta = (cli.metadata || config.output.metadata).then(|| {
        let tools: Vec<_> = plan
            .algorithms
            .iter()
            .map(|&algorithm| (algorithm, resolve_binary(algorithm, config)))
            .collect();
        build_report_meta(rounds, timeout, &tools)
    });
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.path));
    let mut sink = JsonFileSink::new(output_path);

    let outcome = run_sweep(&executor, &corpus, &codecs, &mut sink, meta)?;
    tracing::info!(path = %sink.path().display(), "report written");

    let output = match format {
        OutputFormat::Json => generate_json_report(&outcome.report)?,
        OutputFormat::Csv => generate_csv_report(&outcome.report.table),
        OutputFormat::Human => format_human_output(&outcome.report, &outcome.warnings),
    };
    print!("{}", output);

    Ok(())
}
