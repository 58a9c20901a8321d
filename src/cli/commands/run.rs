//! `cbench run` command - test a batch and print the report

use clap::ValueEnum;
use log::info;
use miette::Result;
use std::path::PathBuf;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::analyzer::{analyze, Report};
use crate::core::error::BenchError;
use crate::core::executor::TestExecutor;
use crate::core::Config;
use crate::entities::batch::Batch;

#[derive(clap::Args, Debug, Default)]
pub struct RunArgs {
    /// YAML batch file (default: built-in sample batch)
    #[arg(long, short = 'b')]
    pub batch: Option<PathBuf>,

    /// Random seed for a reproducible run
    #[arg(long, short = 's')]
    pub seed: Option<u64>,

    /// Minimum simulated instrument delay in milliseconds
    #[arg(long)]
    pub delay_min: Option<u64>,

    /// Maximum simulated instrument delay in milliseconds
    #[arg(long)]
    pub delay_max: Option<u64>,

    /// Abort the batch if any component takes longer than this (ms)
    #[arg(long, short = 't')]
    pub timeout: Option<u64>,

    /// Report format
    #[arg(long, short = 'f')]
    pub format: Option<OutputFormat>,
}

impl RunArgs {
    /// Command-line values as the highest-priority config layer
    fn as_config(&self) -> Config {
        Config {
            seed: self.seed,
            delay_min_ms: self.delay_min,
            delay_max_ms: self.delay_max,
            timeout_ms: self.timeout,
            default_format: None,
        }
    }
}

pub async fn run(args: RunArgs, _global: &GlobalOpts) -> Result<()> {
    let mut config = Config::load();
    config.merge(args.as_config());

    let format = resolve_format(args.format, &config)?;
    let batch = match &args.batch {
        Some(path) => Batch::load(path)?,
        None => Batch::sample()?,
    };

    let report = execute(batch, &config).await?;
    print!("{}", render(&report, format)?);

    Ok(())
}

/// Test `batch` with the executor described by `config` and analyze it
pub async fn execute(batch: Batch, config: &Config) -> Result<Report, BenchError> {
    let settings = config.executor_settings()?;

    let tested = match config.seed {
        Some(seed) => {
            info!("Using seed {}", seed);
            TestExecutor::seeded(seed, settings).run(batch).await?
        }
        None => TestExecutor::from_entropy(settings).run(batch).await?,
    };

    analyze(&tested)
}

fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> Result<OutputFormat, BenchError> {
    if let Some(format) = flag {
        return Ok(format);
    }

    match config.default_format.as_deref() {
        Some(name) => OutputFormat::from_str(name, true).map_err(|_| {
            BenchError::configuration(format!(
                "unknown default_format '{}'. Use text, json, or yaml",
                name
            ))
        }),
        None => Ok(OutputFormat::Text),
    }
}

fn render(report: &Report, format: OutputFormat) -> Result<String, BenchError> {
    match format {
        OutputFormat::Text => Ok(report.to_text()),
        OutputFormat::Json => report.to_json().map(|json| json + "\n"),
        OutputFormat::Yaml => report.to_yaml(),
    }
}
