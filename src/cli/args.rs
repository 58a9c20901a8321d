//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, run::RunArgs,
};

#[derive(Parser)]
#[command(name = "cbench")]
#[command(author, version, about = "Component Bench")]
#[command(long_about = "Simulated concurrent pass/fail testing of electronic component batches.\n\nRuns the built-in sample batch when no command is given.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Only log errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log progress and per-component draws to stderr
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Test a batch of components and print the report
    Run(RunArgs),

    /// Print the built-in sample batch as YAML
    Sample,

    /// Configuration inspection
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain-text console report
    #[default]
    Text,
    /// JSON format (for programming)
    Json,
    /// YAML format (full fidelity)
    Yaml,
}
