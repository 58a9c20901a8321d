//! Core module - executor, analysis and supporting types

pub mod analyzer;
pub mod config;
pub mod error;
pub mod executor;
pub mod report;
pub mod sampler;

pub use analyzer::{analyze, classify, ComponentResult, Report, Summary, Verdict};
pub use config::Config;
pub use error::BenchError;
pub use executor::{ExecutorSettings, TestExecutor};
pub use sampler::{DelayRange, FixedSampler, RandomSampler, Sampler, ScriptedSampler};
