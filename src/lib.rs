//! Component Bench
//!
//! Simulates testing a batch of electronic components concurrently: each
//! component's nominal value is perturbed by a random amount within its
//! tolerance after a random instrument delay, and the batch is reported as
//! pass/fail with an overall yield.

pub mod cli;
pub mod core;
pub mod entities;
pub mod yaml;
