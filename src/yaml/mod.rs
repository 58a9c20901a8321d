//! YAML parsing with source-annotated diagnostics

pub mod diagnostics;

pub use diagnostics::{parse_yaml, YamlError, YamlSyntaxError};
