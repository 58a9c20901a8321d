//! Report rendering

use std::fmt;

use crate::core::analyzer::{ComponentResult, Report, Summary};
use crate::core::error::BenchError;

impl fmt::Display for ComponentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Component: {}, Nominal: {}, Actual: {:.2}, Result: {}",
            self.kind, self.nominal, self.actual, self.verdict
        )
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Batch Summary:")?;
        writeln!(
            f,
            "Total: {}, Pass: {}, Fail: {}",
            self.total, self.passed, self.failed
        )?;
        match self.yield_percent {
            Some(pct) => write!(f, "Yield: {:.2}%", pct),
            None => write!(f, "Yield: N/A"),
        }
    }
}

/// Plain-text console report, one line per component followed by the summary
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "{}", result)?;
        }
        write!(f, "{}", self.summary)
    }
}

impl Report {
    pub fn to_text(&self) -> String {
        format!("{}\n", self)
    }

    pub fn to_json(&self) -> Result<String, BenchError> {
        serde_json::to_string_pretty(self).map_err(|e| BenchError::Serialize(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, BenchError> {
        serde_yml::to_string(self).map_err(|e| BenchError::Serialize(e.to_string()))
    }
}
