//! Result analysis - pass/fail classification and batch yield

use serde::{Deserialize, Serialize};

use crate::core::error::BenchError;
use crate::entities::component::{ComponentKind, TestedComponent};

/// Outcome of a single component test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// Classify a tested component against its tolerance band (inclusive)
pub fn classify(tested: &TestedComponent) -> Verdict {
    if tested.passes() {
        Verdict::Pass
    } else {
        Verdict::Fail
    }
}

/// Analysis of one tested component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentResult {
    pub kind: ComponentKind,
    pub nominal: f64,
    pub tolerance: f64,
    pub actual: f64,

    /// Signed measured - nominal
    pub deviation: f64,

    pub verdict: Verdict,
}

impl From<&TestedComponent> for ComponentResult {
    fn from(tested: &TestedComponent) -> Self {
        Self {
            kind: tested.kind(),
            nominal: tested.nominal(),
            tolerance: tested.tolerance(),
            actual: tested.actual(),
            deviation: tested.deviation(),
            verdict: classify(tested),
        }
    }
}

/// Aggregate counts for a batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,

    /// Percentage of components that passed; `None` for an empty batch
    pub yield_percent: Option<f64>,
}

impl Summary {
    pub fn from_results(results: &[ComponentResult]) -> Self {
        let total = results.len();
        let passed = results
            .iter()
            .filter(|r| r.verdict == Verdict::Pass)
            .count();
        let yield_percent = if total == 0 {
            None
        } else {
            Some(passed as f64 / total as f64 * 100.0)
        };

        Self {
            total,
            passed,
            failed: total - passed,
            yield_percent,
        }
    }
}

/// Per-component results plus the batch summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub results: Vec<ComponentResult>,
    pub summary: Summary,
}

impl Report {
    /// Build a report for any batch, including an empty one
    pub fn from_tested(tested: &[TestedComponent]) -> Self {
        let results: Vec<ComponentResult> = tested.iter().map(ComponentResult::from).collect();
        let summary = Summary::from_results(&results);
        Self { results, summary }
    }
}

/// Analyze a tested batch, refusing an empty one
pub fn analyze(tested: &[TestedComponent]) -> Result<Report, BenchError> {
    if tested.is_empty() {
        return Err(BenchError::EmptyBatch);
    }
    Ok(Report::from_tested(tested))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::component::Component;

    fn tested(kind: ComponentKind, nominal: f64, tolerance: f64, actual: f64) -> TestedComponent {
        Component::new(kind, nominal, tolerance)
            .unwrap()
            .into_tested(actual)
    }

    #[test]
    fn test_all_pass_yields_100_percent() {
        let batch = vec![
            tested(ComponentKind::Resistor, 100.0, 0.05, 101.0),
            tested(ComponentKind::Capacitor, 10.0, 0.1, 9.5),
            tested(ComponentKind::Inductor, 1.0, 0.05, 1.0),
            tested(ComponentKind::Transistor, 50.0, 0.1, 54.0),
        ];

        let report = analyze(&batch).unwrap();
        assert_eq!(report.summary.total, 4);
        assert_eq!(report.summary.passed, 4);
        assert_eq!(report.summary.failed, 0);
        assert_eq!(report.summary.yield_percent, Some(100.0));
    }

    #[test]
    fn test_half_fail_yields_50_percent() {
        let batch = vec![
            tested(ComponentKind::Resistor, 100.0, 0.05, 106.0),
            tested(ComponentKind::Capacitor, 10.0, 0.1, 9.5),
            tested(ComponentKind::Inductor, 1.0, 0.05, 0.9),
            tested(ComponentKind::Transistor, 50.0, 0.1, 54.0),
        ];

        let report = analyze(&batch).unwrap();
        assert_eq!(report.summary.passed, 2);
        assert_eq!(report.summary.failed, 2);
        assert_eq!(report.summary.yield_percent, Some(50.0));
        assert_eq!(report.results[0].verdict, Verdict::Fail);
        assert_eq!(report.results[1].verdict, Verdict::Pass);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let on_edge = tested(ComponentKind::Resistor, 100.0, 0.05, 105.0);
        assert_eq!(classify(&on_edge), Verdict::Pass);

        let over = tested(ComponentKind::Resistor, 100.0, 0.05, 105.001);
        assert_eq!(classify(&over), Verdict::Fail);
    }

    #[test]
    fn test_empty_batch_summary_has_no_yield() {
        let report = Report::from_tested(&[]);
        assert_eq!(report.summary.total, 0);
        assert_eq!(report.summary.passed, 0);
        assert_eq!(report.summary.failed, 0);
        assert_eq!(report.summary.yield_percent, None);
    }

    #[test]
    fn test_analyze_rejects_empty_batch() {
        assert!(matches!(analyze(&[]), Err(BenchError::EmptyBatch)));
    }

    #[test]
    fn test_component_result_records_deviation() {
        let result = ComponentResult::from(&tested(ComponentKind::Transistor, 50.0, 0.1, 47.5));
        assert_eq!(result.deviation, -2.5);
        assert_eq!(result.verdict, Verdict::Pass);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Pass.to_string(), "PASS");
        assert_eq!(Verdict::Fail.to_string(), "FAIL");
    }
}
