//! Concurrent batch test execution
//!
//! Every component in a batch gets its own tokio task on a [`JoinSet`]. Each
//! task sleeps for its simulated instrument latency and then records a
//! measured value, so the whole batch takes about as long as its slowest
//! component. Results are written back into slots indexed by input position,
//! which keeps the output aligned with the input whatever order the tasks
//! finish in.

use std::time::Duration;

use log::{debug, info, warn};
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::core::error::BenchError;
use crate::core::sampler::{DelayRange, RandomSampler, Sampler};
use crate::entities::batch::Batch;
use crate::entities::component::{Component, TestedComponent};

/// Tunables for a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutorSettings {
    /// Range the simulated instrument latency is drawn from
    pub delay: DelayRange,

    /// Upper bound on a single component test; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl ExecutorSettings {
    pub fn new(delay: DelayRange, timeout: Option<Duration>) -> Result<Self, BenchError> {
        if timeout == Some(Duration::ZERO) {
            return Err(BenchError::configuration("timeout must be greater than zero"));
        }
        Ok(Self { delay, timeout })
    }
}

/// Random inputs for one measurement, drawn before the task is spawned
#[derive(Debug, Clone, Copy, PartialEq)]
struct Draw {
    delay: Duration,
    fraction: f64,
}

/// Runs simulated measurements for a batch of components
#[derive(Debug)]
pub struct TestExecutor<S> {
    sampler: S,
    settings: ExecutorSettings,
}

impl TestExecutor<RandomSampler> {
    /// Executor with a reproducible random source
    pub fn seeded(seed: u64, settings: ExecutorSettings) -> Self {
        Self::new(RandomSampler::seeded(seed), settings)
    }

    /// Executor seeded from the operating system
    pub fn from_entropy(settings: ExecutorSettings) -> Self {
        Self::new(RandomSampler::from_entropy(), settings)
    }
}

impl<S: Sampler> TestExecutor<S> {
    pub fn new(sampler: S, settings: ExecutorSettings) -> Self {
        Self { sampler, settings }
    }

    pub fn settings(&self) -> &ExecutorSettings {
        &self.settings
    }

    /// Test every component in `batch` concurrently.
    ///
    /// Returns the tested components in input order. The first failing
    /// component test aborts the rest of the batch and its error is returned.
    pub async fn run(&mut self, batch: Batch) -> Result<Vec<TestedComponent>, BenchError> {
        let components = batch.into_components();
        let count = components.len();
        let started = Instant::now();

        info!(
            "Testing {} components (delay {}-{} ms)",
            count,
            self.settings.delay.min().as_millis(),
            self.settings.delay.max().as_millis()
        );

        let mut tasks = JoinSet::new();
        for (index, component) in components.into_iter().enumerate() {
            let draw = self.draw();
            debug!(
                "Component {} ({}): delay {} ms, deviation fraction {:.4}",
                index,
                component.kind(),
                draw.delay.as_millis(),
                draw.fraction
            );

            let timeout = self.settings.timeout;
            tasks.spawn(async move {
                let tested = measure_with_timeout(index, component, draw, timeout).await?;
                Ok::<_, BenchError>((index, tested))
            });
        }

        let mut slots: Vec<Option<TestedComponent>> = vec![None; count];
        while let Some(joined) = tasks.join_next().await {
            // Returning early drops `tasks`, which aborts whatever is still running
            let (index, tested) = joined??;
            slots[index] = Some(tested);
        }

        info!(
            "Tested {} components in {} ms",
            count,
            started.elapsed().as_millis()
        );

        Ok(slots.into_iter().flatten().collect())
    }

    fn draw(&mut self) -> Draw {
        let delay = self.sampler.delay(&self.settings.delay);
        let fraction = self.sampler.deviation_fraction().clamp(-1.0, 1.0);
        Draw { delay, fraction }
    }
}

async fn measure_with_timeout(
    index: usize,
    component: Component,
    draw: Draw,
    timeout: Option<Duration>,
) -> Result<TestedComponent, BenchError> {
    let Some(limit) = timeout else {
        return Ok(measure(component, draw).await);
    };

    let kind = component.kind();
    tokio::time::timeout(limit, measure(component, draw))
        .await
        .map_err(|_| {
            warn!("Component {} ({}) timed out after {} ms", index, kind, limit.as_millis());
            BenchError::Timeout {
                index,
                kind: kind.to_string(),
                timeout_ms: limit.as_millis() as u64,
            }
        })
}

/// Simulated measurement: wait out the instrument latency, then perturb the
/// nominal value by `fraction` of its tolerance band
async fn measure(component: Component, draw: Draw) -> TestedComponent {
    tokio::time::sleep(draw.delay).await;

    let deviation = draw.fraction * component.tolerance() * component.nominal();
    component.into_measured(deviation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sampler::{FixedSampler, ScriptedSampler};
    use crate::entities::component::ComponentKind;

    fn resistor() -> Component {
        Component::new(ComponentKind::Resistor, 100.0, 0.05).unwrap()
    }

    fn no_delay(fraction: f64) -> FixedSampler {
        FixedSampler::new(Duration::ZERO, fraction)
    }

    #[tokio::test]
    async fn test_zero_deviation_measures_nominal() {
        let mut executor = TestExecutor::new(no_delay(0.0), ExecutorSettings::default());
        let tested = executor.run(Batch::new(vec![resistor()])).await.unwrap();

        assert_eq!(tested.len(), 1);
        assert_eq!(format!("{:.2}", tested[0].actual()), "100.00");
        assert!(tested[0].passes());
    }

    #[tokio::test]
    async fn test_full_deviation_is_on_boundary_and_passes() {
        let mut executor = TestExecutor::new(no_delay(1.0), ExecutorSettings::default());
        let tested = executor.run(Batch::new(vec![resistor()])).await.unwrap();

        assert_eq!(format!("{:.2}", tested[0].actual()), "105.00");
        assert!(tested[0].passes());
    }

    #[tokio::test]
    async fn test_sample_batch_passes_at_both_tolerance_limits() {
        for fraction in [1.0, -1.0] {
            let tested = TestExecutor::new(no_delay(fraction), ExecutorSettings::default())
                .run(Batch::sample().unwrap())
                .await
                .unwrap();

            assert_eq!(tested.len(), 4);
            for t in &tested {
                assert!(t.passes(), "{} at fraction {}", t.kind(), fraction);
            }
        }
    }

    #[tokio::test]
    async fn test_fraction_beyond_one_is_clamped() {
        let mut executor = TestExecutor::new(no_delay(1.7), ExecutorSettings::default());
        let tested = executor.run(Batch::new(vec![resistor()])).await.unwrap();
        assert_eq!(tested[0].actual(), 105.0);

        let mut executor = TestExecutor::new(no_delay(-3.0), ExecutorSettings::default());
        let tested = executor.run(Batch::new(vec![resistor()])).await.unwrap();
        assert_eq!(tested[0].actual(), 95.0);
    }

    #[tokio::test]
    async fn test_random_deviation_stays_within_tolerance() {
        let batch: Batch = (0..50)
            .map(|i| Component::new(ComponentKind::Capacitor, 1.0 + i as f64, 0.1).unwrap())
            .collect();
        let settings = ExecutorSettings {
            delay: DelayRange::from_millis(0, 2).unwrap(),
            timeout: None,
        };

        let tested = TestExecutor::seeded(3, settings).run(batch).await.unwrap();

        assert_eq!(tested.len(), 50);
        for t in &tested {
            assert!(t.deviation().abs() <= t.component().allowed_deviation());
            assert!(t.passes());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_keep_input_order() {
        // Later components finish first
        let sampler = ScriptedSampler::new([
            (Duration::from_millis(400), 0.0),
            (Duration::from_millis(300), 0.5),
            (Duration::from_millis(200), -0.5),
            (Duration::from_millis(100), 1.0),
        ]);
        let batch = Batch::sample().unwrap();
        let expected: Vec<_> = batch.components().iter().map(|c| c.kind()).collect();

        let tested = TestExecutor::new(sampler, ExecutorSettings::default())
            .run(batch)
            .await
            .unwrap();

        let kinds: Vec<_> = tested.iter().map(|t| t.kind()).collect();
        assert_eq!(kinds, expected);
        assert_eq!(tested[0].actual(), 100.0);
        assert_eq!(tested[3].actual(), 55.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_runs_concurrently_with_paused_clock() {
        let delays = [100u64, 250, 400, 500];
        let sampler =
            ScriptedSampler::new(delays.iter().map(|&ms| (Duration::from_millis(ms), 0.0)));

        let started = Instant::now();
        TestExecutor::new(sampler, ExecutorSettings::default())
            .run(Batch::sample().unwrap())
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(500));
        assert!(elapsed < Duration::from_millis(delays.iter().sum()));
    }

    #[tokio::test]
    async fn test_batch_runs_concurrently_on_wall_clock() {
        let delays = [100u64, 200, 300, 400];
        let sampler =
            ScriptedSampler::new(delays.iter().map(|&ms| (Duration::from_millis(ms), 0.0)));

        let started = std::time::Instant::now();
        TestExecutor::new(sampler, ExecutorSettings::default())
            .run(Batch::sample().unwrap())
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed < Duration::from_millis(delays.iter().sum()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_the_batch() {
        let sampler = ScriptedSampler::new([
            (Duration::from_millis(10), 0.0),
            (Duration::from_millis(900), 0.0),
        ]);
        let settings = ExecutorSettings::new(
            DelayRange::default(),
            Some(Duration::from_millis(200)),
        )
        .unwrap();
        let batch = Batch::new(vec![resistor(), resistor()]);

        let err = TestExecutor::new(sampler, settings)
            .run(batch)
            .await
            .unwrap_err();

        match err {
            BenchError::Timeout { index, timeout_ms, .. } => {
                assert_eq!(index, 1);
                assert_eq!(timeout_ms, 200);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_returns_no_results() {
        let tested = TestExecutor::new(no_delay(0.0), ExecutorSettings::default())
            .run(Batch::default())
            .await
            .unwrap();
        assert!(tested.is_empty());
    }

    #[tokio::test]
    async fn test_seeded_runs_are_reproducible() {
        let settings = ExecutorSettings {
            delay: DelayRange::from_millis(0, 5).unwrap(),
            timeout: None,
        };

        let a = TestExecutor::seeded(99, settings)
            .run(Batch::sample().unwrap())
            .await
            .unwrap();
        let b = TestExecutor::seeded(99, settings)
            .run(Batch::sample().unwrap())
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = ExecutorSettings::new(DelayRange::default(), Some(Duration::ZERO)).unwrap_err();
        assert!(matches!(err, BenchError::Configuration { .. }));
    }
}
