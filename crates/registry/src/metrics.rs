use prometheus::{core::Collector, histogram_opts, opts, HistogramVec, IntCounterVec, Registry};
use tracing::error;

use crate::model::StepReport;

const LATENCY_BUCKETS_MS: [f64; 7] = [1.0, 5.0, 25.0, 100.0, 500.0, 2500.0, 10000.0];

/// Per-action step counters owned by one [`ActionRegistry`](crate::ActionRegistry).
#[derive(Clone)]
pub struct StepMetrics {
    steps: IntCounterVec,
    latency: HistogramVec,
}

impl StepMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let steps = IntCounterVec::new(
            opts!(
                "stepframe_steps_total",
                "Steps run grouped by action and outcome"
            ),
            &["action", "outcome"],
        )?;
        let latency = HistogramVec::new(
            histogram_opts!(
                "stepframe_step_latency_ms",
                "Step latency in milliseconds",
                LATENCY_BUCKETS_MS.to_vec()
            ),
            &["action"],
        )?;
        Ok(Self { steps, latency })
    }

    pub fn register(&self, registry: &Registry) {
        register(registry, self.steps.clone());
        register(registry, self.latency.clone());
    }

    pub fn record(&self, report: &StepReport) {
        self.steps
            .with_label_values(&[report.action.as_str(), report.outcome()])
            .inc();
        self.latency
            .with_label_values(&[report.action.as_str()])
            .observe(report.latency_ms as f64);
    }

    pub fn count(&self, action: &str, outcome: &str) -> u64 {
        self.steps.with_label_values(&[action, outcome]).get()
    }
}

fn register<C>(registry: &Registry, collector: C)
where
    C: Collector + Clone + Send + Sync + 'static,
{
    if let Err(err) = registry.register(Box::new(collector.clone())) {
        if !matches!(err, prometheus::Error::AlreadyReg) {
            error!(?err, "failed to register step metric");
        }
    }
}
