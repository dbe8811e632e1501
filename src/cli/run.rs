use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use memory_frame::{FrameSnapshot, MemoryFrame};
use network_tap_light::QueueStats;
use prometheus::{opts, Encoder, IntGaugeVec, Registry, TextEncoder};
use serde::Serialize;
use serde_json::json;
use stepframe_core_types::{ChainInvocation, NetworkEvent};
use stepframe_registry::{StepMetrics, StepReport};
use tracing::info;

use super::inputs::{read_fixture, read_steps};
use crate::cli::context::CliContext;
use crate::session::AuthoringSession;

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Steps file (YAML or JSON)
    pub steps: PathBuf,

    /// Page fixture the frame serves (YAML)
    #[arg(short, long)]
    pub page: Option<PathBuf>,

    /// Pathname to load before the first step
    #[arg(long)]
    pub visit: Option<String>,

    /// Run every step even after one fails
    #[arg(long)]
    pub keep_going: bool,

    /// Include the final frame state in the output
    #[arg(long)]
    pub snapshot: bool,

    /// Print step metrics in Prometheus text format after the run
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Serialize)]
struct RunOutcome {
    passed: usize,
    failed: usize,
    reports: Vec<StepReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<FrameSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pending_requests: Option<Vec<NetworkEvent>>,
}

/// Build a session over a fixture-backed frame, optionally loading `visit`.
pub(crate) async fn fixture_session(
    ctx: &CliContext,
    page: Option<&std::path::Path>,
    visit: Option<&str>,
) -> Result<(AuthoringSession, Arc<MemoryFrame>)> {
    let fixture = read_fixture(page).await?;
    let frame = Arc::new(MemoryFrame::with_fixture(fixture));
    let session = AuthoringSession::with_memory_frame(ctx.config().site.clone(), frame.clone());
    if let Some(pathname) = visit {
        session
            .run_chain(&ChainInvocation::new("visit", vec![json!(pathname)]))
            .await
            .with_context(|| format!("loading {pathname}"))?;
    }
    Ok((session, frame))
}

fn render_report(report: &StepReport) -> String {
    let mark = if report.ok { "✓" } else { "✗" };
    let mut line = format!(
        "{mark} {:<12} {:>5}ms  {}",
        report.action, report.latency_ms, report.step_id
    );
    if let Some(error) = &report.error {
        line.push_str(&format!("\n    {}: {}", error.kind.as_str(), error.message));
    }
    line
}

fn encode_metrics(steps: Option<&StepMetrics>, requests: &QueueStats) -> Result<String> {
    let registry = Registry::new();
    if let Some(steps) = steps {
        steps.register(&registry);
    }

    let queue = IntGaugeVec::new(
        opts!(
            "stepframe_requests",
            "Observed requests by queue outcome at the end of the run"
        ),
        &["state"],
    )?;
    for (state, count) in [
        ("recorded", requests.recorded),
        ("matched", requests.matched),
        ("discarded", requests.discarded),
        ("pending", requests.pending as u64),
    ] {
        queue
            .with_label_values(&[state])
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }
    registry.register(Box::new(queue))?;

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub async fn cmd_run(args: RunArgs, ctx: &CliContext) -> Result<()> {
    let steps = read_steps(&args.steps).await?;
    let (session, frame) =
        fixture_session(ctx, args.page.as_deref(), args.visit.as_deref()).await?;

    let reports = session.run_steps(&steps, args.keep_going).await;
    let failed = reports.iter().filter(|report| !report.ok).count();
    let outcome = RunOutcome {
        passed: reports.len() - failed,
        failed,
        reports,
        snapshot: args.snapshot.then(|| frame.snapshot()),
        pending_requests: args.snapshot.then(|| session.requests().snapshot()),
    };
    info!(
        passed = outcome.passed,
        failed = outcome.failed,
        skipped = steps.len() - outcome.reports.len(),
        "run finished"
    );

    ctx.output().emit(&outcome, || {
        let mut lines: Vec<String> = outcome.reports.iter().map(render_report).collect();
        let skipped = steps.len() - outcome.reports.len();
        lines.push(format!(
            "\n{} passed, {} failed, {} skipped",
            outcome.passed, outcome.failed, skipped
        ));
        if let Some(snapshot) = &outcome.snapshot {
            lines.push(serde_yaml::to_string(snapshot)?);
        }
        Ok(lines.join("\n"))
    })?;

    if args.metrics {
        let requests = session.requests().stats();
        print!("{}", encode_metrics(session.metrics(), &requests)?);
    }

    if failed > 0 {
        bail!("{failed} step(s) failed");
    }
    Ok(())
}
