use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::inputs::read_chain;
use super::run::fixture_session;
use crate::cli::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct ChainArgs {
    /// Chain invocation as inline JSON/YAML or a file path
    pub invocation: String,

    /// Page fixture the frame serves (YAML)
    #[arg(short, long)]
    pub page: Option<PathBuf>,

    /// Pathname to load before running the chain
    #[arg(long)]
    pub visit: Option<String>,
}

#[derive(Serialize)]
struct ChainOutcome {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn cmd_chain(args: ChainArgs, ctx: &CliContext) -> Result<()> {
    let invocation = read_chain(&args.invocation).await?;
    let (session, _frame) =
        fixture_session(ctx, args.page.as_deref(), args.visit.as_deref()).await?;

    match session.run_chain(&invocation).await {
        Ok(value) => {
            let outcome = ChainOutcome {
                ok: true,
                value: Some(value.to_json()),
                chain: None,
                error: None,
            };
            ctx.output().emit(&outcome, || {
                Ok(serde_json::to_string_pretty(&outcome.value)?)
            })
        }
        Err(err) => {
            warn!(error = %err, "chain failed");
            let outcome = ChainOutcome {
                ok: false,
                value: None,
                chain: err.chain().map(|chain| chain.dotted()),
                error: Some(err.to_string()),
            };
            ctx.output().emit(&outcome, || Ok(format!("chain failed: {err}")))?;
            Err(err.into())
        }
    }
}
