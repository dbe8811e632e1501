use super::catalog::cmd_catalog;
use super::chain::cmd_chain;
use super::codegen::cmd_codegen;
use super::config::cmd_config;
use super::env::CliArgs;
use super::info::cmd_info;
use super::run::cmd_run;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Catalog => cmd_catalog(ctx).await,
        Commands::Codegen(args) => cmd_codegen(args, ctx).await,
        Commands::Run(args) => cmd_run(args, ctx).await,
        Commands::Chain(args) => cmd_chain(args, ctx).await,
        Commands::Config(args) => cmd_config(args, ctx).await,
        Commands::Info => cmd_info(ctx).await,
    }
}
