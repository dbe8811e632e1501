use clap::Subcommand;

use super::chain::ChainArgs;
use super::codegen::CodegenArgs;
use super::config::ConfigArgs;
use super::run::RunArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// List the available actions and their params
    Catalog,

    /// Render a steps file as test code
    Codegen(CodegenArgs),

    /// Run a steps file against a fixture-backed frame
    Run(RunArgs),

    /// Run one serialized call chain against a fixture-backed frame
    Chain(ChainArgs),

    /// Manage stepframe configuration
    Config(ConfigArgs),

    /// Show version and configuration summary
    Info,
}
