use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use stepframe_registry::ActionRegistry;

use super::inputs::read_steps;
use crate::cli::context::CliContext;

#[derive(Args, Clone, Debug)]
pub struct CodegenArgs {
    /// Steps file (YAML or JSON)
    pub steps: PathBuf,

    /// Wrap the code in a test block with this title
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Serialize)]
struct GeneratedCode {
    steps: usize,
    code: String,
}

fn wrap_in_test(title: &str, body: &str) -> String {
    let indented: Vec<String> = body.lines().map(|line| format!("\t{line}")).collect();
    format!(
        "it({}, () => {{\n{}\n}})",
        stepframe_registry::codegen::quote(title),
        indented.join("\n")
    )
}

pub async fn cmd_codegen(args: CodegenArgs, ctx: &CliContext) -> Result<()> {
    let steps = read_steps(&args.steps).await?;
    let registry = ActionRegistry::builtin(ctx.config().site.clone());
    let mut code = registry.generate_script(&steps)?;
    if let Some(title) = &args.title {
        code = wrap_in_test(title, &code);
    }
    let generated = GeneratedCode {
        steps: steps.len(),
        code,
    };
    ctx.output().emit(&generated, || Ok(generated.code.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_indents_every_line() {
        assert_eq!(
            wrap_in_test("logs in", "cy.reload()\ncy.wait(5)"),
            "it('logs in', () => {\n\tcy.reload()\n\tcy.wait(5)\n})"
        );
    }
}
