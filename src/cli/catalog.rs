use anyhow::Result;
use stepframe_registry::{ActionRegistry, ParamSpec};

use crate::cli::context::CliContext;

fn describe_param(param: &ParamSpec) -> String {
    let mut line = format!("{} ({:?}): {}", param.key, param.kind, param.label);
    if !param.options.is_empty() {
        let options: Vec<&str> = param.options.iter().map(|option| option.key()).collect();
        line.push_str(&format!(" [{}]", options.join("|")));
    }
    if let Some(default) = &param.default_value {
        line.push_str(&format!(" = {default}"));
    }
    line
}

pub async fn cmd_catalog(ctx: &CliContext) -> Result<()> {
    let registry = ActionRegistry::builtin(ctx.config().site.clone());
    let catalog = registry.catalog();
    ctx.output().emit(&catalog, || {
        let mut out = String::new();
        for meta in &catalog {
            let selector = if meta.hide_selector_input {
                ""
            } else {
                " <selector>"
            };
            out.push_str(&format!("{:<12} {}{}\n", meta.action, meta.label, selector));
            for param in &meta.params {
                out.push_str(&format!("    {}\n", describe_param(param)));
            }
        }
        Ok(out)
    })
}
