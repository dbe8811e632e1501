use anyhow::Result;
use serde::Serialize;
use stepframe_registry::ActionRegistry;

use crate::cli::context::CliContext;

#[derive(Serialize)]
struct SystemInfo {
    version: &'static str,
    build_date: &'static str,
    git_commit: &'static str,
    git_branch: &'static str,
    config_path: String,
    base_url: String,
    default_pathname: String,
    origin_url: Option<String>,
    actions: Vec<String>,
}

pub async fn cmd_info(ctx: &CliContext) -> Result<()> {
    let config = ctx.config();
    let registry = ActionRegistry::builtin(config.site.clone());
    let info = SystemInfo {
        version: env!("CARGO_PKG_VERSION"),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown"),
        git_commit: option_env!("GIT_HASH").unwrap_or("unknown"),
        git_branch: option_env!("GIT_BRANCH").unwrap_or("unknown"),
        config_path: ctx.config_path().display().to_string(),
        base_url: config.site.base_url.to_string(),
        default_pathname: config.site.default_pathname.clone(),
        origin_url: config.site.origin_url.as_ref().map(|url| url.to_string()),
        actions: registry
            .actions()
            .iter()
            .map(|definition| definition.action().to_string())
            .collect(),
    };

    ctx.output().emit(&info, || {
        let mut out = String::new();
        out.push_str("stepframe System Information\n");
        out.push_str("============================\n");
        out.push_str(&format!("Version: {}\n", info.version));
        out.push_str(&format!("Build Date: {}\n", info.build_date));
        out.push_str(&format!("Git Commit: {} ({})\n\n", info.git_commit, info.git_branch));
        out.push_str("Configuration:\n");
        out.push_str(&format!("- File: {}\n", info.config_path));
        out.push_str(&format!("- Base URL: {}\n", info.base_url));
        out.push_str(&format!("- Default Pathname: {}\n", info.default_pathname));
        out.push_str(&format!(
            "- Origin: {}\n\n",
            info.origin_url.as_deref().unwrap_or("(base URL)")
        ));
        out.push_str(&format!("Actions ({}): {}\n", info.actions.len(), info.actions.join(", ")));
        Ok(out)
    })
}
