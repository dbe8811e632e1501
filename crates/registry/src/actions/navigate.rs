use action_primitives::ActionError;
use async_trait::async_trait;
use stepframe_core_types::Step;
use tracing::info;

use crate::api::{ActionDefinition, StepContext};
use crate::codegen::{bare, call, chain, quote};

/// Navigate the frame to the selector, resolved against the base URL.
pub struct Goto;

#[async_trait]
impl ActionDefinition for Goto {
    fn action(&self) -> &str {
        "goto"
    }

    fn label(&self) -> &str {
        "goto a page"
    }

    fn generate_code(&self, step: &Step) -> String {
        chain([call("visit", [quote(&step.selector)])])
    }

    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        ctx.surface().visit(&step.selector)?;
        Ok(())
    }
}

pub struct Reload;

#[async_trait]
impl ActionDefinition for Reload {
    fn action(&self) -> &str {
        "reload"
    }

    fn label(&self) -> &str {
        "refresh the page"
    }

    fn hide_selector_input(&self) -> bool {
        true
    }

    fn generate_code(&self, _step: &Step) -> String {
        chain([bare("reload")])
    }

    async fn run_step(&self, _step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        info!(location = ?ctx.frame.location().map(|url| url.to_string()), "reloading frame");
        ctx.frame.reload();
        Ok(())
    }
}
