use action_primitives::ActionError;
use async_trait::async_trait;
use stepframe_core_types::Step;
use tracing::debug;

use crate::api::{ActionDefinition, StepContext};
use crate::model::{ParamSpec, ParamType};

const CODE_BLOCK: &str = "codeBlock";

/// Author-supplied code, emitted verbatim and evaluated by the frame's
/// script host with the host's full authority.
pub struct CustomCode;

#[async_trait]
impl ActionDefinition for CustomCode {
    fn action(&self) -> &str {
        "code"
    }

    fn label(&self) -> &str {
        "custom code block"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::new(CODE_BLOCK, ParamType::Code, "Custom code")
            .with_default("console.log('hello, world')")]
    }

    fn generate_code(&self, step: &Step) -> String {
        step.arg_text(CODE_BLOCK)
    }

    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        let result = ctx.surface().run_on_client(&step.arg_text(CODE_BLOCK)).await?;
        debug!(result = %result, "custom code finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_emitted_verbatim() {
        let step = Step::new("code").with_arg(CODE_BLOCK, "cy.get('#a')\n  .click()");
        assert_eq!(CustomCode.generate_code(&step), "cy.get('#a')\n  .click()");
    }
}
