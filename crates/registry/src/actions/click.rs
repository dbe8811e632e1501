use action_primitives::{build_selector, ActionError, WrapOptions};
use async_trait::async_trait;
use stepframe_core_types::Step;

use crate::api::{ActionDefinition, StepContext};
use crate::codegen::{bare, call, chain, options_object, subject};
use crate::model::{ParamSpec, ParamType};

const FORCE_CLICK: &str = "forceClick";

/// Click an element, optionally even when it is disabled.
pub struct Click;

#[async_trait]
impl ActionDefinition for Click {
    fn action(&self) -> &str {
        "click"
    }

    fn label(&self) -> &str {
        "click element"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::new(FORCE_CLICK, ParamType::Checkbox, "Force click").with_default(false)]
    }

    fn generate_code(&self, step: &Step) -> String {
        let force = step.arg_flag(FORCE_CLICK).then(|| "true".to_string());
        let click = match options_object(&[("force", force)]) {
            Some(options) => call("click", [options]),
            None => bare("click"),
        };
        chain([subject(step, true), click])
    }

    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        let options = WrapOptions {
            force: step.arg_flag(FORCE_CLICK),
        };
        ctx.surface().get(&build_selector(step), options)?.click()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_is_rendered_only_when_set() {
        let step = Step::new("click").with_selector("#save");
        assert_eq!(Click.generate_code(&step), "cy.get('#save').click()");

        let forced = step.clone().with_arg(FORCE_CLICK, true).with_timeout(300);
        assert_eq!(
            Click.generate_code(&forced),
            "cy.get('#save', { timeout: 300 }).click({ force: true })"
        );
    }

    #[test]
    fn content_selection_uses_contains() {
        let step = Step::new("click").with_content("Save");
        assert_eq!(Click.generate_code(&step), "cy.contains('Save').click()");
    }
}
