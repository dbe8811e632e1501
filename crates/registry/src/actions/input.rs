use action_primitives::{build_selector, set_input_value, ActionError, WrapOptions};
use async_trait::async_trait;
use stepframe_core_types::Step;
use tracing::debug;

use crate::api::{ActionDefinition, StepContext};
use crate::codegen::{bare, call, chain, quote, subject};
use crate::model::{ParamSpec, ParamType};

const TYPE_CONTENT: &str = "typeContent";

/// Replace an input's value with the typed content.
pub struct Type;

#[async_trait]
impl ActionDefinition for Type {
    fn action(&self) -> &str {
        "type"
    }

    fn label(&self) -> &str {
        "enter value into input"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::new(TYPE_CONTENT, ParamType::String, "Type Content")]
    }

    fn generate_code(&self, step: &Step) -> String {
        chain([
            subject(step, true),
            bare("clear"),
            call("type", [quote(&step.arg_text(TYPE_CONTENT))]),
        ])
    }

    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        ctx.surface()
            .get(&build_selector(step), WrapOptions::default())?
            .clear()
            .type_text(&step.arg_text(TYPE_CONTENT));
        Ok(())
    }
}

/// Pick a dropdown option by value.
pub struct Select;

#[async_trait]
impl ActionDefinition for Select {
    fn action(&self) -> &str {
        "select"
    }

    fn label(&self) -> &str {
        "select value from dropdown"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::new(TYPE_CONTENT, ParamType::Select, "Select an option")]
    }

    fn generate_code(&self, step: &Step) -> String {
        chain([
            subject(step, false),
            call("select", [quote(&step.arg_text(TYPE_CONTENT))]),
        ])
    }

    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        let selector = build_selector(step);
        let target = ctx
            .surface()
            .query(&selector)
            .into_iter()
            .next()
            .ok_or_else(|| ActionError::NoElement(step.selector.clone()))?;
        let value = step.arg_text(TYPE_CONTENT);
        debug!(selector = %step.selector, value = %value, "selecting option");
        set_input_value(target.as_ref(), &value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_clears_before_typing() {
        let step = Step::new("type")
            .with_selector("#user")
            .with_timeout(2000)
            .with_arg(TYPE_CONTENT, "bob");
        assert_eq!(
            Type.generate_code(&step),
            "cy.get('#user', { timeout: 2000 }).clear().type('bob')"
        );
    }

    #[test]
    fn select_names_the_option() {
        let step = Step::new("select")
            .with_selector("#plan")
            .with_arg(TYPE_CONTENT, "pro");
        assert_eq!(Select.generate_code(&step), "cy.get('#plan').select('pro')");
    }
}
