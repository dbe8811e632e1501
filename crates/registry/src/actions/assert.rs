//! Assertions over the elements a step's selector resolves to

use action_primitives::{build_selector, ActionError, ElementRef};
use async_trait::async_trait;
use stepframe_core_types::Step;

use crate::api::{ActionDefinition, StepContext};
use crate::codegen::{call, chain, quote, subject};
use crate::model::{ParamSpec, ParamType};

const TEXT_CONTENT: &str = "textContent";

fn resolve(step: &Step, ctx: &StepContext) -> Vec<ElementRef> {
    ctx.surface().query(&build_selector(step))
}

fn should(step: &Step, chainer: &str) -> String {
    chain([subject(step, false), call("should", [quote(chainer)])])
}

pub struct Exist;

#[async_trait]
impl ActionDefinition for Exist {
    fn action(&self) -> &str {
        "exist"
    }

    fn label(&self) -> &str {
        "should exist"
    }

    fn generate_code(&self, step: &Step) -> String {
        chain([subject(step, true)])
    }

    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        if resolve(step, ctx).is_empty() {
            return Err(ActionError::NoElement(step.selector.clone()));
        }
        Ok(())
    }
}

pub struct NotExist;

#[async_trait]
impl ActionDefinition for NotExist {
    fn action(&self) -> &str {
        "notExist"
    }

    fn label(&self) -> &str {
        "should not exist"
    }

    fn generate_code(&self, step: &Step) -> String {
        should(step, "not.exist")
    }

    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        if !resolve(step, ctx).is_empty() {
            return Err(ActionError::UnexpectedElement(step.selector.clone()));
        }
        Ok(())
    }
}

/// Some matched element, or one of its descendants, contains the text.
pub struct Contains;

#[async_trait]
impl ActionDefinition for Contains {
    fn action(&self) -> &str {
        "contains"
    }

    fn label(&self) -> &str {
        "should contain"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::new(TEXT_CONTENT, ParamType::String, "Text content")]
    }

    fn generate_code(&self, step: &Step) -> String {
        chain([
            subject(step, false),
            call("contains", [quote(&step.arg_text(TEXT_CONTENT))]),
        ])
    }

    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        let text = step.arg_text(TEXT_CONTENT);
        let found = resolve(step, ctx)
            .iter()
            .any(|element| element.text_content().contains(&text));
        if found {
            Ok(())
        } else {
            Err(ActionError::assertion(format!(
                "Could not find content '{text}' in '{}'",
                step.selector
            )))
        }
    }
}

pub struct Disabled;

#[async_trait]
impl ActionDefinition for Disabled {
    fn action(&self) -> &str {
        "disabled"
    }

    fn label(&self) -> &str {
        "should be disabled"
    }

    fn generate_code(&self, step: &Step) -> String {
        should(step, "be.disabled")
    }

    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        if resolve(step, ctx).iter().any(|element| element.is_disabled()) {
            Ok(())
        } else {
            Err(ActionError::assertion(format!(
                "'{}' is not disabled (should be)",
                step.selector
            )))
        }
    }
}

pub struct NotDisabled;

#[async_trait]
impl ActionDefinition for NotDisabled {
    fn action(&self) -> &str {
        "notDisabled"
    }

    fn label(&self) -> &str {
        "should not be disabled"
    }

    fn generate_code(&self, step: &Step) -> String {
        should(step, "not.be.disabled")
    }

    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        if resolve(step, ctx).iter().any(|element| element.is_disabled()) {
            Err(ActionError::assertion(format!(
                "'{}' is disabled (should not be)",
                step.selector
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existence_checks_render_by_select_type() {
        let css = Step::new("exist").with_selector(".alert").with_timeout(500);
        assert_eq!(Exist.generate_code(&css), "cy.get('.alert', { timeout: 500 })");
        let content = Step::new("notExist").with_content("Error");
        assert_eq!(
            NotExist.generate_code(&content),
            "cy.contains('Error').should('not.exist')"
        );
    }

    #[test]
    fn contains_and_disabled_render() {
        let step = Step::new("contains")
            .with_selector("h1")
            .with_arg(TEXT_CONTENT, "Welcome");
        assert_eq!(Contains.generate_code(&step), "cy.get('h1').contains('Welcome')");
        let step = Step::new("disabled").with_selector("#save");
        assert_eq!(Disabled.generate_code(&step), "cy.get('#save').should('be.disabled')");
        assert_eq!(
            NotDisabled.generate_code(&step),
            "cy.get('#save').should('not.be.disabled')"
        );
    }
}
