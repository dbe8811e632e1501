use action_primitives::{parse_wait_time, ActionError};
use async_trait::async_trait;
use serde_json::Value;
use stepframe_core_types::Step;

use crate::api::{ActionDefinition, StepContext};
use crate::codegen::{call, chain, quote};
use crate::model::{ParamSpec, ParamType};

const TIMEOUT: &str = "timeout";

/// Let a fixed amount of time pass.
pub struct Wait;

#[async_trait]
impl ActionDefinition for Wait {
    fn action(&self) -> &str {
        "wait"
    }

    fn label(&self) -> &str {
        "wait for time to pass"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::new(TIMEOUT, ParamType::Number, "Timeout (ms)").with_default(500)]
    }

    fn hide_selector_input(&self) -> bool {
        true
    }

    fn generate_code(&self, step: &Step) -> String {
        // Numeric strings render as the delay they parse to; anything else
        // stays quoted so the script fails the same way the live step does.
        let time = match step.arg(TIMEOUT) {
            Some(value @ Value::String(text)) => match parse_wait_time(value) {
                Ok(millis) => millis.to_string(),
                Err(_) => quote(text),
            },
            _ => step.arg_text(TIMEOUT),
        };
        chain([call("wait", [time])])
    }

    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        let time = step.arg(TIMEOUT).cloned().unwrap_or(Value::Null);
        ctx.surface().wait(&time).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_the_delay() {
        let step = Step::new("wait").with_arg(TIMEOUT, 750);
        assert_eq!(Wait.generate_code(&step), "cy.wait(750)");
        let step = Step::new("wait").with_arg(TIMEOUT, "250");
        assert_eq!(Wait.generate_code(&step), "cy.wait(250)");
        let step = Step::new("wait").with_arg(TIMEOUT, " 1500 ");
        assert_eq!(Wait.generate_code(&step), "cy.wait(1500)");
        let step = Step::new("wait").with_arg(TIMEOUT, "soon");
        assert_eq!(Wait.generate_code(&step), "cy.wait('soon')");
    }
}
