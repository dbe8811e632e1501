use action_primitives::ActionError;
use async_trait::async_trait;
use network_tap_light::RequestMatcher;
use stepframe_core_types::{RequestProperty, Step};
use tracing::info;

use crate::api::{ActionDefinition, StepContext};
use crate::codegen::quote;
use crate::model::{ParamOption, ParamSpec, ParamType};

const XHR_METHOD: &str = "xhrMethod";
const XHR_PROPERTY: &str = "xhrProperty";
const METHODS: [&str; 5] = ["DELETE", "GET", "PATCH", "POST", "PUT"];

/// Consume observed requests until one matches the step.
pub struct Xhr;

impl Xhr {
    fn matcher(step: &Step) -> Result<RequestMatcher, ActionError> {
        let raw = step.arg_text(XHR_PROPERTY);
        let property = RequestProperty::parse(&raw).ok_or_else(|| {
            ActionError::invalid_argument("waitForXHR", format!("unknown property '{raw}'"))
        })?;
        Ok(RequestMatcher::new(
            step.arg_text(XHR_METHOD),
            property,
            step.selector.clone(),
        ))
    }
}

#[async_trait]
impl ActionDefinition for Xhr {
    fn action(&self) -> &str {
        "xhr"
    }

    fn label(&self) -> &str {
        "wait for request"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::new(XHR_METHOD, ParamType::Select, "Method")
                .with_options(METHODS.map(ParamOption::plain))
                .with_default("GET"),
            ParamSpec::new(XHR_PROPERTY, ParamType::Select, "Request property")
                .with_options([ParamOption::plain("href"), ParamOption::plain("pathname")])
                .with_default(RequestProperty::default().as_str()),
        ]
    }

    fn generate_code(&self, step: &Step) -> String {
        [
            "helpers.waitForXHR({".to_string(),
            format!("\tid: {},", quote(&step.id.0)),
            format!("\tmethod: {},", quote(&step.arg_text(XHR_METHOD))),
            format!("\tproperty: {},", quote(&step.arg_text(XHR_PROPERTY))),
            format!("\tvalue: {},", quote(&step.selector)),
            "})".to_string(),
        ]
        .join("\n")
    }

    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        let matcher = Self::matcher(step)?;
        let event = ctx.requests.wait_for(&matcher)?;
        info!(method = %event.method, href = %event.href, "matched request");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepframe_core_types::StepId;

    #[test]
    fn renders_helper_call() {
        let mut step = Step::new("xhr")
            .with_selector("/api/users")
            .with_arg(XHR_METHOD, "POST")
            .with_arg(XHR_PROPERTY, "pathname");
        step.id = StepId("s7".into());
        assert_eq!(
            Xhr.generate_code(&step),
            "helpers.waitForXHR({\n\tid: 's7',\n\tmethod: 'POST',\n\tproperty: 'pathname',\n\tvalue: '/api/users',\n})"
        );
    }

    #[test]
    fn unknown_property_is_rejected() {
        let step = Step::new("xhr").with_arg(XHR_PROPERTY, "host");
        assert!(matches!(
            Xhr::matcher(&step),
            Err(ActionError::InvalidArgument { .. })
        ));
    }
}
