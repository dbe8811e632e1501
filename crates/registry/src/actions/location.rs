use action_primitives::ActionError;
use async_trait::async_trait;
use regex::Regex;
use stepframe_core_types::{RequestProperty, Step};
use tracing::debug;

use crate::api::{ActionDefinition, StepContext};
use crate::codegen::{call, chain, quote, timeout_option};
use crate::model::{ParamOption, ParamSpec, ParamType};

const LOCATION_PROPERTY: &str = "locationProperty";
const MATCH_TYPE: &str = "locationMatchType";
const STARTS_WITH: &str = "startsWith";
const EXACT: &str = "exact";

/// Compare the frame's location against the selector.
///
/// `startsWith` treats the selector as a pattern anchored at the start of the
/// value; `exact` compares the strings as they are.
pub struct Location;

impl Location {
    fn property(step: &Step) -> Result<RequestProperty, ActionError> {
        let raw = step.arg_text(LOCATION_PROPERTY);
        RequestProperty::parse(&raw).ok_or_else(|| {
            ActionError::invalid_argument("location", format!("unknown property '{raw}'"))
        })
    }

    fn prefix_pattern(selector: &str) -> String {
        format!("^{selector}")
    }
}

#[async_trait]
impl ActionDefinition for Location {
    fn action(&self) -> &str {
        "location"
    }

    fn label(&self) -> &str {
        "verify page location"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::new(LOCATION_PROPERTY, ParamType::Select, "Location property")
                .with_options([ParamOption::plain("pathname"), ParamOption::plain("href")])
                .with_default("pathname"),
            ParamSpec::new(MATCH_TYPE, ParamType::Select, "Match type")
                .with_options([
                    ParamOption::labeled(STARTS_WITH, "starts with"),
                    ParamOption::labeled(EXACT, "is exactly"),
                ])
                .with_default(STARTS_WITH),
        ]
    }

    fn generate_code(&self, step: &Step) -> String {
        let location = call(
            "location",
            std::iter::once(quote(&step.arg_text(LOCATION_PROPERTY))).chain(timeout_option(step)),
        );
        let should = if step.arg_text(MATCH_TYPE) == STARTS_WITH {
            call(
                "should",
                [
                    quote("match"),
                    format!("new RegExp({})", quote(&Self::prefix_pattern(&step.selector))),
                ],
            )
        } else {
            call("should", [quote("eq"), quote(&step.selector)])
        };
        chain([location, should])
    }

    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        let property = Self::property(step)?;
        let current = ctx
            .frame
            .location()
            .map(|url| match property {
                RequestProperty::Pathname => url.path().to_string(),
                RequestProperty::Href => url.as_str().to_string(),
            })
            .unwrap_or_default();

        let matched = if step.arg_text(MATCH_TYPE) == STARTS_WITH {
            let pattern = Regex::new(&Self::prefix_pattern(&step.selector)).map_err(|err| {
                ActionError::assertion(format!(
                    "Invalid location pattern '{}': {err}",
                    step.selector
                ))
            })?;
            pattern.is_match(&current)
        } else {
            current == step.selector
        };
        debug!(property = property.as_str(), current = %current, matched, "checked location");

        if matched {
            Ok(())
        } else {
            Err(ActionError::assertion(format!(
                "Unexpected {}: '{current}' (expected '{}')",
                property.as_str(),
                step.selector
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(match_type: &str) -> Step {
        Step::new("location")
            .with_selector("/users")
            .with_arg(LOCATION_PROPERTY, "pathname")
            .with_arg(MATCH_TYPE, match_type)
    }

    #[test]
    fn prefix_match_renders_anchored_pattern() {
        assert_eq!(
            Location.generate_code(&step(STARTS_WITH)),
            "cy.location('pathname').should('match', new RegExp('^/users'))"
        );
    }

    #[test]
    fn exact_match_renders_equality() {
        assert_eq!(
            Location.generate_code(&step(EXACT).with_timeout(1000)),
            "cy.location('pathname', { timeout: 1000 }).should('eq', '/users')"
        );
    }
}
