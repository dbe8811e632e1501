use action_primitives::ActionError;
use async_trait::async_trait;
use stepframe_core_types::{SiteConfig, Step};
use tracing::info;

use crate::api::{ActionDefinition, StepContext};
use crate::codegen::{bare, call, chain, quote};

/// Clear cookies and local storage, then land on the site's default page.
pub struct Reset {
    site: SiteConfig,
}

impl Reset {
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    fn landing_path(&self) -> String {
        self.site
            .default_target_path()
            .unwrap_or_else(|_| self.site.default_pathname.clone())
    }
}

#[async_trait]
impl ActionDefinition for Reset {
    fn action(&self) -> &str {
        "reset"
    }

    fn label(&self) -> &str {
        "resets the state"
    }

    fn hide_selector_input(&self) -> bool {
        true
    }

    fn generate_code(&self, _step: &Step) -> String {
        [
            chain([bare("clearCookies")]),
            chain([bare("clearLocalStorage")]),
            chain([call("visit", [quote(&self.landing_path())])]),
        ]
        .join("\n")
    }

    async fn run_step(&self, _step: &Step, ctx: &StepContext) -> Result<(), ActionError> {
        let surface = ctx.surface();
        let cookies = surface.clear_cookies();
        let keys = surface.clear_local_storage();
        let landing = self.site.default_target_path()?;
        info!(cookies, keys, landing = %landing, "resetting frame state");
        surface.visit(&landing)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_three_statements() {
        let site = SiteConfig::new("http://localhost:3000/app/")
            .unwrap()
            .with_default_pathname("login");
        let code = Reset::new(site).generate_code(&Step::new("reset"));
        assert_eq!(
            code,
            "cy.clearCookies()\ncy.clearLocalStorage()\ncy.visit('/app/login')"
        );
    }
}
