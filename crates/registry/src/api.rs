use std::sync::Arc;

use action_primitives::{ActionError, Frame, Surface, SurfaceConfig};
use async_trait::async_trait;
use chrono::Utc;
use network_tap_light::RequestQueue;
use serde_json::Value;
use stepframe_core_types::{SiteConfig, Step};
use tracing::{debug, info, warn};

use crate::actions::builtin_actions;
use crate::errors::RegistryError;
use crate::metrics::StepMetrics;
use crate::model::{ActionMeta, ParamSpec, StepReport};

/// Everything a step may act on while it runs.
#[derive(Clone)]
pub struct StepContext {
    pub frame: Arc<dyn Frame>,
    pub site: SiteConfig,
    pub requests: Arc<RequestQueue>,
}

impl StepContext {
    pub fn new(frame: Arc<dyn Frame>, site: SiteConfig, requests: Arc<RequestQueue>) -> Self {
        Self {
            frame,
            site,
            requests,
        }
    }

    /// A fresh surface over the step's frame.
    pub fn surface(&self) -> Surface {
        Surface::new(self.frame.clone(), SurfaceConfig::from(&self.site))
    }
}

/// One kind of step: its editor form, its code rendering and its live effect.
///
/// `generate_code` and `run_step` describe the same behavior twice and must
/// stay equivalent.
#[async_trait]
pub trait ActionDefinition: Send + Sync {
    fn action(&self) -> &str;

    fn label(&self) -> &str;

    fn params(&self) -> Vec<ParamSpec> {
        Vec::new()
    }

    fn hide_selector_input(&self) -> bool {
        false
    }

    /// Test code equivalent to running the step.
    fn generate_code(&self, step: &Step) -> String;

    async fn run_step(&self, step: &Step, ctx: &StepContext) -> Result<(), ActionError>;

    fn describe(&self) -> ActionMeta {
        ActionMeta {
            action: self.action().to_string(),
            label: self.label().to_string(),
            params: self.params(),
            hide_selector_input: self.hide_selector_input(),
        }
    }
}

/// Ordered catalog of action definitions bound to one site.
pub struct ActionRegistry {
    site: SiteConfig,
    actions: Vec<Arc<dyn ActionDefinition>>,
    metrics: Option<StepMetrics>,
}

impl ActionRegistry {
    /// The built-in catalog, in the order the editor lists it.
    pub fn builtin(site: SiteConfig) -> Self {
        let metrics = match StepMetrics::new() {
            Ok(metrics) => Some(metrics),
            Err(err) => {
                warn!(?err, "step metrics unavailable");
                None
            }
        };
        Self {
            actions: builtin_actions(&site),
            site,
            metrics,
        }
    }

    /// Add a definition, replacing any existing one with the same name.
    pub fn with_action(mut self, definition: Arc<dyn ActionDefinition>) -> Self {
        match self
            .actions
            .iter()
            .position(|existing| existing.action() == definition.action())
        {
            Some(index) => self.actions[index] = definition,
            None => self.actions.push(definition),
        }
        self
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub fn metrics(&self) -> Option<&StepMetrics> {
        self.metrics.as_ref()
    }

    pub fn actions(&self) -> &[Arc<dyn ActionDefinition>] {
        &self.actions
    }

    pub fn get(&self, action: &str) -> Option<&Arc<dyn ActionDefinition>> {
        self.actions
            .iter()
            .find(|definition| definition.action() == action)
    }

    pub fn catalog(&self) -> Vec<ActionMeta> {
        self.actions
            .iter()
            .map(|definition| definition.describe())
            .collect()
    }

    /// Resolve the step's definition and fill unset args from param defaults.
    pub fn prepare(&self, step: &Step) -> Result<(Arc<dyn ActionDefinition>, Step), RegistryError> {
        let definition = self
            .get(&step.action)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownAction(step.action.clone()))?;

        let mut step = step.clone();
        for param in definition.params() {
            let Some(default) = param.default_value else {
                continue;
            };
            let unset = matches!(step.args.get(&param.key), None | Some(Value::Null));
            if unset {
                step.args.insert(param.key, default);
            }
        }
        Ok((definition, step))
    }

    pub fn generate_code(&self, step: &Step) -> Result<String, RegistryError> {
        let (definition, step) = self.prepare(step)?;
        Ok(definition.generate_code(&step))
    }

    /// Code for a whole test, one step after another.
    pub fn generate_script(&self, steps: &[Step]) -> Result<String, RegistryError> {
        let blocks = steps
            .iter()
            .map(|step| self.generate_code(step))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(blocks.join("\n"))
    }

    /// Run a step; failures propagate unmodified.
    pub async fn execute(&self, step: &Step, ctx: &StepContext) -> Result<(), RegistryError> {
        let (definition, step) = self.prepare(step)?;
        debug!(action = %step.action, step_id = %step.id, selector = %step.selector, "running step");
        definition.run_step(&step, ctx).await?;
        Ok(())
    }

    /// Run a step against `frame` and report how it went.
    pub async fn run_step(
        &self,
        step: &Step,
        frame: Arc<dyn Frame>,
        requests: Arc<RequestQueue>,
    ) -> StepReport {
        let ctx = StepContext::new(frame, self.site.clone(), requests);
        self.run_in(step, &ctx).await
    }

    pub async fn run_in(&self, step: &Step, ctx: &StepContext) -> StepReport {
        let report = StepReport::new(step.id.clone(), step.action.clone(), Utc::now());
        let report = match self.execute(step, ctx).await {
            Ok(()) => {
                let report = report.finish(Ok(()));
                info!(
                    action = %step.action,
                    step_id = %step.id,
                    latency_ms = report.latency_ms,
                    "step passed"
                );
                report
            }
            Err(err) => {
                let err = err.into_action_error();
                warn!(action = %step.action, step_id = %step.id, error = %err, "step failed");
                report.finish(Err(&err))
            }
        };
        if let Some(metrics) = &self.metrics {
            metrics.record(&report);
        }
        report
    }

    /// Run steps in order, stopping at the first failure.
    pub async fn run_steps(&self, steps: &[Step], ctx: &StepContext) -> Vec<StepReport> {
        let mut reports = Vec::with_capacity(steps.len());
        for step in steps {
            let report = self.run_in(step, ctx).await;
            let ok = report.ok;
            reports.push(report);
            if !ok {
                break;
            }
        }
        reports
    }
}
