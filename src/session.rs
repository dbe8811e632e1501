//! One authoring session: the frame being authored against, its request queue
//! and the action registry bound to the site under test.

use std::sync::Arc;

use action_flow::{ChainExecutor, ChainScriptHost, ChainValue, DefaultChainExecutor, FlowError};
use action_primitives::{Frame, ScriptHost, SurfaceConfig};
use memory_frame::{MemoryFrame, RequestListener};
use network_tap_light::RequestQueue;
use stepframe_core_types::{ChainInvocation, NetworkEvent, SiteConfig, Step};
use stepframe_registry::{
    ActionMeta, ActionRegistry, RegistryError, StepContext, StepMetrics, StepReport,
};
use tracing::{debug, info};

pub struct AuthoringSession {
    registry: ActionRegistry,
    frame: Arc<dyn Frame>,
    requests: Arc<RequestQueue>,
    executor: DefaultChainExecutor,
}

impl AuthoringSession {
    /// Session over a host-supplied frame. The host feeds observed requests
    /// through [`record_request`](Self::record_request) or [`request_sink`](Self::request_sink).
    pub fn new(site: SiteConfig, frame: Arc<dyn Frame>) -> Self {
        let executor = DefaultChainExecutor::new(SurfaceConfig::from(&site));
        Self {
            registry: ActionRegistry::builtin(site),
            frame,
            requests: Arc::new(RequestQueue::default()),
            executor,
        }
    }

    /// Session over an in-memory frame, with its requests and script host
    /// wired into the session.
    pub fn with_memory_frame(site: SiteConfig, frame: Arc<MemoryFrame>) -> Self {
        let session = Self::new(site, frame.clone());
        frame.set_request_listener(session.request_sink());
        frame.set_script_host(session.script_host());
        session
    }

    pub fn site(&self) -> &SiteConfig {
        self.registry.site()
    }

    pub fn frame(&self) -> &Arc<dyn Frame> {
        &self.frame
    }

    pub fn requests(&self) -> &Arc<RequestQueue> {
        &self.requests
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> Option<&StepMetrics> {
        self.registry.metrics()
    }

    /// Producer side of the request queue: one call per outgoing request the
    /// embedded frame issued.
    pub fn record_request(&self, event: NetworkEvent) {
        debug!(method = %event.method, href = %event.href, "request observed");
        self.requests.record(event);
    }

    pub fn request_sink(&self) -> RequestListener {
        let requests = self.requests.clone();
        Arc::new(move |event| requests.record(event))
    }

    pub fn script_host(&self) -> Arc<dyn ScriptHost> {
        Arc::new(ChainScriptHost::new())
    }

    pub fn catalog(&self) -> Vec<ActionMeta> {
        self.registry.catalog()
    }

    pub fn generate_code(&self, step: &Step) -> Result<String, RegistryError> {
        self.registry.generate_code(step)
    }

    pub fn generate_script(&self, steps: &[Step]) -> Result<String, RegistryError> {
        self.registry.generate_script(steps)
    }

    fn context(&self) -> StepContext {
        StepContext::new(
            self.frame.clone(),
            self.registry.site().clone(),
            self.requests.clone(),
        )
    }

    pub async fn run_step(&self, step: &Step) -> StepReport {
        self.registry.run_in(step, &self.context()).await
    }

    /// Run steps in order. Unless `keep_going` is set the run stops at the
    /// first failing step.
    pub async fn run_steps(&self, steps: &[Step], keep_going: bool) -> Vec<StepReport> {
        info!(steps = steps.len(), keep_going, "running steps");
        if !keep_going {
            return self.registry.run_steps(steps, &self.context()).await;
        }
        let ctx = self.context();
        let mut reports = Vec::with_capacity(steps.len());
        for step in steps {
            reports.push(self.registry.run_in(step, &ctx).await);
        }
        reports
    }

    pub async fn run_chain(&self, invocation: &ChainInvocation) -> Result<ChainValue, FlowError> {
        self.executor.execute(self.frame.clone(), invocation).await
    }
}
