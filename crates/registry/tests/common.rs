#![allow(dead_code)]

use std::sync::Arc;

use action_flow::ChainScriptHost;
use memory_frame::{MemoryFrame, NodeSpec, PageFixture, PageSpec};
use network_tap_light::RequestQueue;
use stepframe_core_types::SiteConfig;
use stepframe_registry::{ActionRegistry, StepContext};

pub fn site() -> SiteConfig {
    SiteConfig::new("http://app.test/")
        .unwrap()
        .with_default_pathname("/login")
}

pub fn fixture() -> PageFixture {
    PageFixture::new()
        .with_page(
            "/login",
            PageSpec::new(vec![
                NodeSpec::new("h1").with_text("Welcome back"),
                NodeSpec::new("form").children(vec![
                    NodeSpec::new("input").with_id("user").tracked(),
                    NodeSpec::new("input").with_id("pass").with_attr("type", "password"),
                    NodeSpec::new("select").with_id("plan").tracked(),
                    NodeSpec::new("button").with_id("save").with_text("Save").disabled(),
                    NodeSpec::new("button").with_id("go").with_text("Go"),
                ]),
            ])
            .with_title("Login")
            .with_request("GET", "/api/session"),
        )
        .with_page(
            "/users",
            PageSpec::new(vec![NodeSpec::new("p").with_class("alert").with_text("No users")])
                .with_request("GET", "/api/users?page=1")
                .with_request("POST", "/api/audit"),
        )
        .with_storage("token", "abc")
        .with_storage("test:session", "keep")
        .with_cookie("sid", "1")
}

pub struct Harness {
    pub registry: ActionRegistry,
    pub frame: Arc<MemoryFrame>,
    pub requests: Arc<RequestQueue>,
    pub ctx: StepContext,
}

/// A frame wired to a request queue and the chain script host, not yet
/// navigated anywhere.
pub fn harness() -> Harness {
    let frame = Arc::new(MemoryFrame::with_fixture(fixture()));
    frame.set_script_host(Arc::new(ChainScriptHost::new()));
    let requests = Arc::new(RequestQueue::default());
    let sink = requests.clone();
    frame.set_request_listener(Arc::new(move |event| sink.record(event)));

    let registry = ActionRegistry::builtin(site());
    let ctx = StepContext::new(frame.clone(), site(), requests.clone());
    Harness {
        registry,
        frame,
        requests,
        ctx,
    }
}
