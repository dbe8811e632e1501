use std::collections::BTreeMap;
use std::sync::Arc;

use action_primitives::{
    CookieJar, ElementRef, EventKind, Frame, KeyValueStore, ScriptHost,
};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use stepframe_core_types::NetworkEvent;
use tracing::{debug, info, warn};
use url::Url;

use crate::dom::{is_form_control, Dom};
use crate::element::MemoryElement;
use crate::fixture::{NodeSpec, PageFixture, PageSpec};
use crate::selector::query_all;
use crate::storage::{MemoryCookieJar, MemoryStorage};

/// Receives every request a loaded page issues.
pub type RequestListener = Arc<dyn Fn(NetworkEvent) + Send + Sync>;

/// An event dispatched on an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub target: String,
    pub kind: EventKind,
    pub bubbles: bool,
    pub simulated: bool,
}

/// A value change the framework tracker noticed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkChange {
    pub target: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub target: String,
    pub value: String,
}

/// Observable state of the frame at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub src: Option<String>,
    pub title: Option<String>,
    pub controls: Vec<ControlState>,
    pub storage: BTreeMap<String, String>,
    pub cookies: Vec<String>,
    pub events: Vec<RecordedEvent>,
    pub framework_changes: Vec<FrameworkChange>,
    pub history: Vec<String>,
    pub reload_count: usize,
}

pub(crate) struct DocumentState {
    pub(crate) dom: RwLock<Dom>,
    pub(crate) events: Mutex<Vec<RecordedEvent>>,
    pub(crate) changes: Mutex<Vec<FrameworkChange>>,
}

#[derive(Default)]
struct Navigation {
    src: Option<Url>,
    history: Vec<Url>,
    reload_count: usize,
}

/// An embedded frame backed by page fixtures.
///
/// Navigating loads the fixture page registered for the target pathname; an
/// unknown pathname loads an empty document.
pub struct MemoryFrame {
    doc: Arc<DocumentState>,
    nav: Mutex<Navigation>,
    fixture: PageFixture,
    storage: Arc<MemoryStorage>,
    cookies: Arc<MemoryCookieJar>,
    script_host: RwLock<Option<Arc<dyn ScriptHost>>>,
    listener: RwLock<Option<RequestListener>>,
}

impl Default for MemoryFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFrame {
    pub fn new() -> Self {
        Self::with_fixture(PageFixture::default())
    }

    /// Frame serving `fixture`, with storage and cookies seeded from it.
    pub fn with_fixture(fixture: PageFixture) -> Self {
        let storage = Arc::new(MemoryStorage::default());
        for (key, value) in &fixture.storage {
            storage.set_item(key, value);
        }
        let cookies = Arc::new(MemoryCookieJar::default());
        for (name, value) in &fixture.cookies {
            cookies.set(name, value);
        }

        Self {
            doc: Arc::new(DocumentState {
                dom: RwLock::new(Dom::new(0)),
                events: Mutex::new(Vec::new()),
                changes: Mutex::new(Vec::new()),
            }),
            nav: Mutex::new(Navigation::default()),
            fixture,
            storage,
            cookies,
            script_host: RwLock::new(None),
            listener: RwLock::new(None),
        }
    }

    /// Frame whose current document is `body`, without navigating.
    pub fn with_body(body: Vec<NodeSpec>) -> Self {
        let frame = Self::new();
        frame.load_document(&PageSpec::new(body));
        frame
    }

    pub fn with_script_host(self, host: Arc<dyn ScriptHost>) -> Self {
        self.set_script_host(host);
        self
    }

    pub fn set_script_host(&self, host: Arc<dyn ScriptHost>) {
        *self.script_host.write() = Some(host);
    }

    /// Route requests issued by loaded pages to `listener`.
    pub fn set_request_listener(&self, listener: RequestListener) {
        *self.listener.write() = Some(listener);
    }

    pub fn fixture(&self) -> &PageFixture {
        &self.fixture
    }

    pub fn storage(&self) -> Arc<MemoryStorage> {
        self.storage.clone()
    }

    pub fn cookie_jar(&self) -> Arc<MemoryCookieJar> {
        self.cookies.clone()
    }

    pub fn title(&self) -> Option<String> {
        self.doc.dom.read().title.clone()
    }

    pub fn history(&self) -> Vec<Url> {
        self.nav.lock().history.clone()
    }

    pub fn reload_count(&self) -> usize {
        self.nav.lock().reload_count
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.doc.events.lock().clone()
    }

    pub fn framework_changes(&self) -> Vec<FrameworkChange> {
        self.doc.changes.lock().clone()
    }

    /// First element matching `selector` in the current document.
    pub fn element(&self, selector: &str) -> Option<MemoryElement> {
        let dom = self.doc.dom.read();
        let first = query_all(&dom, selector).ok()?.into_iter().next()?;
        Some(MemoryElement::new(self.doc.clone(), first, dom.generation))
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let controls = {
            let dom = self.doc.dom.read();
            dom.elements()
                .into_iter()
                .filter_map(|id| dom.element(id))
                .filter(|element| is_form_control(&element.tag) && element.tag != "BUTTON")
                .map(|element| ControlState {
                    target: element.describe(),
                    value: element.value.clone(),
                })
                .collect()
        };
        let nav = self.nav.lock();
        FrameSnapshot {
            src: nav.src.as_ref().map(Url::to_string),
            title: self.title(),
            controls,
            storage: self.storage.snapshot(),
            cookies: self.cookies.names(),
            events: self.events(),
            framework_changes: self.framework_changes(),
            history: nav.history.iter().map(Url::to_string).collect(),
            reload_count: nav.reload_count,
        }
    }

    fn load_document(&self, page: &PageSpec) {
        let mut dom = self.doc.dom.write();
        let generation = dom.generation + 1;
        *dom = Dom::from_specs(generation, page.title.clone(), &page.body);
    }

    /// Load the fixture page for `url` and announce its requests.
    fn load(&self, url: &Url) {
        let page = match self.fixture.page(url.path()) {
            Some(page) => page.clone(),
            None => {
                debug!(url = %url, "no fixture page for pathname, loading empty document");
                PageSpec::default()
            }
        };
        self.load_document(&page);

        let listener = self.listener.read().clone();
        for request in &page.requests {
            let resolved = match url.join(&request.url) {
                Ok(resolved) => resolved,
                Err(err) => {
                    warn!(url = %request.url, error = %err, "skipping seeded request");
                    continue;
                }
            };
            let event = NetworkEvent::from_url(&request.method, &resolved);
            debug!(method = %event.method, pathname = %event.pathname, "page issued request");
            if let Some(listener) = &listener {
                listener(event);
            }
        }
    }
}

impl Frame for MemoryFrame {
    fn src(&self) -> Option<Url> {
        self.nav.lock().src.clone()
    }

    fn set_src(&self, url: Url) {
        {
            let mut nav = self.nav.lock();
            nav.history.push(url.clone());
            nav.src = Some(url.clone());
        }
        info!(url = %url, "frame navigated");
        self.load(&url);
    }

    fn location(&self) -> Option<Url> {
        self.src()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<ElementRef> {
        let dom = self.doc.dom.read();
        match query_all(&dom, selector) {
            Ok(ids) => ids
                .into_iter()
                .map(|id| {
                    Arc::new(MemoryElement::new(self.doc.clone(), id, dom.generation))
                        as ElementRef
                })
                .collect(),
            Err(err) => {
                debug!(selector, error = %err, "selector matched nothing");
                Vec::new()
            }
        }
    }

    fn local_storage(&self) -> Arc<dyn KeyValueStore> {
        self.storage.clone()
    }

    fn cookies(&self) -> Arc<dyn CookieJar> {
        self.cookies.clone()
    }

    fn reload(&self) {
        let current = {
            let mut nav = self.nav.lock();
            nav.reload_count += 1;
            nav.src.clone()
        };
        info!("frame reloaded");
        match current {
            Some(url) => self.load(&url),
            None => {
                let mut dom = self.doc.dom.write();
                dom.generation += 1;
            }
        }
    }

    fn script_host(&self) -> Option<Arc<dyn ScriptHost>> {
        self.script_host.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_primitives::Element;

    fn fixture() -> PageFixture {
        PageFixture::new()
            .with_page(
                "/login",
                PageSpec::new(vec![
                    NodeSpec::new("input").with_id("user").with_value("ada"),
                    NodeSpec::new("button").with_text("Sign in"),
                ])
                .with_title("Login")
                .with_request("GET", "/api/me?fresh=1"),
            )
            .with_storage("theme", "dark")
            .with_cookie("sid", "abc")
    }

    #[test]
    fn navigation_loads_fixture_page() {
        let frame = MemoryFrame::with_fixture(fixture());
        frame.set_src(Url::parse("http://app.test/login").unwrap());
        assert_eq!(frame.title().as_deref(), Some("Login"));
        assert_eq!(frame.query_selector_all("#user").len(), 1);

        frame.set_src(Url::parse("http://app.test/elsewhere").unwrap());
        assert!(frame.query_selector_all("#user").is_empty());
        assert_eq!(frame.history().len(), 2);
    }

    #[test]
    fn seeded_state_is_visible() {
        let frame = MemoryFrame::with_fixture(fixture());
        assert_eq!(frame.storage().get_item("theme").as_deref(), Some("dark"));
        assert_eq!(frame.cookie_jar().get("sid").as_deref(), Some("abc"));
    }

    #[test]
    fn page_requests_reach_listener() {
        let frame = MemoryFrame::with_fixture(fixture());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        frame.set_request_listener(Arc::new(move |event| sink.lock().push(event)));

        frame.set_src(Url::parse("http://app.test/login").unwrap());
        frame.reload();

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].method, "GET");
        assert_eq!(seen[0].pathname, "/api/me");
        assert_eq!(seen[0].href, "http://app.test/api/me?fresh=1");
    }

    #[test]
    fn reload_detaches_old_handles_and_resets_document() {
        let frame = MemoryFrame::with_fixture(fixture());
        frame.set_src(Url::parse("http://app.test/login").unwrap());
        let before = frame.query_selector_all("#user").remove(0);
        before.set_value("changed");

        frame.reload();
        assert_eq!(frame.reload_count(), 1);
        assert_eq!(before.value(), "");
        let after = frame.query_selector_all("#user").remove(0);
        assert_eq!(after.value(), "ada");
    }

    #[test]
    fn malformed_selector_matches_nothing() {
        let frame = MemoryFrame::with_body(vec![NodeSpec::new("p").with_text("hi")]);
        assert!(frame.query_selector_all("p:contains(hi").is_empty());
        assert_eq!(frame.query_selector_all("p:contains(hi)").len(), 1);
    }
}
