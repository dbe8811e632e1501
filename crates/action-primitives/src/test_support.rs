use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use url::Url;

use crate::frame::{
    CookieJar, Element, ElementRef, Frame, KeyValueStore, ScriptHost, ValueTracker,
};
use crate::types::DomEvent;

#[derive(Debug, Default)]
struct StubState {
    value: String,
    disabled: bool,
    tracker: Option<Arc<StubTracker>>,
    events: Vec<DomEvent>,
}

#[derive(Debug)]
pub struct StubElement {
    tag: String,
    state: Mutex<StubState>,
}

impl StubElement {
    pub fn new(tag: &str, value: &str) -> Arc<Self> {
        Arc::new(Self {
            tag: tag.to_string(),
            state: Mutex::new(StubState {
                value: value.to_string(),
                ..Default::default()
            }),
        })
    }

    pub fn with_tracker(self: Arc<Self>) -> Arc<Self> {
        {
            let mut state = self.state.lock();
            let current = state.value.clone();
            state.tracker = Some(Arc::new(StubTracker(Mutex::new(current))));
        }
        self
    }

    pub fn disabled(self: Arc<Self>) -> Arc<Self> {
        self.state.lock().disabled = true;
        self
    }

    pub fn events(&self) -> Vec<DomEvent> {
        self.state.lock().events.clone()
    }

    pub fn tracked_value(&self) -> Option<String> {
        self.state.lock().tracker.as_ref().map(|t| t.value())
    }
}

impl Element for StubElement {
    fn tag_name(&self) -> String {
        self.tag.clone()
    }

    fn value(&self) -> String {
        self.state.lock().value.clone()
    }

    fn set_value(&self, value: &str) {
        let mut state = self.state.lock();
        state.value = value.to_string();
        if let Some(tracker) = &state.tracker {
            tracker.set_value(value);
        }
    }

    fn value_tracker(&self) -> Option<Arc<dyn ValueTracker>> {
        self.state
            .lock()
            .tracker
            .clone()
            .map(|t| t as Arc<dyn ValueTracker>)
    }

    fn is_disabled(&self) -> bool {
        self.state.lock().disabled
    }

    fn text_content(&self) -> String {
        String::new()
    }

    fn dispatch_event(&self, event: &DomEvent) {
        self.state.lock().events.push(*event);
    }
}

#[derive(Debug)]
struct StubTracker(Mutex<String>);

impl ValueTracker for StubTracker {
    fn value(&self) -> String {
        self.0.lock().clone()
    }

    fn set_value(&self, value: &str) {
        *self.0.lock() = value.to_string();
    }
}

#[derive(Default)]
pub struct StubStore(Mutex<BTreeMap<String, String>>);

impl KeyValueStore for StubStore {
    fn keys(&self) -> Vec<String> {
        self.0.lock().keys().cloned().collect()
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.0.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.0.lock().insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.0.lock().remove(key);
    }
}

impl CookieJar for StubStore {
    fn names(&self) -> Vec<String> {
        self.keys()
    }

    fn remove(&self, name: &str) {
        self.remove_item(name);
    }
}

#[derive(Default)]
pub struct StubFrame {
    pub src: Mutex<Option<Url>>,
    pub elements: Mutex<HashMap<String, Vec<ElementRef>>>,
    pub storage: Arc<StubStore>,
    pub cookies: Arc<StubStore>,
    pub script_host: Option<Arc<dyn ScriptHost>>,
}

impl StubFrame {
    pub fn at(url: &str) -> Arc<Self> {
        Arc::new(Self {
            src: Mutex::new(Some(Url::parse(url).unwrap())),
            ..Default::default()
        })
    }

    pub fn insert(&self, selector: &str, element: ElementRef) {
        self.elements
            .lock()
            .entry(selector.to_string())
            .or_default()
            .push(element);
    }
}

impl Frame for StubFrame {
    fn src(&self) -> Option<Url> {
        self.src.lock().clone()
    }

    fn set_src(&self, url: Url) {
        *self.src.lock() = Some(url);
    }

    fn location(&self) -> Option<Url> {
        self.src()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<ElementRef> {
        self.elements
            .lock()
            .get(selector)
            .cloned()
            .unwrap_or_default()
    }

    fn local_storage(&self) -> Arc<dyn KeyValueStore> {
        self.storage.clone()
    }

    fn cookies(&self) -> Arc<dyn CookieJar> {
        self.cookies.clone()
    }

    fn reload(&self) {}

    fn script_host(&self) -> Option<Arc<dyn ScriptHost>> {
        self.script_host.clone()
    }
}
