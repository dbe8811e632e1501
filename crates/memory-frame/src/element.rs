use std::fmt;
use std::sync::Arc;

use action_primitives::{DomEvent, Element, EventKind, ValueTracker};

use crate::dom::{ElementData, NodeId};
use crate::frame::{DocumentState, FrameworkChange, RecordedEvent};

/// Handle to one element of the frame's current document.
///
/// Handles taken before the frame loaded another document are detached: they
/// read as empty and ignore writes.
#[derive(Clone)]
pub struct MemoryElement {
    doc: Arc<DocumentState>,
    node: NodeId,
    generation: u64,
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryElement")
            .field("node", &self.node)
            .field("generation", &self.generation)
            .finish()
    }
}

impl MemoryElement {
    pub(crate) fn new(doc: Arc<DocumentState>, node: NodeId, generation: u64) -> Self {
        Self {
            doc,
            node,
            generation,
        }
    }

    pub fn node_id(&self) -> NodeId {
        self.node
    }

    pub fn is_attached(&self) -> bool {
        self.doc.dom.read().generation == self.generation
    }

    pub fn attribute(&self, key: &str) -> Option<String> {
        self.read(|element| element.attrs.get(key).cloned()).flatten()
    }

    /// `tag#id.class` label of the element.
    pub fn describe(&self) -> String {
        self.read(ElementData::describe).unwrap_or_default()
    }

    fn read<T>(&self, f: impl FnOnce(&ElementData) -> T) -> Option<T> {
        let dom = self.doc.dom.read();
        if dom.generation != self.generation {
            return None;
        }
        dom.element(self.node).map(f)
    }

    fn write<T>(&self, f: impl FnOnce(&mut ElementData) -> T) -> Option<T> {
        let mut dom = self.doc.dom.write();
        if dom.generation != self.generation {
            return None;
        }
        dom.element_mut(self.node).map(f)
    }
}

impl Element for MemoryElement {
    fn tag_name(&self) -> String {
        self.read(|element| element.tag.clone()).unwrap_or_default()
    }

    fn value(&self) -> String {
        self.read(|element| element.value.clone()).unwrap_or_default()
    }

    /// Writes also refresh the tracker, the way a framework that shadows the
    /// value setter would. A change is only observed when the tracker is
    /// rewound before the event fires.
    fn set_value(&self, value: &str) {
        self.write(|element| {
            element.value = value.to_string();
            if let Some(tracker) = element.tracker.as_mut() {
                *tracker = value.to_string();
            }
        });
    }

    fn value_tracker(&self) -> Option<Arc<dyn ValueTracker>> {
        let tracked = self.read(|element| element.tracker.is_some())?;
        tracked.then(|| Arc::new(MemoryTracker(self.clone())) as Arc<dyn ValueTracker>)
    }

    fn is_disabled(&self) -> bool {
        let dom = self.doc.dom.read();
        dom.generation == self.generation && dom.is_effectively_disabled(self.node)
    }

    fn text_content(&self) -> String {
        let dom = self.doc.dom.read();
        if dom.generation != self.generation {
            return String::new();
        }
        dom.text_content(self.node)
    }

    fn dispatch_event(&self, event: &DomEvent) {
        let observed = self.write(|element| {
            let change = match event.kind {
                EventKind::Input | EventKind::Change => match element.tracker.as_mut() {
                    Some(tracker) if *tracker != element.value => {
                        *tracker = element.value.clone();
                        Some(element.value.clone())
                    }
                    _ => None,
                },
                EventKind::Click => None,
            };
            (element.describe(), change)
        });

        let Some((target, change)) = observed else {
            return;
        };
        self.doc.events.lock().push(RecordedEvent {
            target: target.clone(),
            kind: event.kind,
            bubbles: event.bubbles,
            simulated: event.simulated,
        });
        if let Some(value) = change {
            self.doc
                .changes
                .lock()
                .push(FrameworkChange { target, value });
        }
    }
}

struct MemoryTracker(MemoryElement);

impl ValueTracker for MemoryTracker {
    fn value(&self) -> String {
        self.0
            .read(|element| element.tracker.clone())
            .flatten()
            .unwrap_or_default()
    }

    fn set_value(&self, value: &str) {
        self.0.write(|element| {
            if let Some(tracker) = element.tracker.as_mut() {
                *tracker = value.to_string();
            }
        });
    }
}
