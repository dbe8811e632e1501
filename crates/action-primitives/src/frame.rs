//! The embedded frame as seen by the engine.
//!
//! A host supplies one [`Frame`] per embedded browsing context. The engine
//! only needs navigation, a queryable document, persistent key-value storage,
//! the authoring page's cookies and, for the escape hatch, a script host.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::errors::ActionError;
use crate::primitives::Surface;
use crate::types::DomEvent;

/// Shared handle to one resolved element.
pub type ElementRef = Arc<dyn Element>;

/// One element of the frame's document.
pub trait Element: Send + Sync + fmt::Debug {
    /// Upper-case tag name, e.g. `INPUT`.
    fn tag_name(&self) -> String;

    /// Current value of a form control; empty for other elements.
    fn value(&self) -> String;

    /// Write through the element's native value setter.
    fn set_value(&self, value: &str);

    /// Change tracker a reactive framework attached to the element, if any.
    fn value_tracker(&self) -> Option<Arc<dyn ValueTracker>> {
        None
    }

    /// Whether the element matches the disabled-state predicate.
    fn is_disabled(&self) -> bool;

    /// Concatenated text of the element and its descendants.
    fn text_content(&self) -> String;

    fn dispatch_event(&self, event: &DomEvent);
}

/// The shadow copy of a control's value some frameworks keep to detect
/// changes. Rewinding it to the previous value makes the next event count as
/// a change.
pub trait ValueTracker: Send + Sync {
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
}

/// The frame's persistent key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn keys(&self) -> Vec<String>;
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// Cookies visible to the authoring page.
pub trait CookieJar: Send + Sync {
    fn names(&self) -> Vec<String>;
    fn remove(&self, name: &str);
}

/// Evaluation context for late-bound code.
///
/// Code evaluated here receives the surface and runs with whatever authority
/// the host grants it. Nothing in the engine isolates it further.
#[async_trait]
pub trait ScriptHost: Send + Sync {
    async fn evaluate(&self, code: &str, surface: &Surface) -> Result<Value, ActionError>;
}

/// An embedded, navigable browsing context.
pub trait Frame: Send + Sync {
    /// Current navigation target.
    fn src(&self) -> Option<Url>;

    /// Point the frame at a new navigation target.
    fn set_src(&self, url: Url);

    /// Location of the document currently loaded in the frame.
    fn location(&self) -> Option<Url>;

    /// Resolve a query expression against the frame's document. Malformed
    /// expressions match nothing.
    fn query_selector_all(&self, selector: &str) -> Vec<ElementRef>;

    fn local_storage(&self) -> Arc<dyn KeyValueStore>;

    fn cookies(&self) -> Arc<dyn CookieJar>;

    fn reload(&self);

    fn script_host(&self) -> Option<Arc<dyn ScriptHost>> {
        None
    }
}
