//! Element wrapper - framework-visible typing and clicking on one element set

use std::future::Future;

use tracing::debug;

use crate::errors::ActionError;
use crate::frame::{Element, ElementRef};
use crate::types::{DomEvent, EventKind, WrapOptions};

/// Label used when an element was wrapped without a selector.
pub const UNKNOWN_ELEMENT: &str = "(unknown element)";

/// Write `value` into a form control so that reactive frameworks notice.
///
/// Setting the value alone is not enough for frameworks that shadow the
/// native setter: their tracker would already hold the new value and the
/// following event would look like a no-op. The tracker is therefore rewound
/// to the previous value before the event is dispatched.
pub fn set_input_value(element: &dyn Element, value: &str) {
    let last_value = element.value();
    element.set_value(value);

    let kind = if is_text_like(element) {
        EventKind::Input
    } else {
        EventKind::Change
    };

    if let Some(tracker) = element.value_tracker() {
        tracker.set_value(&last_value);
    }

    element.dispatch_event(&DomEvent::value_change(kind));
}

fn is_text_like(element: &dyn Element) -> bool {
    let tag = element.tag_name();
    tag.eq_ignore_ascii_case("input") || tag.eq_ignore_ascii_case("textarea")
}

/// Handle around a non-empty set of resolved elements.
///
/// Mutations act on the first element; the disabled predicate holds when any
/// element in the set is disabled.
#[derive(Debug, Clone)]
pub struct ElementWrapper {
    label: String,
    targets: Vec<ElementRef>,
    options: WrapOptions,
}

impl ElementWrapper {
    pub fn new(
        label: impl Into<String>,
        targets: Vec<ElementRef>,
        options: WrapOptions,
    ) -> Result<Self, ActionError> {
        let label = label.into();
        if targets.is_empty() {
            return Err(ActionError::EmptyTarget(label));
        }
        Ok(Self {
            label,
            targets,
            options,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn options(&self) -> &WrapOptions {
        &self.options
    }

    pub fn with_options(mut self, options: WrapOptions) -> Self {
        self.options = options;
        self
    }

    /// First element of the wrapped set.
    pub fn element(&self) -> &ElementRef {
        &self.targets[0]
    }

    pub fn targets(&self) -> &[ElementRef] {
        &self.targets
    }

    pub fn is_disabled(&self) -> bool {
        self.targets.iter().any(|target| target.is_disabled())
    }

    /// Append `value` to the element's current value.
    pub fn type_text(&self, value: &str) -> &Self {
        let element = self.element();
        let next = format!("{}{}", element.value(), value);
        debug!(target_label = %self.label, typed = value.len(), "typing into element");
        set_input_value(element.as_ref(), &next);
        self
    }

    pub fn clear(&self) -> &Self {
        debug!(target_label = %self.label, "clearing element");
        set_input_value(self.element().as_ref(), "");
        self
    }

    pub fn click(&self) -> Result<&Self, ActionError> {
        if !self.options.force && self.is_disabled() {
            return Err(ActionError::DisabledElement(self.label.clone()));
        }
        debug!(target_label = %self.label, force = self.options.force, "clicking element");
        self.element().dispatch_event(&DomEvent::click());
        Ok(self)
    }

    /// Hand the wrapped elements to `f` and await its result.
    pub async fn then<F, Fut, T>(&self, f: F) -> T
    where
        F: FnOnce(Vec<ElementRef>) -> Fut,
        Fut: Future<Output = T>,
    {
        f(self.targets.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubElement;
    use std::sync::Arc;

    fn wrap(element: Arc<StubElement>, options: WrapOptions) -> ElementWrapper {
        ElementWrapper::new("#field", vec![element as ElementRef], options).unwrap()
    }

    #[test]
    fn empty_target_set_is_rejected() {
        let err = ElementWrapper::new("#missing", Vec::new(), WrapOptions::default()).unwrap_err();
        assert_eq!(err, ActionError::EmptyTarget("#missing".into()));
    }

    #[test]
    fn typing_appends_and_dispatches_input() {
        let input = StubElement::new("INPUT", "ab");
        let wrapper = wrap(input.clone(), WrapOptions::default());
        wrapper.type_text("c").type_text("d");
        assert_eq!(input.value(), "abcd");
        let events = input.events();
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|e| e.kind == EventKind::Input && e.bubbles && e.simulated));
    }

    #[test]
    fn non_text_controls_receive_change() {
        let select = StubElement::new("SELECT", "");
        set_input_value(select.as_ref(), "two");
        assert_eq!(select.events()[0].kind, EventKind::Change);
    }

    #[test]
    fn tracker_is_rewound_to_previous_value() {
        let input = StubElement::new("INPUT", "old").with_tracker();
        set_input_value(input.as_ref(), "new");
        assert_eq!(input.value(), "new");
        assert_eq!(input.tracked_value().as_deref(), Some("old"));
    }

    #[test]
    fn disabled_click_needs_force() {
        let button = StubElement::new("BUTTON", "").disabled();
        let err = wrap(button.clone(), WrapOptions::default())
            .click()
            .unwrap_err();
        assert!(matches!(err, ActionError::DisabledElement(_)));
        assert!(button.events().is_empty());

        wrap(button.clone(), WrapOptions::forced()).click().unwrap();
        assert_eq!(button.events()[0].kind, EventKind::Click);
    }

    #[tokio::test]
    async fn then_receives_wrapped_targets() {
        let input = StubElement::new("INPUT", "x");
        let wrapper = wrap(input, WrapOptions::default());
        let count = wrapper.then(|targets| async move { targets.len() }).await;
        assert_eq!(count, 1);
    }
}
