use std::sync::Arc;

use action_primitives::{
    ActionError, Element, ErrorKind, EventKind, Frame, KeyValueStore, Surface, SurfaceConfig,
    WrapOptions,
};
use memory_frame::{MemoryFrame, NodeSpec, PageFixture, PageSpec};
use url::Url;

fn login_fixture() -> PageFixture {
    PageFixture::new().with_page(
        "/login",
        PageSpec::new(vec![NodeSpec::new("form").children(vec![
            NodeSpec::new("input").with_id("user").tracked(),
            NodeSpec::new("textarea").with_id("bio").with_value("hi"),
            NodeSpec::new("select").with_id("plan").tracked(),
            NodeSpec::new("button")
                .with_id("save")
                .with_text("Save")
                .disabled(),
        ])]),
    )
}

fn surface_on(frame: Arc<MemoryFrame>) -> Surface {
    let base = Url::parse("http://app.test/").unwrap();
    Surface::new(frame, SurfaceConfig::new(base))
}

fn loaded() -> (Arc<MemoryFrame>, Surface) {
    let frame = Arc::new(MemoryFrame::with_fixture(login_fixture()));
    let surface = surface_on(frame.clone());
    surface.visit("/login").unwrap();
    (frame, surface)
}

#[test]
fn typing_is_associative() {
    let (_, surface) = loaded();
    let split = surface.get("#user", WrapOptions::default()).unwrap();
    split.type_text("ab").type_text("cd");
    let split_value = split.element().value();

    let (_, surface) = loaded();
    let joined = surface.get("#user", WrapOptions::default()).unwrap();
    joined.type_text("abcd");

    assert_eq!(split_value, joined.element().value());
    assert_eq!(split_value, "abcd");
}

#[test]
fn clear_then_type_yields_exactly_the_argument() {
    let (_, surface) = loaded();
    let bio = surface.get("#bio", WrapOptions::default()).unwrap();
    bio.clear().type_text("x");
    assert_eq!(bio.element().value(), "x");
}

#[test]
fn framework_tracker_observes_every_mutation() {
    let (frame, surface) = loaded();
    let user = surface.get("#user", WrapOptions::default()).unwrap();
    user.type_text("a").type_text("b").clear();

    let changes: Vec<String> = frame
        .framework_changes()
        .into_iter()
        .map(|change| change.value)
        .collect();
    assert_eq!(changes, vec!["a", "ab", ""]);
}

#[test]
fn setting_value_without_rewind_is_invisible_to_the_framework() {
    let (frame, surface) = loaded();
    let user = surface.get("#user", WrapOptions::default()).unwrap();
    user.element().set_value("sneaky");
    user.element()
        .dispatch_event(&action_primitives::DomEvent::value_change(EventKind::Input));
    assert!(frame.framework_changes().is_empty());
}

#[test]
fn text_controls_get_input_and_others_get_change() {
    let (frame, surface) = loaded();
    surface
        .get("#user", WrapOptions::default())
        .unwrap()
        .type_text("a");
    surface
        .get("#plan", WrapOptions::default())
        .unwrap()
        .type_text("pro");

    let events = frame.events();
    assert_eq!(events[0].target, "input#user");
    assert_eq!(events[0].kind, EventKind::Input);
    assert_eq!(events[1].target, "select#plan");
    assert_eq!(events[1].kind, EventKind::Change);
    assert!(events.iter().all(|event| event.bubbles && event.simulated));
}

#[test]
fn disabled_click_requires_force() {
    let (frame, surface) = loaded();
    let err = surface
        .get("#save", WrapOptions::default())
        .unwrap()
        .click()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Guard);
    assert!(frame.events().is_empty());

    surface
        .get("#save", WrapOptions::forced())
        .unwrap()
        .click()
        .unwrap();
    let events = frame.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::Click);
}

#[test]
fn content_selector_resolves_against_the_document() {
    let (_, surface) = loaded();
    let selector = action_primitives::content_selector("Save");
    let found = surface.query(&selector);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].tag_name(), "BUTTON");
}

#[test]
fn cross_domain_visit_does_not_navigate() {
    let (frame, surface) = loaded();
    let err = surface.visit("https://elsewhere.test/login").unwrap_err();
    assert_eq!(err, ActionError::CrossDomain("elsewhere.test".into()));
    assert_eq!(frame.history().len(), 1);
    assert_eq!(frame.src().unwrap().as_str(), "http://app.test/login");
}

#[test]
fn clear_local_storage_keeps_reserved_namespace() {
    let frame = Arc::new(MemoryFrame::new());
    let storage = frame.storage();
    for key in ["a", "b", "test:session"] {
        storage.set_item(key, "v");
    }
    surface_on(frame.clone()).clear_local_storage();
    assert_eq!(storage.keys(), vec!["test:session".to_string()]);
}

#[test]
fn missing_element_is_a_resolution_error() {
    let (_, surface) = loaded();
    let err = surface
        .get("#nothing", WrapOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resolution);
}
