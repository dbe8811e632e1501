mod common;

use action_primitives::ErrorKind;
use serde_json::{json, Value};
use stepframe_core_types::Step;
use stepframe_registry::{ParamType, RegistryError};

const EXPECTED: [(&str, &str); 15] = [
    ("reset", "resets the state"),
    ("type", "enter value into input"),
    ("click", "click element"),
    ("location", "verify page location"),
    ("exist", "should exist"),
    ("notExist", "should not exist"),
    ("contains", "should contain"),
    ("goto", "goto a page"),
    ("select", "select value from dropdown"),
    ("reload", "refresh the page"),
    ("xhr", "wait for request"),
    ("disabled", "should be disabled"),
    ("notDisabled", "should not be disabled"),
    ("wait", "wait for time to pass"),
    ("code", "custom code block"),
];

#[test]
fn catalog_lists_builtins_in_editor_order() {
    let registry = common::harness().registry;
    let catalog = registry.catalog();
    let listed: Vec<(&str, &str)> = catalog
        .iter()
        .map(|meta| (meta.action.as_str(), meta.label.as_str()))
        .collect();
    assert_eq!(listed, EXPECTED.to_vec());

    let hidden: Vec<&str> = catalog
        .iter()
        .filter(|meta| meta.hide_selector_input)
        .map(|meta| meta.action.as_str())
        .collect();
    assert_eq!(hidden, vec!["reset", "reload", "wait"]);
}

#[test]
fn catalog_serializes_for_the_editor() {
    let registry = common::harness().registry;
    let value = serde_json::to_value(registry.catalog()).unwrap();
    let click = &value[2];
    assert_eq!(click["action"], "click");
    assert_eq!(click["hideSelectorInput"], false);
    assert_eq!(
        click["params"][0],
        json!({"key": "forceClick", "type": "checkbox", "label": "Force click", "defaultValue": false})
    );
    assert_eq!(value[10]["params"][0]["options"], json!(["DELETE", "GET", "PATCH", "POST", "PUT"]));
}

fn sample_value(kind: ParamType, options: &[String], default: Option<&Value>) -> Value {
    if let Some(default) = default {
        return default.clone();
    }
    match kind {
        ParamType::Select => options.first().map(|key| json!(key)).unwrap_or(json!("")),
        ParamType::Checkbox => json!(false),
        ParamType::Number => json!(0),
        ParamType::Code => json!("cy.wait(0)"),
        ParamType::String => json!("x"),
    }
}

/// Both representations of every action can be invoked on a step built from
/// the action's own params.
#[tokio::test(start_paused = true)]
async fn every_action_generates_code_and_runs() {
    let harness = common::harness();
    let registry = &harness.registry;

    for definition in registry.actions() {
        let mut step = Step::new(definition.action()).with_selector("#user");
        for param in definition.params() {
            let options: Vec<String> = param.options.iter().map(|o| o.key().to_string()).collect();
            let value = sample_value(param.kind, &options, param.default_value.as_ref());
            step = step.with_arg(param.key.clone(), value);
        }

        let code = registry.generate_code(&step).unwrap();
        assert!(!code.is_empty(), "{} rendered no code", definition.action());

        let report = registry.run_in(&step, &harness.ctx).await;
        assert_eq!(report.action, definition.action());
        if let Some(failure) = &report.error {
            assert_ne!(
                failure.kind,
                ErrorKind::Dispatch,
                "{} could not be dispatched: {}",
                definition.action(),
                failure.message
            );
        }
    }
}

#[test]
fn defaults_fill_missing_args_for_codegen() {
    let registry = common::harness().registry;
    assert_eq!(
        registry.generate_code(&Step::new("wait")).unwrap(),
        "cy.wait(500)"
    );
    assert_eq!(
        registry.generate_code(&Step::new("code")).unwrap(),
        "console.log('hello, world')"
    );
    assert_eq!(
        registry
            .generate_code(&Step::new("wait").with_arg("timeout", Value::Null))
            .unwrap(),
        "cy.wait(500)"
    );
    assert_eq!(
        registry
            .generate_code(&Step::new("wait").with_arg("timeout", 20))
            .unwrap(),
        "cy.wait(20)"
    );
}

#[test]
fn unknown_action_is_rejected() {
    let registry = common::harness().registry;
    let err = registry.generate_code(&Step::new("hover")).unwrap_err();
    assert_eq!(err, RegistryError::UnknownAction("hover".into()));
    assert_eq!(err.kind(), ErrorKind::Dispatch);
}

#[test]
fn script_joins_steps_in_order() {
    let registry = common::harness().registry;
    let steps = vec![
        Step::new("reset"),
        Step::new("type")
            .with_selector("#user")
            .with_arg("typeContent", "bob"),
        Step::new("click").with_selector("#go"),
    ];
    assert_eq!(
        registry.generate_script(&steps).unwrap(),
        "cy.clearCookies()\ncy.clearLocalStorage()\ncy.visit('/login')\ncy.get('#user').clear().type('bob')\ncy.get('#go').click()"
    );
}
