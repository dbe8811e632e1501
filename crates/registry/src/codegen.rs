//! Rendering helpers for generated test code.
//!
//! Generated statements use the `cy.<method>(args)` call-chain form. String
//! arguments are single-quoted with backslash escapes, so any selector or
//! typed text round-trips through the chain script parser.

use stepframe_core_types::Step;

/// `'text'` with quotes, backslashes and line breaks escaped.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// `{ key: value, ... }`, or nothing when every field was omitted.
pub fn options_object(fields: &[(&str, Option<String>)]) -> Option<String> {
    let present: Vec<String> = fields
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|value| format!("{key}: {value}")))
        .collect();
    if present.is_empty() {
        None
    } else {
        Some(format!("{{ {} }}", present.join(", ")))
    }
}

/// `method(arg, arg)`
pub fn call(method: &str, args: impl IntoIterator<Item = String>) -> String {
    format!("{method}({})", args.into_iter().collect::<Vec<_>>().join(", "))
}

/// `method()`
pub fn bare(method: &str) -> String {
    format!("{method}()")
}

/// `cy.a(..).b(..)`
pub fn chain(links: impl IntoIterator<Item = String>) -> String {
    std::iter::once("cy".to_string())
        .chain(links)
        .collect::<Vec<_>>()
        .join(".")
}

/// Timeout option for the subject lookup; omitted when unset or zero.
pub fn timeout_option(step: &Step) -> Option<String> {
    options_object(&[("timeout", step.timeout_ms().map(|ms| ms.to_string()))])
}

/// The lookup a step's assertion or interaction starts from: `get(selector)`
/// for query expressions, `contains(text)` for content selection.
pub fn subject(step: &Step, with_timeout: bool) -> String {
    let method = if step.is_content_select() {
        "contains"
    } else {
        "get"
    };
    let timeout = if with_timeout {
        timeout_option(step)
    } else {
        None
    };
    call(method, std::iter::once(quote(&step.selector)).chain(timeout))
}
