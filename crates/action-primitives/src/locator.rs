//! Turning a step's selector into a concrete query expression

use stepframe_core_types::{SelectType, Step};

/// Tags searched, in order, when a step selects by visible content.
pub const CONTENT_TAGS: [&str; 11] = [
    "input", "button", ".alert", "a", "p", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Build the query expression for a step.
///
/// Content selection expands to one `:contains(...)` clause per entry of
/// [`CONTENT_TAGS`], joined with the OR combinator. Nothing is escaped: text
/// that is not selector-safe yields an expression that matches nothing.
pub fn build_selector(step: &Step) -> String {
    match step.select_type {
        SelectType::Content => content_selector(&step.selector),
        SelectType::Css => step.selector.clone(),
    }
}

pub fn content_selector(text: &str) -> String {
    CONTENT_TAGS
        .iter()
        .map(|tag| format!("{tag}:contains({text})"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_selectors_pass_through() {
        let step = Step::new("click").with_selector("#save > span");
        assert_eq!(build_selector(&step), "#save > span");
    }

    #[test]
    fn content_selector_covers_every_tag_in_order() {
        let step = Step::new("click").with_content("Submit");
        let selector = build_selector(&step);
        let clauses: Vec<&str> = selector.split(", ").collect();
        assert_eq!(clauses.len(), CONTENT_TAGS.len());
        assert_eq!(clauses[0], "input:contains(Submit)");
        assert_eq!(clauses[2], ".alert:contains(Submit)");
        assert_eq!(clauses[10], "h6:contains(Submit)");
        for (clause, tag) in clauses.iter().zip(CONTENT_TAGS) {
            assert_eq!(*clause, format!("{tag}:contains(Submit)"));
        }
    }
}
