//! Selector engine over the arena document
//!
//! Supported: selector groups (`,`), descendant and child combinators, type
//! and universal selectors, `#id`, `.class`, `[attr]`, `[attr=value]`, and the
//! `:disabled`, `:enabled` and `:contains(text)` pseudo-classes.

use std::collections::HashSet;

use crate::dom::{Dom, NodeId};
use crate::errors::DomError;

type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PseudoClass {
    Disabled,
    Enabled,
    Contains(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SelectorStep {
    tag: Option<String>,
    universal: bool,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
    pseudo_classes: Vec<PseudoClass>,
}

impl SelectorStep {
    fn id_only(&self) -> Option<&str> {
        if !self.universal
            && self.tag.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudo_classes.is_empty()
        {
            self.id.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectorPart {
    step: SelectorStep,
    // Relation to the part on the left.
    combinator: Option<Combinator>,
}

/// Check that `selector` parses.
pub fn validate_selector(selector: &str) -> Result<()> {
    parse_selector_groups(selector).map(|_| ())
}

/// Elements matching `selector` in document order, without duplicates.
pub(crate) fn query_all(dom: &Dom, selector: &str) -> Result<Vec<NodeId>> {
    let groups = parse_selector_groups(selector)?;

    if groups.len() == 1 && groups[0].len() == 1 {
        if let Some(id) = groups[0][0].step.id_only() {
            return Ok(dom.by_id(id));
        }
    }

    let mut seen = HashSet::new();
    let mut matched = Vec::new();
    for candidate in dom.elements() {
        if groups
            .iter()
            .any(|parts| matches_chain(dom, candidate, parts))
            && seen.insert(candidate)
        {
            matched.push(candidate);
        }
    }
    Ok(matched)
}

fn matches_chain(dom: &Dom, node: NodeId, parts: &[SelectorPart]) -> bool {
    let Some(last) = parts.last() else {
        return false;
    };
    if !matches_step(dom, node, &last.step) {
        return false;
    }

    let mut current = node;
    for idx in (1..parts.len()).rev() {
        let prev_step = &parts[idx - 1].step;
        let combinator = parts[idx].combinator.unwrap_or(Combinator::Descendant);

        let matched = match combinator {
            Combinator::Child => dom
                .parent(current)
                .filter(|parent| matches_step(dom, *parent, prev_step)),
            Combinator::Descendant => {
                let mut cursor = dom.parent(current);
                let mut found = None;
                while let Some(parent) = cursor {
                    if matches_step(dom, parent, prev_step) {
                        found = Some(parent);
                        break;
                    }
                    cursor = dom.parent(parent);
                }
                found
            }
        };

        let Some(matched) = matched else {
            return false;
        };
        current = matched;
    }
    true
}

fn matches_step(dom: &Dom, node: NodeId, step: &SelectorStep) -> bool {
    let Some(element) = dom.element(node) else {
        return false;
    };

    if let Some(tag) = &step.tag {
        if !element.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }

    if let Some(id) = &step.id {
        if element.attrs.get("id") != Some(id) {
            return false;
        }
    }

    if step
        .classes
        .iter()
        .any(|class_name| !element.has_class(class_name))
    {
        return false;
    }

    for cond in &step.attrs {
        let matched = match cond {
            AttrCondition::Exists { key } => element.attrs.contains_key(key),
            AttrCondition::Eq { key, value } => element.attrs.get(key) == Some(value),
        };
        if !matched {
            return false;
        }
    }

    step.pseudo_classes.iter().all(|pseudo| match pseudo {
        PseudoClass::Disabled => dom.is_effectively_disabled(node),
        PseudoClass::Enabled => !dom.is_effectively_disabled(node),
        PseudoClass::Contains(text) => dom.text_content(node).contains(text.as_str()),
    })
}

fn unsupported(selector: &str) -> DomError {
    DomError::UnsupportedSelector(selector.to_string())
}

fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    split_top_level(selector, |ch| ch == ',')?
        .into_iter()
        .map(|group| parse_selector_chain(&group))
        .collect()
}

/// Split on `is_separator` outside brackets and parentheses. Empty pieces are
/// an error.
fn split_top_level(selector: &str, is_separator: impl Fn(char) -> bool) -> Result<Vec<String>> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut paren_depth = 0usize;

    for ch in selector.chars() {
        match ch {
            '[' => bracket_depth += 1,
            ']' => {
                bracket_depth = bracket_depth
                    .checked_sub(1)
                    .ok_or_else(|| unsupported(selector))?
            }
            '(' => paren_depth += 1,
            ')' => {
                paren_depth = paren_depth
                    .checked_sub(1)
                    .ok_or_else(|| unsupported(selector))?
            }
            ch if bracket_depth == 0 && paren_depth == 0 && is_separator(ch) => {
                let trimmed = current.trim();
                if trimmed.is_empty() {
                    return Err(unsupported(selector));
                }
                pieces.push(trimmed.to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }

    if bracket_depth != 0 || paren_depth != 0 {
        return Err(unsupported(selector));
    }
    let trimmed = current.trim();
    if trimmed.is_empty() {
        return Err(unsupported(selector));
    }
    pieces.push(trimmed.to_string());
    Ok(pieces)
}

fn tokenize(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut paren_depth = 0usize;

    let flush = |current: &mut String, tokens: &mut Vec<String>| {
        if !current.trim().is_empty() {
            tokens.push(current.trim().to_string());
        }
        current.clear();
    };

    for ch in selector.chars() {
        match ch {
            '[' => bracket_depth += 1,
            ']' => bracket_depth = bracket_depth.saturating_sub(1),
            '(' => paren_depth += 1,
            ')' => paren_depth = paren_depth.saturating_sub(1),
            '>' if bracket_depth == 0 && paren_depth == 0 => {
                flush(&mut current, &mut tokens);
                tokens.push(">".to_string());
                continue;
            }
            ch if ch.is_ascii_whitespace() && bracket_depth == 0 && paren_depth == 0 => {
                flush(&mut current, &mut tokens);
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    flush(&mut current, &mut tokens);
    Ok(tokens)
}

fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let mut parts = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize(selector)? {
        if token == ">" {
            if pending.is_some() || parts.is_empty() {
                return Err(unsupported(selector));
            }
            pending = Some(Combinator::Child);
            continue;
        }

        let step = parse_selector_step(&token)?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts.push(SelectorPart { step, combinator });
    }

    if parts.is_empty() || pending.is_some() {
        return Err(unsupported(selector));
    }
    Ok(parts)
}

fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if step.universal || step.tag.is_some() {
                    return Err(unsupported(part));
                }
                step.universal = true;
                i += 1;
            }
            b'#' => {
                let (id, next) = parse_ident(part, i + 1).ok_or_else(|| unsupported(part))?;
                if step.id.replace(id).is_some() {
                    return Err(unsupported(part));
                }
                i = next;
            }
            b'.' => {
                let (class_name, next) =
                    parse_ident(part, i + 1).ok_or_else(|| unsupported(part))?;
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (cond, next) = parse_attr_condition(part, i)?;
                step.attrs.push(cond);
                i = next;
            }
            b':' => {
                let (pseudo, next) = parse_pseudo(part, i + 1)?;
                step.pseudo_classes.push(pseudo);
                i = next;
            }
            _ => {
                if i != 0 {
                    return Err(unsupported(part));
                }
                let (tag, next) = parse_ident(part, i).ok_or_else(|| unsupported(part))?;
                step.tag = Some(tag);
                i = next;
            }
        }
    }
    Ok(step)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn parse_ident(part: &str, start: usize) -> Option<(String, usize)> {
    let bytes = part.as_bytes();
    let mut end = start;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    (end > start).then(|| (part[start..end].to_string(), end))
}

fn parse_attr_condition(part: &str, start: usize) -> Result<(AttrCondition, usize)> {
    let close = part[start..]
        .find(']')
        .map(|offset| start + offset)
        .ok_or_else(|| unsupported(part))?;
    let body = part[start + 1..close].trim();

    let cond = match body.split_once('=') {
        None => {
            let (key, end) = parse_ident(body, 0).ok_or_else(|| unsupported(part))?;
            if end != body.len() {
                return Err(unsupported(part));
            }
            AttrCondition::Exists { key }
        }
        Some((key, value)) => {
            let key = key.trim();
            if key.is_empty() || !key.bytes().all(is_ident_byte) {
                return Err(unsupported(part));
            }
            AttrCondition::Eq {
                key: key.to_string(),
                value: unquote(value.trim()).to_string(),
            }
        }
    };
    Ok((cond, close + 1))
}

fn parse_pseudo(part: &str, start: usize) -> Result<(PseudoClass, usize)> {
    let (name, next) = parse_ident(part, start).ok_or_else(|| unsupported(part))?;
    match name.as_str() {
        "disabled" => Ok((PseudoClass::Disabled, next)),
        "enabled" => Ok((PseudoClass::Enabled, next)),
        "contains" => {
            if part.as_bytes().get(next) != Some(&b'(') {
                return Err(unsupported(part));
            }
            let close = matching_paren(part, next).ok_or_else(|| unsupported(part))?;
            let text = unquote(part[next + 1..close].trim());
            Ok((PseudoClass::Contains(text.to_string()), close + 1))
        }
        _ => Err(unsupported(part)),
    }
}

fn matching_paren(part: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, ch) in part[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    raw
}
