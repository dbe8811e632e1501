//! Arena document: nodes addressed by index, linked to their parent and children

use std::collections::{BTreeMap, HashMap};

use crate::fixture::NodeSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    /// Upper-case tag name
    pub(crate) tag: String,
    pub(crate) attrs: BTreeMap<String, String>,
    pub(crate) value: String,
    /// Shadow copy a reactive framework keeps of the control's value
    pub(crate) tracker: Option<String>,
}

impl ElementData {
    pub(crate) fn has_class(&self, class_name: &str) -> bool {
        self.attrs
            .get("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
    }

    pub(crate) fn disabled_attr(&self) -> bool {
        self.attrs.contains_key("disabled")
    }

    /// `tag#id.class` label used in logs and snapshots.
    pub(crate) fn describe(&self) -> String {
        let mut label = self.tag.to_ascii_lowercase();
        if let Some(id) = self.attrs.get("id") {
            label.push('#');
            label.push_str(id);
        }
        if let Some(classes) = self.attrs.get("class") {
            for class_name in classes.split_whitespace() {
                label.push('.');
                label.push_str(class_name);
            }
        }
        label
    }
}

/// One loaded document.
///
/// `generation` changes whenever the frame replaces its document, so element
/// handles from an earlier page can tell they are detached.
#[derive(Debug, Clone)]
pub(crate) struct Dom {
    nodes: Vec<Node>,
    root: NodeId,
    id_index: HashMap<String, Vec<NodeId>>,
    pub(crate) generation: u64,
    pub(crate) title: Option<String>,
}

impl Dom {
    pub(crate) fn new(generation: u64) -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: NodeId(0),
            id_index: HashMap::new(),
            generation,
            title: None,
        }
    }

    pub(crate) fn from_specs(generation: u64, title: Option<String>, body: &[NodeSpec]) -> Self {
        let mut dom = Self::new(generation);
        dom.title = title;
        let root = dom.root;
        for spec in body {
            dom.build(root, spec);
        }
        dom
    }

    fn build(&mut self, parent: NodeId, spec: &NodeSpec) -> NodeId {
        let mut attrs = spec.attrs.clone();
        if let Some(id) = &spec.id {
            attrs.insert("id".to_string(), id.clone());
        }
        if let Some(class_name) = &spec.class {
            attrs.insert("class".to_string(), class_name.clone());
        }
        if spec.disabled {
            attrs.insert("disabled".to_string(), String::new());
        }
        let value = spec.value.clone().unwrap_or_default();
        let tracker = spec.tracked.then(|| value.clone());

        let node = self.create_node(
            Some(parent),
            NodeKind::Element(ElementData {
                tag: spec.tag.to_ascii_uppercase(),
                attrs,
                value,
                tracker,
            }),
        );
        if let Some(id) = &spec.id {
            self.id_index.entry(id.clone()).or_default().push(node);
        }
        if let Some(text) = &spec.text {
            self.create_node(Some(node), NodeKind::Text(text.clone()));
        }
        for child in &spec.children {
            self.build(node, child);
        }
        node
    }

    fn create_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(id.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    pub(crate) fn by_id(&self, id: &str) -> Vec<NodeId> {
        self.id_index.get(id).cloned().unwrap_or_default()
    }

    /// Every element in document order.
    pub(crate) fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(self.root, &mut out);
        out
    }

    fn collect_elements_dfs(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node.0].children {
            if matches!(self.nodes[child.0].kind, NodeKind::Element(_)) {
                out.push(*child);
            }
            self.collect_elements_dfs(*child, out);
        }
    }

    pub(crate) fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id.0) else {
            return;
        };
        if let NodeKind::Text(text) = &node.kind {
            out.push_str(text);
        }
        for child in &node.children {
            self.collect_text(*child, out);
        }
    }

    /// Disabled attribute on a form control or fieldset, or on an enclosing
    /// fieldset. Other elements ignore the attribute.
    pub(crate) fn is_effectively_disabled(&self, id: NodeId) -> bool {
        let Some(element) = self.element(id) else {
            return false;
        };
        if !is_form_control(&element.tag) && element.tag != "FIELDSET" {
            return false;
        }
        if element.disabled_attr() {
            return true;
        }

        let mut cursor = self.parent(id);
        while let Some(parent) = cursor {
            if self
                .element(parent)
                .is_some_and(|p| p.tag == "FIELDSET" && p.disabled_attr())
            {
                return true;
            }
            cursor = self.parent(parent);
        }
        false
    }
}

pub(crate) fn is_form_control(tag: &str) -> bool {
    matches!(tag, "INPUT" | "BUTTON" | "SELECT" | "TEXTAREA" | "OPTION")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dom {
        Dom::from_specs(
            1,
            None,
            &[NodeSpec::new("fieldset").disabled().child(
                NodeSpec::new("label")
                    .with_text("Name ")
                    .child(NodeSpec::new("input").with_id("name").with_value("Ada")),
            )],
        )
    }

    #[test]
    fn elements_are_in_document_order() {
        let dom = sample();
        let tags: Vec<String> = dom
            .elements()
            .into_iter()
            .filter_map(|id| dom.element(id).map(|e| e.tag.clone()))
            .collect();
        assert_eq!(tags, vec!["FIELDSET", "LABEL", "INPUT"]);
    }

    #[test]
    fn fieldset_disables_nested_controls_only() {
        let dom = sample();
        let input = dom.by_id("name")[0];
        assert!(dom.is_effectively_disabled(input));
        let label = dom.parent(input).unwrap();
        assert!(!dom.is_effectively_disabled(label));
    }

    #[test]
    fn disabled_attribute_only_counts_on_controls() {
        let dom = Dom::from_specs(
            1,
            None,
            &[
                NodeSpec::new("div").with_id("panel").disabled(),
                NodeSpec::new("a").with_id("link").disabled(),
                NodeSpec::new("textarea").with_id("notes").disabled(),
            ],
        );
        assert!(!dom.is_effectively_disabled(dom.by_id("panel")[0]));
        assert!(!dom.is_effectively_disabled(dom.by_id("link")[0]));
        assert!(dom.is_effectively_disabled(dom.by_id("notes")[0]));
        assert!(dom.is_effectively_disabled(sample().elements()[0]));
    }

    #[test]
    fn text_content_collects_descendants() {
        let dom = sample();
        let fieldset = dom.elements()[0];
        assert_eq!(dom.text_content(fieldset), "Name ");
    }
}
