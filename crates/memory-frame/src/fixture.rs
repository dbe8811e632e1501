//! Page fixtures: the documents the in-memory frame serves per pathname
//!
//! ```yaml
//! pages:
//!   /login:
//!     title: Login
//!     body:
//!       - tag: input
//!         id: user
//!         tracked: true
//!       - tag: button
//!         text: Sign in
//!     requests:
//!       - method: POST
//!         url: /api/session
//! storage:
//!   theme: dark
//! cookies:
//!   sid: abc123
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::DomError;

/// Declarative description of one element and its subtree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub disabled: bool,
    /// Attach a framework value tracker to the control
    pub tracked: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class = Some(class_name.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn tracked(mut self) -> Self {
        self.tracked = true;
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: Vec<NodeSpec>) -> Self {
        self.children.extend(children);
        self
    }
}

/// A request the page issues as soon as it loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRequest {
    pub method: String,
    /// Resolved against the page URL
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: Vec<NodeSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<SeededRequest>,
}

impl PageSpec {
    pub fn new(body: Vec<NodeSpec>) -> Self {
        Self {
            body,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_request(mut self, method: impl Into<String>, url: impl Into<String>) -> Self {
        self.requests.push(SeededRequest {
            method: method.into(),
            url: url.into(),
        });
        self
    }
}

/// Pages keyed by pathname plus the persisted state the site starts with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFixture {
    pub pages: BTreeMap<String, PageSpec>,
    pub storage: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
}

impl PageFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, pathname: impl Into<String>, page: PageSpec) -> Self {
        self.pages.insert(pathname.into(), page);
        self
    }

    pub fn with_storage(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.storage.insert(key.into(), value.into());
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn page(&self, pathname: &str) -> Option<&PageSpec> {
        self.pages.get(pathname)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, DomError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DomError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DomError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }
}
