//! Chain execution error types

use std::fmt;

use action_primitives::{ActionError, ErrorKind};
use thiserror::Error;

/// Methods dispatched so far in one chain, failing link included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainPath(Vec<String>);

impl ChainPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, method: impl Into<String>) {
        self.0.push(method.into());
    }

    pub fn methods(&self) -> &[String] {
        &self.0
    }

    /// `get.clear`
    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

/// Renders as `cy.get().clear()`.
impl fmt::Display for ChainPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cy")?;
        for method in &self.0 {
            write!(f, ".{method}()")?;
        }
        Ok(())
    }
}

/// Chain execution errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The current context has no method of that name
    #[error("{chain} is not a function")]
    NotAFunction { chain: ChainPath },

    /// A dispatched link failed; the original error is kept as-is
    #[error("{chain}: {source}")]
    LinkFailed {
        chain: ChainPath,
        #[source]
        source: ActionError,
    },

    /// Invocation with nothing to dispatch
    #[error("Invalid chain: {0}")]
    InvalidChain(String),
}

impl FlowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FlowError::NotAFunction { .. } | FlowError::InvalidChain(_) => ErrorKind::Dispatch,
            FlowError::LinkFailed { source, .. } => source.kind(),
        }
    }

    pub fn chain(&self) -> Option<&ChainPath> {
        match self {
            FlowError::NotAFunction { chain } | FlowError::LinkFailed { chain, .. } => Some(chain),
            FlowError::InvalidChain(_) => None,
        }
    }

    /// The error to hand back to a caller that only speaks [`ActionError`].
    pub fn into_action_error(self) -> ActionError {
        match self {
            FlowError::LinkFailed { source, .. } => source,
            other => ActionError::Script(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(methods: &[&str]) -> ChainPath {
        let mut chain = ChainPath::new();
        for method in methods {
            chain.push(*method);
        }
        chain
    }

    #[test]
    fn renders_call_chain() {
        let chain = path(&["get", "clear"]);
        assert_eq!(chain.dotted(), "get.clear");
        assert_eq!(
            FlowError::NotAFunction { chain }.to_string(),
            "cy.get().clear() is not a function"
        );
    }

    #[test]
    fn link_failure_keeps_source_kind() {
        let err = FlowError::LinkFailed {
            chain: path(&["get"]),
            source: ActionError::NoElement("#x".into()),
        };
        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert_eq!(
            err.to_string(),
            "cy.get(): No element found matching selector: #x"
        );
        assert_eq!(
            err.into_action_error(),
            ActionError::NoElement("#x".into())
        );
    }
}
