//! Error types for action primitives

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of an [`ActionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// A wrapper was built around zero elements
    Construction,
    /// A guard refused the operation (disabled click, foreign domain, bad wait)
    Guard,
    /// A selector matched nothing, or matched something it should not have
    Resolution,
    /// A call referenced something the current context cannot do
    Dispatch,
    /// A verification did not hold
    Assertion,
    /// Injected code failed or could not run
    Script,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Construction => "construction",
            ErrorKind::Guard => "guard",
            ErrorKind::Resolution => "resolution",
            ErrorKind::Dispatch => "dispatch",
            ErrorKind::Assertion => "assertion",
            ErrorKind::Script => "script",
        }
    }
}

/// Errors raised by surface, wrapper and action operations.
///
/// Every error is terminal for the step or chain it occurs in; nothing here is
/// retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Wrapper construction over an empty element set
    #[error("Cannot create element wrapper around null: {0}")]
    EmptyTarget(String),

    /// Click on a disabled element without `force`
    #[error("Cannot perform click on disabled element: {0}")]
    DisabledElement(String),

    /// Navigation outside the site under test
    #[error("visit() tried to access different domain ({0})")]
    CrossDomain(String),

    /// Wait time that is not numeric
    #[error("Invalid numeric timeout: {0}. Request aliasing is not supported")]
    InvalidTimeout(String),

    /// A URL that cannot be resolved
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Selector matched nothing
    #[error("No element found matching selector: {0}")]
    NoElement(String),

    /// Selector matched although it should not have
    #[error("Found element matching: '{0}' (should not exist)")]
    UnexpectedElement(String),

    /// Call arguments of the wrong shape
    #[error("Invalid argument for {method}(): {reason}")]
    InvalidArgument { method: String, reason: String },

    /// Verification failure
    #[error("{0}")]
    Assertion(String),

    /// Injected code raised an error
    #[error("Script error: {0}")]
    Script(String),

    /// The frame offers no evaluation context for injected code
    #[error("No script host is attached to the frame")]
    ScriptUnavailable,
}

impl ActionError {
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion(message.into())
    }

    pub fn invalid_argument(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            method: method.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_url(url: impl Into<String>, err: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: err.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ActionError::EmptyTarget(_) => ErrorKind::Construction,
            ActionError::DisabledElement(_)
            | ActionError::CrossDomain(_)
            | ActionError::InvalidTimeout(_)
            | ActionError::InvalidUrl { .. } => ErrorKind::Guard,
            ActionError::NoElement(_) | ActionError::UnexpectedElement(_) => {
                ErrorKind::Resolution
            }
            ActionError::InvalidArgument { .. } => ErrorKind::Dispatch,
            ActionError::Assertion(_) => ErrorKind::Assertion,
            ActionError::Script(_) | ActionError::ScriptUnavailable => ErrorKind::Script,
        }
    }
}

impl From<stepframe_core_types::CoreError> for ActionError {
    fn from(err: stepframe_core_types::CoreError) -> Self {
        match err {
            stepframe_core_types::CoreError::InvalidUrl { url, reason } => {
                ActionError::InvalidUrl { url, reason }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_error_families() {
        assert_eq!(
            ActionError::EmptyTarget("#x".into()).kind(),
            ErrorKind::Construction
        );
        assert_eq!(
            ActionError::CrossDomain("evil.test".into()).kind(),
            ErrorKind::Guard
        );
        assert_eq!(
            ActionError::UnexpectedElement("#x".into()).kind(),
            ErrorKind::Resolution
        );
        assert_eq!(ActionError::assertion("nope").kind(), ErrorKind::Assertion);
        assert_eq!(ActionError::ScriptUnavailable.kind(), ErrorKind::Script);
    }

    #[test]
    fn messages_name_the_offending_input() {
        let err = ActionError::DisabledElement("#save".into());
        assert_eq!(
            err.to_string(),
            "Cannot perform click on disabled element: #save"
        );
        let err = ActionError::CrossDomain("evil.test".into());
        assert!(err.to_string().contains("evil.test"));
    }
}
