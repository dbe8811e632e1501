use action_primitives::{ActionError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error(transparent)]
    Action(#[from] ActionError),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::UnknownAction(_) => ErrorKind::Dispatch,
            RegistryError::Action(err) => err.kind(),
        }
    }

    /// The step failure as an [`ActionError`], for reports.
    pub fn into_action_error(self) -> ActionError {
        match self {
            RegistryError::Action(err) => err,
            RegistryError::UnknownAction(action) => {
                ActionError::invalid_argument("runStep", format!("unknown action '{action}'"))
            }
        }
    }
}
