//! Shared primitives for the stepframe engine.
//!
//! Everything here is plain data: steps authored in the editor, the site
//! configuration a frame is bound to, serialized call chains and the network
//! events observed from the embedded frame.

mod chain;
mod network;
mod site;
mod step;

pub use chain::{ChainInvocation, ChainLink};
pub use network::{NetworkEvent, RequestProperty};
pub use site::SiteConfig;
pub use step::{SelectType, Step, StepArgs, StepId};

use thiserror::Error;

/// Errors raised while building core values from untrusted input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl CoreError {
    pub fn invalid_url(url: impl Into<String>, err: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: err.to_string(),
        }
    }
}
