//! Core data types for action primitives

use serde::{Deserialize, Serialize};
use std::fmt;

/// DOM event types the wrapper synthesizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Fired on text-like controls after a value change
    Input,

    /// Fired on every other control after a value change
    Change,

    /// Pointer click
    Click,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::Click => "click",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A synthesized DOM event.
///
/// `simulated` mirrors the marker reactive frameworks check to tell a
/// programmatic value change from one they caused themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomEvent {
    pub kind: EventKind,
    pub bubbles: bool,
    pub simulated: bool,
}

impl DomEvent {
    /// Bubbling value-change event marked as simulated.
    pub fn value_change(kind: EventKind) -> Self {
        Self {
            kind,
            bubbles: true,
            simulated: true,
        }
    }

    /// Bubbling pointer click.
    pub fn click() -> Self {
        Self {
            kind: EventKind::Click,
            bubbles: true,
            simulated: false,
        }
    }
}

/// Options accepted by `get`/`wrap` and by `click` in recorded chains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapOptions {
    /// Click even when the element is disabled
    #[serde(default)]
    pub force: bool,
}

impl WrapOptions {
    pub fn forced() -> Self {
        Self { force: true }
    }
}
