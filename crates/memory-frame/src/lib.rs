//! In-memory embedded frame
//!
//! A small document model standing in for the sandboxed frame an authoring
//! page embeds. It is the frame used by the CLI and by tests:
//! - an arena document with parent/child links and a selector engine
//! - a framework-style value tracker that records change notifications
//! - key-value storage and a cookie jar
//! - page fixtures keyed by pathname, loaded on navigation

mod dom;
mod element;
pub mod errors;
pub mod fixture;
mod frame;
mod selector;
mod storage;

pub use dom::NodeId;
pub use element::MemoryElement;
pub use errors::DomError;
pub use fixture::{NodeSpec, PageFixture, PageSpec, SeededRequest};
pub use frame::{
    ControlState, FrameSnapshot, FrameworkChange, MemoryFrame, RecordedEvent, RequestListener,
};
pub use selector::validate_selector;
pub use storage::{MemoryCookieJar, MemoryStorage};
