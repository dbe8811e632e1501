//! Chain execution layer
//!
//! Serialized call chains (`cy.get(sel).clear().type("x")`) are resolved
//! against the action surface and whatever each call returns. Dispatch goes
//! through closed method sets per context, so an unknown method is reported
//! with the full chain accumulated so far instead of being reflected into
//! an arbitrary object.

pub mod errors;
pub mod executor;
pub mod script;
pub mod types;

pub use errors::{ChainPath, FlowError};
pub use executor::{run_chain, ChainExecutor, DefaultChainExecutor};
pub use script::{ChainScriptHost, SCRIPT_ROOT};
pub use types::{ChainValue, ContextShape, SurfaceMethod, WrapperMethod};
