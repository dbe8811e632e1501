//! Action primitives for an embedded, sandboxed frame
//!
//! This crate provides the building blocks every step runs on:
//! - the frame abstraction a host supplies (document, storage, cookies, navigation)
//! - the selector builder turning a step into a query expression
//! - the element wrapper performing framework-visible DOM mutations
//! - the action surface bound to one frame and one site policy

pub mod errors;
pub mod frame;
mod locator;
mod primitives;
pub mod types;
mod wrapper;

pub use errors::*;
pub use frame::*;
pub use locator::*;
pub use primitives::*;
pub use types::*;
pub use wrapper::*;

#[cfg(test)]
pub(crate) mod test_support;
