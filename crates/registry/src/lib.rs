//! Action registry
//!
//! The catalog of step kinds the editor offers. Every definition renders a
//! step as test code and can also run it live against an embedded frame.

pub mod actions;
pub mod api;
pub mod codegen;
pub mod errors;
pub mod metrics;
pub mod model;

pub use api::{ActionDefinition, ActionRegistry, StepContext};
pub use errors::RegistryError;
pub use metrics::StepMetrics;
pub use model::{ActionMeta, ParamOption, ParamSpec, ParamType, StepFailure, StepReport};
