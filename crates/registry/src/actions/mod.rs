//! Built-in action definitions

mod assert;
mod click;
mod code;
mod input;
mod location;
mod navigate;
mod reset;
mod wait;
mod xhr;

use std::sync::Arc;

use stepframe_core_types::SiteConfig;

use crate::api::ActionDefinition;

pub use assert::{Contains, Disabled, Exist, NotDisabled, NotExist};
pub use click::Click;
pub use code::CustomCode;
pub use input::{Select, Type};
pub use location::Location;
pub use navigate::{Goto, Reload};
pub use reset::Reset;
pub use wait::Wait;
pub use xhr::Xhr;

/// Built-in catalog in editor order.
pub fn builtin_actions(site: &SiteConfig) -> Vec<Arc<dyn ActionDefinition>> {
    vec![
        Arc::new(Reset::new(site.clone())),
        Arc::new(Type),
        Arc::new(Click),
        Arc::new(Location),
        Arc::new(Exist),
        Arc::new(NotExist),
        Arc::new(Contains),
        Arc::new(Goto),
        Arc::new(Select),
        Arc::new(Reload),
        Arc::new(Xhr),
        Arc::new(Disabled),
        Arc::new(NotDisabled),
        Arc::new(Wait),
        Arc::new(CustomCode),
    ]
}
