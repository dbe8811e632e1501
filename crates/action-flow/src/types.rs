//! Closed operation sets and the values a chain threads from link to link

use action_primitives::ElementWrapper;
use serde_json::{json, Value};

/// What the current context of a chain is, and therefore which methods it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextShape {
    Surface,
    Wrapper,
    /// Plain values and empty results expose no methods
    Value,
}

/// Operations dispatchable on the action surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceMethod {
    Visit,
    ClearCookies,
    ClearLocalStorage,
    Wait,
    RunOnClient,
    Wrap,
    Get,
}

impl SurfaceMethod {
    pub const ALL: [SurfaceMethod; 7] = [
        SurfaceMethod::Visit,
        SurfaceMethod::ClearCookies,
        SurfaceMethod::ClearLocalStorage,
        SurfaceMethod::Wait,
        SurfaceMethod::RunOnClient,
        SurfaceMethod::Wrap,
        SurfaceMethod::Get,
    ];

    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SurfaceMethod::Visit => "visit",
            SurfaceMethod::ClearCookies => "clearCookies",
            SurfaceMethod::ClearLocalStorage => "clearLocalStorage",
            SurfaceMethod::Wait => "wait",
            SurfaceMethod::RunOnClient => "runOnClient",
            SurfaceMethod::Wrap => "wrap",
            SurfaceMethod::Get => "get",
        }
    }

    pub fn returns(&self) -> ContextShape {
        match self {
            SurfaceMethod::Wrap | SurfaceMethod::Get => ContextShape::Wrapper,
            _ => ContextShape::Value,
        }
    }
}

/// Operations dispatchable on an element wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperMethod {
    Type,
    Clear,
    Click,
}

impl WrapperMethod {
    pub const ALL: [WrapperMethod; 3] = [WrapperMethod::Type, WrapperMethod::Clear, WrapperMethod::Click];

    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            WrapperMethod::Type => "type",
            WrapperMethod::Clear => "clear",
            WrapperMethod::Click => "click",
        }
    }

    pub fn returns(&self) -> ContextShape {
        ContextShape::Wrapper
    }
}

/// Result of one link, and the context the next link is dispatched on.
#[derive(Debug, Clone)]
pub enum ChainValue {
    Empty,
    Value(Value),
    Wrapper(ElementWrapper),
}

impl ChainValue {
    pub fn shape(&self) -> ContextShape {
        match self {
            ChainValue::Wrapper(_) => ContextShape::Wrapper,
            ChainValue::Empty | ChainValue::Value(_) => ContextShape::Value,
        }
    }

    pub fn as_wrapper(&self) -> Option<&ElementWrapper> {
        match self {
            ChainValue::Wrapper(wrapper) => Some(wrapper),
            _ => None,
        }
    }

    /// JSON rendering handed back to script callers.
    pub fn to_json(&self) -> Value {
        match self {
            ChainValue::Empty => Value::Null,
            ChainValue::Value(value) => value.clone(),
            ChainValue::Wrapper(wrapper) => json!({
                "element": wrapper.label(),
                "count": wrapper.targets().len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact_and_closed() {
        assert_eq!(SurfaceMethod::lookup("get"), Some(SurfaceMethod::Get));
        assert_eq!(
            SurfaceMethod::lookup("clearLocalStorage"),
            Some(SurfaceMethod::ClearLocalStorage)
        );
        assert_eq!(SurfaceMethod::lookup("Get"), None);
        assert_eq!(SurfaceMethod::lookup("type"), None);
        assert_eq!(WrapperMethod::lookup("type"), Some(WrapperMethod::Type));
        assert_eq!(WrapperMethod::lookup("get"), None);
    }

    #[test]
    fn names_round_trip_through_lookup() {
        for method in SurfaceMethod::ALL {
            assert_eq!(SurfaceMethod::lookup(method.name()), Some(method));
        }
        for method in WrapperMethod::ALL {
            assert_eq!(WrapperMethod::lookup(method.name()), Some(method));
        }
    }
}
