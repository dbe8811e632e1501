use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One call in a serialized chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainLink {
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl ChainLink {
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// A recorded call chain: the head call is dispatched against the surface,
/// every link in `chain` against the result of the call before it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainInvocation {
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub chain: Vec<ChainLink>,
}

impl ChainInvocation {
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
            chain: Vec::new(),
        }
    }

    /// Append a link to the chain.
    pub fn then(mut self, method: impl Into<String>, args: Vec<Value>) -> Self {
        self.chain.push(ChainLink::new(method, args));
        self
    }

    pub fn head(&self) -> ChainLink {
        ChainLink::new(self.method.clone(), self.args.clone())
    }

    /// Total number of calls including the head.
    pub fn call_count(&self) -> usize {
        self.chain.len() + 1
    }
}
