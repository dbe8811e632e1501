//! Chain executor implementation

use std::sync::Arc;

use action_primitives::{
    ActionError, ElementWrapper, Frame, Surface, SurfaceConfig, WrapOptions,
};
use async_trait::async_trait;
use serde_json::Value;
use stepframe_core_types::{ChainInvocation, ChainLink};
use tracing::{debug, info, warn};

use crate::errors::{ChainPath, FlowError};
use crate::types::{ChainValue, ContextShape, SurfaceMethod, WrapperMethod};

/// Chain executor trait
#[async_trait]
pub trait ChainExecutor: Send + Sync {
    /// Run `invocation` against a fresh surface bound to `frame`.
    async fn execute(
        &self,
        frame: Arc<dyn Frame>,
        invocation: &ChainInvocation,
    ) -> Result<ChainValue, FlowError>;

    /// Check every link against the shape its predecessor returns, without
    /// touching a frame.
    fn validate_chain(&self, invocation: &ChainInvocation) -> Result<(), FlowError>;
}

/// Default chain executor implementation
pub struct DefaultChainExecutor {
    config: SurfaceConfig,
}

impl DefaultChainExecutor {
    pub fn new(config: SurfaceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }
}

#[async_trait]
impl ChainExecutor for DefaultChainExecutor {
    async fn execute(
        &self,
        frame: Arc<dyn Frame>,
        invocation: &ChainInvocation,
    ) -> Result<ChainValue, FlowError> {
        let surface = Surface::new(frame, self.config.clone());
        info!(
            surface = %surface.id(),
            method = %invocation.method,
            links = invocation.call_count(),
            "executing chain"
        );
        run_chain(&surface, invocation).await
    }

    fn validate_chain(&self, invocation: &ChainInvocation) -> Result<(), FlowError> {
        if invocation.method.is_empty() {
            return Err(FlowError::InvalidChain("missing head method".to_string()));
        }

        let mut chain = ChainPath::new();
        let mut shape = ContextShape::Surface;
        for link in std::iter::once(invocation.head()).chain(invocation.chain.iter().cloned()) {
            chain.push(link.method.clone());
            shape = match shape {
                ContextShape::Surface => SurfaceMethod::lookup(&link.method).map(|m| m.returns()),
                ContextShape::Wrapper => WrapperMethod::lookup(&link.method).map(|m| m.returns()),
                ContextShape::Value => None,
            }
            .ok_or_else(|| FlowError::NotAFunction {
                chain: chain.clone(),
            })?;
        }
        Ok(())
    }
}

/// Run `invocation` on an existing surface.
///
/// The head is dispatched on the surface, every further link on whatever the
/// previous link returned. Links run strictly in order; a failure stops the
/// chain and names the links up to and including the failing one. Effects of
/// earlier links are not undone.
pub async fn run_chain(
    surface: &Surface,
    invocation: &ChainInvocation,
) -> Result<ChainValue, FlowError> {
    let mut chain = ChainPath::new();
    let mut current = dispatch_link(
        surface,
        None,
        &mut chain,
        &invocation.method,
        &invocation.args,
    )
    .await?;
    for ChainLink { method, args } in &invocation.chain {
        current = dispatch_link(surface, Some(current), &mut chain, method, args).await?;
    }
    Ok(current)
}

/// Dispatch one link of a chain. `None` dispatches on the surface itself,
/// otherwise on the value the previous link returned. `chain` gains `method`
/// before dispatch so failures name the failing link.
pub(crate) async fn dispatch_link(
    surface: &Surface,
    current: Option<ChainValue>,
    chain: &mut ChainPath,
    method: &str,
    args: &[Value],
) -> Result<ChainValue, FlowError> {
    chain.push(method);
    let result = match current {
        None => {
            let Some(method) = SurfaceMethod::lookup(method) else {
                warn!(chain = %chain.dotted(), "surface has no such method");
                return Err(FlowError::NotAFunction {
                    chain: chain.clone(),
                });
            };
            debug!(surface = %surface.id(), chain = %chain.dotted(), "dispatching link");
            dispatch_surface(surface, method, args).await
        }
        Some(ChainValue::Wrapper(wrapper)) => {
            let Some(method) = WrapperMethod::lookup(method) else {
                warn!(chain = %chain.dotted(), "wrapper has no such method");
                return Err(FlowError::NotAFunction {
                    chain: chain.clone(),
                });
            };
            debug!(surface = %surface.id(), chain = %chain.dotted(), "dispatching link");
            dispatch_wrapper(wrapper, method, args)
        }
        Some(ChainValue::Empty | ChainValue::Value(_)) => {
            warn!(chain = %chain.dotted(), "value has no methods");
            return Err(FlowError::NotAFunction {
                chain: chain.clone(),
            });
        }
    };
    result.map_err(|source| FlowError::LinkFailed {
        chain: chain.clone(),
        source,
    })
}

async fn dispatch_surface(
    surface: &Surface,
    method: SurfaceMethod,
    args: &[Value],
) -> Result<ChainValue, ActionError> {
    match method {
        SurfaceMethod::Visit => {
            let href = string_arg(method.name(), args, 0)?;
            surface.visit(href)?;
            Ok(ChainValue::Empty)
        }
        SurfaceMethod::ClearCookies => {
            let removed = surface.clear_cookies();
            Ok(ChainValue::Value(Value::from(removed)))
        }
        SurfaceMethod::ClearLocalStorage => {
            let removed = surface.clear_local_storage();
            Ok(ChainValue::Value(Value::from(removed)))
        }
        SurfaceMethod::Wait => {
            let time = args.first().cloned().unwrap_or(Value::Null);
            surface.wait(&time).await?;
            Ok(ChainValue::Empty)
        }
        SurfaceMethod::RunOnClient => {
            let code = string_arg(method.name(), args, 0)?;
            let result = surface.run_on_client(code).await?;
            Ok(ChainValue::Value(result))
        }
        SurfaceMethod::Wrap => {
            let selector = string_arg(method.name(), args, 0)?;
            let options = options_arg(method.name(), args, 1)?.unwrap_or_default();
            let targets = surface.query(selector);
            let wrapper = surface.wrap(targets, options).map_err(|err| match err {
                ActionError::EmptyTarget(_) => ActionError::EmptyTarget(selector.to_string()),
                other => other,
            })?;
            Ok(ChainValue::Wrapper(wrapper))
        }
        SurfaceMethod::Get => {
            let selector = string_arg(method.name(), args, 0)?;
            let options = options_arg(method.name(), args, 1)?.unwrap_or_default();
            Ok(ChainValue::Wrapper(surface.get(selector, options)?))
        }
    }
}

fn dispatch_wrapper(
    wrapper: ElementWrapper,
    method: WrapperMethod,
    args: &[Value],
) -> Result<ChainValue, ActionError> {
    match method {
        WrapperMethod::Type => {
            let text = text_arg(method.name(), args, 0)?;
            wrapper.type_text(&text);
        }
        WrapperMethod::Clear => {
            wrapper.clear();
        }
        WrapperMethod::Click => {
            let wrapper = match options_arg(method.name(), args, 0)? {
                Some(options) => wrapper.with_options(options),
                None => wrapper,
            };
            wrapper.click()?;
            return Ok(ChainValue::Wrapper(wrapper));
        }
    }
    Ok(ChainValue::Wrapper(wrapper))
}

fn string_arg<'a>(method: &str, args: &'a [Value], index: usize) -> Result<&'a str, ActionError> {
    match args.get(index) {
        Some(Value::String(text)) => Ok(text),
        Some(other) => Err(ActionError::invalid_argument(
            method,
            format!("expected a string, got {other}"),
        )),
        None => Err(ActionError::invalid_argument(
            method,
            format!("missing argument {}", index + 1),
        )),
    }
}

/// Strings as-is, other scalars in their JSON rendering.
fn text_arg(method: &str, args: &[Value], index: usize) -> Result<String, ActionError> {
    match args.get(index) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(value @ (Value::Number(_) | Value::Bool(_))) => Ok(value.to_string()),
        Some(other) => Err(ActionError::invalid_argument(
            method,
            format!("expected text, got {other}"),
        )),
        None => Err(ActionError::invalid_argument(method, "missing text")),
    }
}

fn options_arg(
    method: &str,
    args: &[Value],
    index: usize,
) -> Result<Option<WrapOptions>, ActionError> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|err| ActionError::invalid_argument(method, format!("bad options: {err}"))),
    }
}
