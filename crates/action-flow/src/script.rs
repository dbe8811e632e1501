//! Chain scripts: late-bound code evaluated against the action surface
//!
//! Code runs as the body of a function whose single parameter `cy` is the
//! surface. Every method call on `cy`, and on whatever a call returns, is
//! dispatched immediately through the chain executor's closed method sets,
//! so plain JavaScript (locals, expressions, callbacks) composes with chain
//! calls. `.then(fn)` hands the callback the JSON form of the current
//! subject. `console.*` writes to the log.
//!
//! [`ChainScriptHost`] evaluates each script on its own worker thread owning
//! a fresh engine context. Dispatch requests travel back to the awaiting
//! task, which owns the surface. Scripts run with the surface's full
//! authority and get no isolation beyond the engine's runtime limits.

use std::cell::RefCell;
use std::sync::mpsc as std_mpsc;

use action_primitives::{ActionError, ScriptHost, Surface};
use async_trait::async_trait;
use boa_engine::native_function::{NativeFunction, NativeFunctionPointer};
use boa_engine::{Context, JsError, JsNativeError, JsResult, JsString, JsValue, Source};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::{ChainPath, FlowError};
use crate::executor::dispatch_link;
use crate::types::ChainValue;

/// Name the surface is bound to inside a script.
pub const SCRIPT_ROOT: &str = "cy";

const LOOP_ITERATION_LIMIT: u64 = 100_000;
const RECURSION_LIMIT: usize = 512;

/// Handle of the surface itself.
const ROOT_HANDLE: i64 = -1;

const PRELUDE: &str = r#"
(() => {
  const HANDLE = Symbol('stepframe.handle');
  const isChainer = (value) =>
    value !== null && typeof value === 'object' && typeof value[HANDLE] === 'number';
  const encode = (value) => JSON.stringify(value) ?? 'null';
  const chainer = (handle) => new Proxy({}, {
    get(_target, name) {
      if (name === HANDLE) return handle;
      if (typeof name !== 'string' || name === 'toJSON') return undefined;
      if (name === 'then') {
        return (callback) => {
          const result = callback(JSON.parse(__stepframe_subject(handle)));
          return result === undefined ? chainer(handle) : result;
        };
      }
      return (...args) => chainer(__stepframe_dispatch(handle, name, encode(args)));
    },
  });
  const render = (arg) => {
    if (typeof arg === 'string') return arg;
    if (isChainer(arg)) return '[chain]';
    return JSON.stringify(arg) ?? String(arg);
  };
  const console = {};
  for (const level of ['log', 'info', 'warn', 'error', 'debug']) {
    console[level] = (...args) => __stepframe_console(level, args.map(render).join(' '));
  }
  globalThis.cy = chainer(-1);
  globalThis.console = console;
  globalThis.__stepframe_complete = (value) =>
    isChainer(value)
      ? JSON.stringify({ handle: value[HANDLE] })
      : `{"value":${encode(value)}}`;
})();
"#;

/// Evaluates scripts in an embedded JavaScript engine, dispatching `cy` calls
/// through the chain executor.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChainScriptHost;

impl ChainScriptHost {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScriptHost for ChainScriptHost {
    async fn evaluate(&self, code: &str, surface: &Surface) -> Result<Value, ActionError> {
        let (requests, inbox) = mpsc::unbounded_channel();
        let code = code.to_string();
        std::thread::Builder::new()
            .name("stepframe-script".into())
            .spawn(move || run_worker(&code, requests))
            .map_err(|err| ActionError::Script(format!("failed to start script worker: {err}")))?;
        debug!(surface = %surface.id(), "script worker started");
        serve(surface, inbox).await
    }
}

/// Worker-to-task messages.
enum Request {
    Dispatch {
        handle: i64,
        method: String,
        args: Vec<Value>,
        reply: std_mpsc::Sender<Result<i64, String>>,
    },
    Subject {
        handle: i64,
        reply: std_mpsc::Sender<String>,
    },
    Console {
        level: String,
        message: String,
    },
    /// The encoded completion, or the message of an uncaught error.
    Done(Result<String, String>),
}

/// Subjects produced so far, indexed by handle, with the chain that made each.
#[derive(Default)]
struct Subjects(Vec<(ChainValue, ChainPath)>);

impl Subjects {
    fn lookup(&self, handle: i64) -> Option<(Option<ChainValue>, ChainPath)> {
        if handle == ROOT_HANDLE {
            return Some((None, ChainPath::new()));
        }
        let index = usize::try_from(handle).ok()?;
        self.0
            .get(index)
            .map(|(value, chain)| (Some(value.clone()), chain.clone()))
    }

    fn json(&self, handle: i64) -> Value {
        usize::try_from(handle)
            .ok()
            .and_then(|index| self.0.get(index))
            .map_or(Value::Null, |(value, _)| value.to_json())
    }

    fn push(&mut self, value: ChainValue, chain: ChainPath) -> i64 {
        self.0.push((value, chain));
        (self.0.len() - 1) as i64
    }
}

async fn serve(
    surface: &Surface,
    mut inbox: mpsc::UnboundedReceiver<Request>,
) -> Result<Value, ActionError> {
    let mut subjects = Subjects::default();
    let mut failure: Option<FlowError> = None;

    while let Some(request) = inbox.recv().await {
        match request {
            Request::Dispatch {
                handle,
                method,
                args,
                reply,
            } => {
                let outcome = match subjects.lookup(handle) {
                    Some((current, mut chain)) => {
                        match dispatch_link(surface, current, &mut chain, &method, &args).await {
                            Ok(value) => Ok(subjects.push(value, chain)),
                            Err(err) => {
                                let message = err.to_string();
                                failure = Some(err);
                                Err(message)
                            }
                        }
                    }
                    None => Err(format!("unknown chain handle {handle}")),
                };
                // The worker is gone if nobody is waiting; Done never arrives
                // and the loop ends on the closed channel.
                let _ = reply.send(outcome);
            }
            Request::Subject { handle, reply } => {
                let _ = reply.send(subjects.json(handle).to_string());
            }
            Request::Console { level, message } => match level.as_str() {
                "warn" | "error" => warn!(target: "stepframe::console", "{message}"),
                "debug" => debug!(target: "stepframe::console", "{message}"),
                _ => info!(target: "stepframe::console", "{message}"),
            },
            Request::Done(Ok(encoded)) => return completion(&encoded, &subjects),
            Request::Done(Err(message)) => {
                // An uncaught throw after a failed link reports that link's
                // error as-is.
                return Err(match failure {
                    Some(err) => err.into_action_error(),
                    None => ActionError::Script(message),
                });
            }
        }
    }

    Err(ActionError::Script("script worker stopped".into()))
}

fn completion(encoded: &str, subjects: &Subjects) -> Result<Value, ActionError> {
    let completion: Value = serde_json::from_str(encoded)
        .map_err(|err| ActionError::Script(format!("unreadable script result: {err}")))?;
    if let Some(handle) = completion.get("handle").and_then(Value::as_i64) {
        return Ok(subjects.json(handle));
    }
    Ok(completion.get("value").cloned().unwrap_or(Value::Null))
}

thread_local! {
    static BRIDGE: RefCell<Option<mpsc::UnboundedSender<Request>>> = const { RefCell::new(None) };
}

fn run_worker(code: &str, requests: mpsc::UnboundedSender<Request>) {
    BRIDGE.with(|bridge| *bridge.borrow_mut() = Some(requests.clone()));
    let outcome = evaluate_in_context(code);
    BRIDGE.with(|bridge| bridge.borrow_mut().take());
    let _ = requests.send(Request::Done(outcome));
}

fn evaluate_in_context(code: &str) -> Result<String, String> {
    let mut ctx = Context::default();
    ctx.runtime_limits_mut()
        .set_loop_iteration_limit(LOOP_ITERATION_LIMIT);
    ctx.runtime_limits_mut().set_recursion_limit(RECURSION_LIMIT);

    let natives: [(&str, usize, NativeFunctionPointer); 3] = [
        ("__stepframe_dispatch", 3, native_dispatch),
        ("__stepframe_subject", 1, native_subject),
        ("__stepframe_console", 2, native_console),
    ];
    for (name, length, pointer) in natives {
        ctx.register_global_builtin_callable(
            JsString::from(name),
            length,
            NativeFunction::from_fn_ptr(pointer),
        )
        .map_err(|err| format!("failed to register {name}: {err}"))?;
    }
    ctx.eval(Source::from_bytes(PRELUDE.as_bytes()))
        .map_err(|err| format!("script prelude failed: {err}"))?;

    let source = format!(
        "__stepframe_complete((function ({SCRIPT_ROOT}) {{\n{code}\n}}).call(undefined, {SCRIPT_ROOT}));"
    );
    let completion = ctx
        .eval(Source::from_bytes(source.as_bytes()))
        .map_err(|err| format!("Script thrown: {err}"))?;
    completion
        .to_string(&mut ctx)
        .map(|text| text.to_std_string_escaped())
        .map_err(|err| err.to_string())
}

fn throw(message: impl Into<String>) -> JsError {
    JsNativeError::error().with_message(message.into()).into()
}

fn send(request: Request) -> JsResult<()> {
    let sent = BRIDGE.with(|bridge| match bridge.borrow().as_ref() {
        Some(requests) => requests.send(request).is_ok(),
        None => false,
    });
    if sent {
        Ok(())
    } else {
        Err(throw("script host went away"))
    }
}

fn text_arg(args: &[JsValue], index: usize, ctx: &mut Context) -> JsResult<String> {
    match args.get(index) {
        Some(value) => Ok(value.to_string(ctx)?.to_std_string_escaped()),
        None => Ok(String::new()),
    }
}

fn handle_arg(args: &[JsValue], index: usize, ctx: &mut Context) -> JsResult<i64> {
    let number = match args.get(index) {
        Some(value) => value.to_number(ctx)?,
        None => f64::NAN,
    };
    if number.is_finite() {
        Ok(number as i64)
    } else {
        Err(throw("chain handle must be a number"))
    }
}

fn native_dispatch(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let handle = handle_arg(args, 0, ctx)?;
    let method = text_arg(args, 1, ctx)?;
    let encoded = text_arg(args, 2, ctx)?;
    let args: Vec<Value> = serde_json::from_str(&encoded)
        .map_err(|err| throw(format!("unreadable arguments to {method}: {err}")))?;

    let (reply, answer) = std_mpsc::channel();
    send(Request::Dispatch {
        handle,
        method,
        args,
        reply,
    })?;
    match answer.recv() {
        Ok(Ok(next)) => Ok(JsValue::from(next as f64)),
        Ok(Err(message)) => Err(throw(message)),
        Err(_) => Err(throw("script host went away")),
    }
}

fn native_subject(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let handle = handle_arg(args, 0, ctx)?;
    let (reply, answer) = std_mpsc::channel();
    send(Request::Subject { handle, reply })?;
    let encoded = answer
        .recv()
        .map_err(|_| throw("script host went away"))?;
    Ok(JsValue::from(JsString::from(encoded.as_str())))
}

fn native_console(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let level = text_arg(args, 0, ctx)?;
    let message = text_arg(args, 1, ctx)?;
    send(Request::Console { level, message })?;
    Ok(JsValue::undefined())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use action_primitives::{Element, ErrorKind, SurfaceConfig};
    use memory_frame::{MemoryFrame, NodeSpec};
    use serde_json::json;
    use url::Url;

    use super::*;

    fn form() -> (Arc<MemoryFrame>, Surface) {
        let frame = Arc::new(MemoryFrame::with_body(vec![
            NodeSpec::new("input").with_id("user").with_value("old"),
            NodeSpec::new("button").with_id("go").with_text("Go"),
        ]));
        let surface = Surface::new(
            frame.clone(),
            SurfaceConfig::new(Url::parse("http://app.test/").unwrap()),
        );
        (frame, surface)
    }

    async fn evaluate(code: &str) -> (Arc<MemoryFrame>, Result<Value, ActionError>) {
        let (frame, surface) = form();
        let result = ChainScriptHost::new().evaluate(code, &surface).await;
        (frame, result)
    }

    #[tokio::test]
    async fn locals_feed_chain_arguments() {
        let (frame, result) = evaluate("const sel = '#user'; cy.get(sel).clear().type('x')").await;
        assert_eq!(result.unwrap(), Value::Null);
        assert_eq!(frame.element("#user").unwrap().value(), "x");
    }

    #[tokio::test]
    async fn expressions_are_evaluated_before_dispatch() {
        let (frame, result) = evaluate("cy.get('#user').clear().type('a' + 'b')").await;
        result.unwrap();
        assert_eq!(frame.element("#user").unwrap().value(), "ab");
    }

    #[tokio::test]
    async fn then_passes_the_subject_to_the_callback() {
        let (_, result) = evaluate("cy.get('#user').then(el => el)").await;
        assert_eq!(result.unwrap(), Value::Null);

        let (_, result) = evaluate("return cy.get('#user').then(el => el.count)").await;
        assert_eq!(result.unwrap(), json!(1));
    }

    #[tokio::test]
    async fn returned_values_come_back_as_json() {
        let (_, result) = evaluate("return [1, 'two', { three: 3 }]").await;
        assert_eq!(result.unwrap(), json!([1, "two", {"three": 3}]));

        let (_, result) = evaluate("return cy.clearCookies()").await;
        assert_eq!(result.unwrap(), json!(0));
    }

    #[tokio::test]
    async fn statements_span_lines_and_carry_comments() {
        let code = "// reset the form\ncy.get('#user')\n  .clear()\n  .type('multi')\ncy.get('#go').click()";
        let (frame, result) = evaluate(code).await;
        result.unwrap();
        assert_eq!(frame.element("#user").unwrap().value(), "multi");
    }

    #[tokio::test]
    async fn failed_links_keep_their_error() {
        let (_, result) = evaluate("cy.get('#missing').click()").await;
        assert_eq!(
            result.unwrap_err(),
            ActionError::NoElement("#missing".into())
        );
    }

    #[tokio::test]
    async fn unknown_methods_are_script_errors() {
        let (_, result) = evaluate("cy.get('#user').erase()").await;
        assert_eq!(
            result.unwrap_err(),
            ActionError::Script("cy.get().erase() is not a function".into())
        );
    }

    #[tokio::test]
    async fn caught_failures_do_not_fail_the_script() {
        let code = "try { cy.get('#missing') } catch (err) { console.warn(err.message) }\ncy.get('#user').clear().type('y')";
        let (frame, result) = evaluate(code).await;
        result.unwrap();
        assert_eq!(frame.element("#user").unwrap().value(), "y");
    }

    #[tokio::test]
    async fn thrown_errors_and_syntax_errors_are_script_errors() {
        let (_, result) = evaluate("throw new Error('boom')").await;
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Script);
        assert!(err.to_string().contains("boom"));

        let (_, result) = evaluate("cy.get('#user'").await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Script);
    }

    #[tokio::test]
    async fn runaway_loops_hit_the_runtime_limit() {
        let (_, result) = evaluate("while (true) {}").await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Script);
    }

    #[tokio::test]
    async fn console_output_is_logged() {
        let (_, result) = evaluate("console.log('hello, world', 2, { ok: true })").await;
        assert_eq!(result.unwrap(), Value::Null);
    }
}
