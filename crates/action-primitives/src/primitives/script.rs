//! Escape hatch - late-bound code evaluated by the frame's script host

use serde_json::Value;
use tracing::{debug, warn};

use super::Surface;
use crate::errors::ActionError;

impl Surface {
    /// Evaluate `code` with this surface as its single parameter.
    ///
    /// The code runs with the authority of the host's script context; it is
    /// not sandboxed here.
    pub async fn run_on_client(&self, code: &str) -> Result<Value, ActionError> {
        let host = self.frame.script_host().ok_or_else(|| {
            warn!(surface = %self.surface_id, "no script host attached");
            ActionError::ScriptUnavailable
        })?;
        debug!(surface = %self.surface_id, code_len = code.len(), "running client code");
        host.evaluate(code, self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ScriptHost;
    use crate::primitives::SurfaceConfig;
    use crate::test_support::StubFrame;
    use async_trait::async_trait;
    use std::sync::Arc;
    use url::Url;

    struct Echo;

    #[async_trait]
    impl ScriptHost for Echo {
        async fn evaluate(&self, code: &str, surface: &Surface) -> Result<Value, ActionError> {
            if code == "boom" {
                return Err(ActionError::Script("boom".into()));
            }
            Ok(Value::String(format!("{}:{}", surface.id(), code)))
        }
    }

    fn surface(host: Option<Arc<dyn ScriptHost>>) -> Surface {
        let frame = StubFrame {
            script_host: host,
            ..Default::default()
        };
        Surface::new(
            Arc::new(frame),
            SurfaceConfig::new(Url::parse("http://app.test/").unwrap()),
        )
    }

    #[tokio::test]
    async fn host_receives_code_and_surface() {
        let surface = surface(Some(Arc::new(Echo)));
        let value = surface.run_on_client("1 + 1").await.unwrap();
        assert_eq!(value, Value::String(format!("{}:1 + 1", surface.id())));
    }

    #[tokio::test]
    async fn host_errors_propagate_unchanged() {
        let surface = surface(Some(Arc::new(Echo)));
        let err = surface.run_on_client("boom").await.unwrap_err();
        assert_eq!(err, ActionError::Script("boom".into()));
    }

    #[tokio::test]
    async fn missing_host_is_reported() {
        let err = surface(None).run_on_client("x").await.unwrap_err();
        assert_eq!(err, ActionError::ScriptUnavailable);
    }
}
