//! Wait primitive - cooperative fixed delay

use serde_json::Value;
use tokio::time::{sleep, Duration};
use tracing::debug;

use super::Surface;
use crate::errors::ActionError;

/// Interpret a wait argument as milliseconds.
///
/// Numbers and numeric strings are accepted; an empty string counts as zero
/// and negative values clamp to zero. Anything else is rejected.
pub fn parse_wait_time(time: &Value) -> Result<u64, ActionError> {
    let millis = match time {
        Value::Number(n) => n.as_f64(),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    match millis {
        Some(ms) if ms.is_finite() => Ok(ms.max(0.0).round() as u64),
        _ => Err(ActionError::InvalidTimeout(render(time))),
    }
}

fn render(time: &Value) -> String {
    match time {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

impl Surface {
    /// Suspend the current chain for `time` milliseconds.
    pub async fn wait(&self, time: &Value) -> Result<(), ActionError> {
        let millis = parse_wait_time(time)?;
        self.wait_ms(millis).await;
        Ok(())
    }

    pub async fn wait_ms(&self, millis: u64) {
        debug!(surface = %self.surface_id, millis, "waiting");
        sleep(Duration::from_millis(millis)).await;
    }
}
