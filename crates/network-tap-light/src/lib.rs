//! Network event queue (light).
//!
//! The embedded frame's interceptor appends one [`NetworkEvent`] per outgoing
//! request. Waiting for a request drains the queue front to back: events that
//! do not match are discarded for good, the first match is returned and
//! everything behind it stays queued.

use std::collections::VecDeque;

use action_primitives::ActionError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use stepframe_core_types::{NetworkEvent, RequestProperty};
use tracing::{debug, info};

/// Shape of the request a wait is looking for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMatcher {
    pub method: String,
    #[serde(default)]
    pub property: RequestProperty,
    pub value: String,
}

impl RequestMatcher {
    pub fn new(
        method: impl Into<String>,
        property: RequestProperty,
        value: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            property,
            value: value.into(),
        }
    }

    pub fn matches(&self, event: &NetworkEvent) -> bool {
        event.method == self.method && event.property(self.property) == self.value
    }
}

/// Cumulative counters exposed via [`RequestQueue::stats`], reported by
/// `run --metrics`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub recorded: u64,
    pub matched: u64,
    pub discarded: u64,
    pub pending: usize,
}

#[derive(Default)]
struct QueueState {
    events: VecDeque<NetworkEvent>,
    recorded: u64,
    matched: u64,
    discarded: u64,
}

/// FIFO buffer of observed requests, owned by one authoring session.
///
/// Each drain runs to completion under the queue lock, so two waits issued
/// at the same time are served one after the other; neither sees an event the
/// other already consumed.
#[derive(Default)]
pub struct RequestQueue {
    state: Mutex<QueueState>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Producer side: append one observed request.
    pub fn record(&self, event: NetworkEvent) {
        debug!(method = %event.method, pathname = %event.pathname, "request observed");
        let mut state = self.state.lock();
        state.recorded += 1;
        state.events.push_back(event);
    }

    /// Consumer side: pop events until one matches `matcher`.
    ///
    /// Fails once the queue is empty; every event inspected on the way has
    /// been removed either way.
    pub fn wait_for(&self, matcher: &RequestMatcher) -> Result<NetworkEvent, ActionError> {
        let mut state = self.state.lock();
        while let Some(event) = state.events.pop_front() {
            if matcher.matches(&event) {
                state.matched += 1;
                info!(
                    method = %matcher.method,
                    property = matcher.property.as_str(),
                    value = %matcher.value,
                    remaining = state.events.len(),
                    "matched request"
                );
                return Ok(event);
            }
            state.discarded += 1;
            debug!(method = %event.method, href = %event.href, "discarded request");
        }
        Err(ActionError::assertion(format!(
            "Could not find an XHR request matching: {} {}",
            matcher.method, matcher.value
        )))
    }

    pub fn len(&self) -> usize {
        self.state.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().events.is_empty()
    }

    /// Pending events, front first.
    pub fn snapshot(&self) -> Vec<NetworkEvent> {
        self.state.lock().events.iter().cloned().collect()
    }

    pub fn clear(&self) -> usize {
        let mut state = self.state.lock();
        let dropped = state.events.len();
        state.events.clear();
        dropped
    }

    pub fn stats(&self) -> QueueStats {
        let state = self.state.lock();
        QueueStats {
            recorded: state.recorded,
            matched: state.matched,
            discarded: state.discarded,
            pending: state.events.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn event(method: &str, url: &str) -> NetworkEvent {
        NetworkEvent::from_url(method, &Url::parse(url).unwrap())
    }

    #[test]
    fn matcher_compares_method_and_property() {
        let get_users = event("GET", "http://api.test/users?page=2");
        let by_path = RequestMatcher::new("GET", RequestProperty::Pathname, "/users");
        let by_href = RequestMatcher::new(
            "GET",
            RequestProperty::Href,
            "http://api.test/users?page=2",
        );
        assert!(by_path.matches(&get_users));
        assert!(by_href.matches(&get_users));
        assert!(!RequestMatcher::new("POST", RequestProperty::Pathname, "/users")
            .matches(&get_users));
        assert!(!RequestMatcher::new("GET", RequestProperty::Href, "/users").matches(&get_users));
    }

    #[test]
    fn stats_track_consumption() {
        let queue = RequestQueue::default();
        queue.record(event("GET", "http://api.test/a"));
        queue.record(event("GET", "http://api.test/b"));
        queue
            .wait_for(&RequestMatcher::new("GET", RequestProperty::Pathname, "/b"))
            .unwrap();
        assert_eq!(
            queue.stats(),
            QueueStats {
                recorded: 2,
                matched: 1,
                discarded: 1,
                pending: 0,
            }
        );
    }
}
