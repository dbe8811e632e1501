//! Action surface implementation
//!
//! The surface is the bound set of primitive operations for one frame:
//! 1. visit - navigate within the site under test
//! 2. clear_cookies / clear_local_storage - reset persisted state
//! 3. wait - cooperative fixed delay
//! 4. run_on_client - late-bound code through the frame's script host
//! 5. wrap / get / query - element resolution

mod navigate;
mod script;
mod storage;
mod wait;

pub use navigate::*;
pub use storage::*;
pub use wait::*;

use std::fmt;
use std::sync::Arc;

use stepframe_core_types::SiteConfig;
use tracing::debug;
use url::Url;

use crate::errors::ActionError;
use crate::frame::{ElementRef, Frame};
use crate::types::WrapOptions;
use crate::wrapper::{ElementWrapper, UNKNOWN_ELEMENT};

/// Origin policy a surface enforces.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    /// Origin of the authoring page; the frame's location is used when unset
    pub origin_url: Option<Url>,

    /// Base every relative navigation resolves against
    pub base_url: Url,
}

impl SurfaceConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            origin_url: None,
            base_url,
        }
    }

    pub fn with_origin(mut self, origin: Url) -> Self {
        self.origin_url = Some(origin);
        self
    }
}

impl From<&SiteConfig> for SurfaceConfig {
    fn from(site: &SiteConfig) -> Self {
        Self {
            origin_url: site.origin_url.clone(),
            base_url: site.base_url.clone(),
        }
    }
}

/// Primitive automation operations scoped to one frame.
///
/// A surface is cheap to build and is never shared between unrelated steps.
pub struct Surface {
    frame: Arc<dyn Frame>,
    config: SurfaceConfig,
    surface_id: String,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("surface_id", &self.surface_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Surface {
    pub fn new(frame: Arc<dyn Frame>, config: SurfaceConfig) -> Self {
        Self {
            frame,
            config,
            surface_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn frame(&self) -> &Arc<dyn Frame> {
        &self.frame
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn id(&self) -> &str {
        &self.surface_id
    }

    /// Every element in the frame's document matching `selector`.
    pub fn query(&self, selector: &str) -> Vec<ElementRef> {
        let found = self.frame.query_selector_all(selector);
        debug!(surface = %self.surface_id, selector, matches = found.len(), "query");
        found
    }

    /// Wrap already-resolved elements.
    pub fn wrap(
        &self,
        targets: Vec<ElementRef>,
        options: WrapOptions,
    ) -> Result<ElementWrapper, ActionError> {
        ElementWrapper::new(UNKNOWN_ELEMENT, targets, options)
    }

    /// Resolve `selector` and wrap the first match.
    pub fn get(&self, selector: &str, options: WrapOptions) -> Result<ElementWrapper, ActionError> {
        let first = self
            .query(selector)
            .into_iter()
            .next()
            .ok_or_else(|| ActionError::NoElement(selector.to_string()))?;
        ElementWrapper::new(selector, vec![first], options)
    }
}
