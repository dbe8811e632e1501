use serde::{Deserialize, Serialize};
use url::Url;

use crate::CoreError;

/// The site under test: where relative navigation resolves and which hosts
/// the embedded frame may visit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(rename = "baseURL", alias = "base_url")]
    pub base_url: Url,

    #[serde(
        rename = "defaultPathname",
        alias = "default_pathname",
        default = "root_pathname"
    )]
    pub default_pathname: String,

    /// Origin of the authoring page. When unset the frame's current location
    /// stands in for it.
    #[serde(
        rename = "originURL",
        alias = "origin_url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub origin_url: Option<Url>,
}

fn root_pathname() -> String {
    "/".to_string()
}

impl SiteConfig {
    pub fn new(base_url: &str) -> Result<Self, CoreError> {
        let base_url = Url::parse(base_url).map_err(|err| CoreError::invalid_url(base_url, err))?;
        Ok(Self {
            base_url,
            default_pathname: root_pathname(),
            origin_url: None,
        })
    }

    pub fn with_default_pathname(mut self, pathname: impl Into<String>) -> Self {
        self.default_pathname = pathname.into();
        self
    }

    pub fn with_origin(mut self, origin: Url) -> Self {
        self.origin_url = Some(origin);
        self
    }

    /// Landing page resolved against the base URL.
    pub fn default_target(&self) -> Result<Url, CoreError> {
        self.base_url
            .join(&self.default_pathname)
            .map_err(|err| CoreError::invalid_url(&self.default_pathname, err))
    }

    /// Path component of the landing page, which is what reset navigates to.
    pub fn default_target_path(&self) -> Result<String, CoreError> {
        self.default_target().map(|url| url.path().to_string())
    }
}
