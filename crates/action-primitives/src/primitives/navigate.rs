//! Navigate primitive - move the frame within the site under test

use tracing::{info, warn};
use url::Url;

use super::Surface;
use crate::errors::ActionError;

/// Host of `url` including an explicit port, the way `URL.host` reports it.
pub fn host_of(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|host| !host.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

impl Surface {
    /// Navigate the frame to `href`, resolved against the base URL.
    ///
    /// The target host must equal either the origin host or the base URL host.
    /// Only the path and query of the target survive; they are re-anchored on
    /// the base URL.
    pub fn visit(&self, href: &str) -> Result<Url, ActionError> {
        let base = &self.config.base_url;
        let target = base
            .join(href)
            .map_err(|err| ActionError::invalid_url(href, err))?;

        if target.cannot_be_a_base() {
            return Err(ActionError::InvalidUrl {
                url: href.to_string(),
                reason: "not a navigable location".to_string(),
            });
        }

        if let Some(host) = host_of(&target) {
            let origin_host = self.origin_host();
            let base_host = host_of(base);
            if origin_host.as_deref() != Some(host.as_str())
                && base_host.as_deref() != Some(host.as_str())
            {
                warn!(
                    surface = %self.surface_id,
                    href,
                    host = %host,
                    "refusing navigation to foreign domain"
                );
                return Err(ActionError::CrossDomain(host));
            }
        }

        let mut next = base.clone();
        next.set_path(target.path());
        next.set_query(target.query());
        next.set_fragment(None);

        info!(surface = %self.surface_id, url = %next, "visit");
        self.frame.set_src(next.clone());
        Ok(next)
    }

    fn origin_host(&self) -> Option<String> {
        match &self.config.origin_url {
            Some(origin) => host_of(origin),
            None => self.frame.location().and_then(|url| host_of(&url)),
        }
    }
}
