//! Persisted-state primitives - cookies and frame storage

use tracing::debug;

use super::Surface;

/// Storage keys under this prefix belong to the test harness and survive
/// [`Surface::clear_local_storage`].
pub const RESERVED_STORAGE_PREFIX: &str = "test:";

impl Surface {
    /// Remove every cookie visible to the authoring page.
    pub fn clear_cookies(&self) -> usize {
        let jar = self.frame.cookies();
        let names = jar.names();
        for name in &names {
            jar.remove(name);
        }
        debug!(surface = %self.surface_id, removed = names.len(), "cleared cookies");
        names.len()
    }

    /// Remove every storage key outside the reserved harness namespace.
    pub fn clear_local_storage(&self) -> usize {
        let storage = self.frame.local_storage();
        let doomed: Vec<String> = storage
            .keys()
            .into_iter()
            .filter(|key| !key.starts_with(RESERVED_STORAGE_PREFIX))
            .collect();
        for key in &doomed {
            storage.remove_item(key);
        }
        debug!(surface = %self.surface_id, removed = doomed.len(), "cleared local storage");
        doomed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{CookieJar, KeyValueStore};
    use crate::primitives::SurfaceConfig;
    use crate::test_support::StubFrame;
    use url::Url;

    fn surface(frame: std::sync::Arc<StubFrame>) -> Surface {
        Surface::new(
            frame,
            SurfaceConfig::new(Url::parse("http://app.test/").unwrap()),
        )
    }

    #[test]
    fn keeps_reserved_keys() {
        let frame = StubFrame::at("http://app.test/");
        for key in ["a", "b", "test:session"] {
            frame.storage.set_item(key, "1");
        }
        let removed = surface(frame.clone()).clear_local_storage();
        assert_eq!(removed, 2);
        assert_eq!(frame.storage.keys(), vec!["test:session".to_string()]);
    }

    #[test]
    fn removes_all_cookies() {
        let frame = StubFrame::at("http://app.test/");
        frame.cookies.set_item("sid", "abc");
        frame.cookies.set_item("theme", "dark");
        assert_eq!(surface(frame.clone()).clear_cookies(), 2);
        assert!(frame.cookies.names().is_empty());
    }
}
