use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

/// An outgoing request observed from the embedded frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkEvent {
    pub method: String,
    pub pathname: String,
    pub href: String,
    #[serde(default)]
    pub origin: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NetworkEvent {
    pub fn from_url(method: impl Into<String>, url: &Url) -> Self {
        Self {
            method: method.into(),
            pathname: url.path().to_string(),
            href: url.as_str().to_string(),
            origin: url.origin().ascii_serialization(),
            extra: Map::new(),
        }
    }

    pub fn property(&self, property: RequestProperty) -> &str {
        match property {
            RequestProperty::Pathname => &self.pathname,
            RequestProperty::Href => &self.href,
        }
    }
}

/// Which part of a request a wait compares against.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestProperty {
    #[default]
    Pathname,
    Href,
}

impl RequestProperty {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pathname" => Some(Self::Pathname),
            "href" => Some(Self::Href),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pathname => "pathname",
            Self::Href => "href",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_event_from_url() {
        let url = Url::parse("http://api.test:8080/users?page=2").unwrap();
        let event = NetworkEvent::from_url("GET", &url);
        assert_eq!(event.pathname, "/users");
        assert_eq!(event.origin, "http://api.test:8080");
        assert_eq!(event.property(RequestProperty::Href), url.as_str());
    }

    #[test]
    fn keeps_unknown_fields() {
        let event: NetworkEvent = serde_json::from_str(
            r#"{"method":"POST","pathname":"/a","href":"http://x/a","origin":"http://x","status":201}"#,
        )
        .unwrap();
        assert_eq!(event.extra.get("status"), Some(&Value::from(201)));
    }
}
