use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Action-specific arguments keyed by the param keys an action declares.
pub type StepArgs = Map<String, Value>;

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub String);

impl StepId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a step's selector is interpreted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectType {
    /// The selector is a query expression used verbatim.
    #[default]
    Css,
    /// The selector is visible text matched against a fixed tag list.
    Content,
}

/// One user-authored instruction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default)]
    pub id: StepId,
    pub action: String,
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub select_type: SelectType,
    #[serde(
        default,
        deserialize_with = "deserialize_timeout",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub args: StepArgs,
}

/// Editors send the timeout as typed into a text field: a number or a numeric
/// string. Empty, zero and negative values mean no timeout.
fn deserialize_timeout<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimeout {
        Number(f64),
        Text(String),
    }

    let millis = match Option::<RawTimeout>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawTimeout::Number(ms)) => ms,
        Some(RawTimeout::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| de::Error::custom(format!("invalid timeout: {text}")))?
        }
    };
    if !millis.is_finite() {
        return Err(de::Error::custom(format!("invalid timeout: {millis}")));
    }
    Ok((millis > 0.0).then(|| millis.round() as u64))
}

impl Step {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            id: StepId::new(),
            action: action.into(),
            selector: String::new(),
            select_type: SelectType::Css,
            timeout: None,
            args: StepArgs::new(),
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    pub fn with_content(mut self, text: impl Into<String>) -> Self {
        self.selector = text.into();
        self.select_type = SelectType::Content;
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }

    /// Render an argument the way string interpolation would: strings as-is,
    /// scalars via their display form, absent or null as the empty string.
    pub fn arg_text(&self, key: &str) -> String {
        match self.args.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Truthiness of an argument. Missing, null, false, zero and empty string
    /// are all false.
    pub fn arg_flag(&self, key: &str) -> bool {
        match self.args.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(n)) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
            Some(Value::String(text)) => !text.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }

    /// Positive timeout in milliseconds, if any.
    pub fn timeout_ms(&self) -> Option<u64> {
        self.timeout.filter(|ms| *ms > 0)
    }

    pub fn is_content_select(&self) -> bool {
        self.select_type == SelectType::Content
    }
}
