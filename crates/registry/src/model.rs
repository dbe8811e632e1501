use action_primitives::{ActionError, ErrorKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stepframe_core_types::StepId;

/// Form control the authoring UI renders for a param.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Checkbox,
    Select,
    Number,
    Code,
}

/// One choice of a `select` param: a bare value, or a value with its own label.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamOption {
    Plain(String),
    Labeled { key: String, label: String },
}

impl ParamOption {
    pub fn plain(value: impl Into<String>) -> Self {
        Self::Plain(value.into())
    }

    pub fn labeled(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Labeled {
            key: key.into(),
            label: label.into(),
        }
    }

    /// Value stored in the step's args when this option is picked.
    pub fn key(&self) -> &str {
        match self {
            Self::Plain(value) => value,
            Self::Labeled { key, .. } => key,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Plain(value) => value,
            Self::Labeled { label, .. } => label,
        }
    }
}

/// A step argument an action declares.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamSpec {
    pub key: String,
    #[serde(rename = "type", default)]
    pub kind: ParamType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ParamOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl ParamSpec {
    pub fn new(key: impl Into<String>, kind: ParamType, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            label: label.into(),
            options: Vec::new(),
            default_value: None,
        }
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = ParamOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn accepts_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.key() == value)
    }
}

/// Catalog entry as the authoring UI consumes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMeta {
    pub action: String,
    pub label: String,
    #[serde(default)]
    pub params: Vec<ParamSpec>,
    #[serde(default)]
    pub hide_selector_input: bool,
}

/// Why a step did not succeed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ActionError> for StepFailure {
    fn from(err: &ActionError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Outcome of running one step.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub step_id: StepId,
    pub action: String,
    pub ok: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub finished_at: DateTime<Utc>,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<StepFailure>,
}

impl StepReport {
    pub fn new(step_id: StepId, action: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            step_id,
            action: action.into(),
            ok: false,
            started_at,
            finished_at: started_at,
            latency_ms: 0,
            error: None,
        }
    }

    /// Stamp the finish time and outcome.
    pub fn finish(mut self, result: Result<(), &ActionError>) -> Self {
        self.finished_at = Utc::now();
        self.latency_ms = (self.finished_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64;
        match result {
            Ok(()) => self.ok = true,
            Err(err) => {
                self.ok = false;
                self.error = Some(StepFailure::from(err));
            }
        }
        self
    }

    pub fn outcome(&self) -> &'static str {
        match &self.error {
            None if self.ok => "ok",
            Some(failure) => failure.kind.as_str(),
            None => "failed",
        }
    }
}
