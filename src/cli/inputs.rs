//! Reading steps, fixtures and chains from disk

use std::path::Path;

use anyhow::{Context, Result};
use memory_frame::PageFixture;
use serde::Deserialize;
use stepframe_core_types::{ChainInvocation, Step};
use tokio::fs;

#[derive(Deserialize)]
#[serde(untagged)]
enum StepsDocument {
    List(Vec<Step>),
    Test { steps: Vec<Step> },
}

/// Steps as a YAML or JSON list, or an object with a `steps` list.
pub fn parse_steps(raw: &str) -> Result<Vec<Step>> {
    let document: StepsDocument = serde_yaml::from_str(raw).context("parsing steps")?;
    Ok(match document {
        StepsDocument::List(steps) | StepsDocument::Test { steps } => steps,
    })
}

pub async fn read_steps(path: &Path) -> Result<Vec<Step>> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    parse_steps(&raw).with_context(|| format!("in {}", path.display()))
}

pub async fn read_fixture(path: Option<&Path>) -> Result<PageFixture> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            PageFixture::from_yaml_str(&raw).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(PageFixture::default()),
    }
}

/// A chain given inline as JSON/YAML, or as the path of a file holding it.
pub async fn read_chain(source: &str) -> Result<ChainInvocation> {
    let path = Path::new(source);
    let raw = if fs::try_exists(path).await.unwrap_or(false) {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?
    } else {
        source.to_string()
    };
    serde_yaml::from_str(&raw).context("parsing chain invocation")
}
