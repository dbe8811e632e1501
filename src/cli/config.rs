use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde_json::{Map, Value as JsonValue};
use tracing::info;

use crate::cli::context::CliContext;
use crate::config::{read_config_file, write_config_file, AppConfig};

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Set a configuration value (dotted key, e.g. site.baseURL)
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Reset configuration to defaults
    Reset,

    /// Validate configuration
    Validate,
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    let path = ctx.config_path().to_path_buf();
    match args.action {
        ConfigAction::Show => {
            let config = ctx.config();
            ctx.output()
                .emit(config, || describe_config(&path, config))?;
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Set { key, value } => {
            let config = read_config_file(&path).await?;
            let config = set_key(&config, &key, parse_cli_value(&value))?;
            write_config_file(&path, &config).await?;
            info!(key = %key, path = %path.display(), "updated configuration");
            println!("Saved configuration to {}", path.display());
        }
        ConfigAction::Get { key } => {
            let json = serde_json::to_value(ctx.config())?;
            let segments = split_key(&key)?;
            match get_json_value(&json, &segments) {
                Some(value) => println!("{}", serde_yaml::to_string(value)?.trim_end()),
                None => bail!("{} not found in configuration", key),
            }
        }
        ConfigAction::Reset => {
            write_config_file(&path, &AppConfig::default()).await?;
            println!(
                "Configuration reset to defaults and written to {}",
                path.display()
            );
        }
        ConfigAction::Validate => {
            let config = read_config_file(&path).await?;
            config
                .site
                .default_target()
                .context("default pathname does not resolve against the base URL")?;
            println!("Configuration at {} is valid", path.display());
        }
    }

    Ok(())
}

fn describe_config(path: &Path, config: &AppConfig) -> Result<String> {
    Ok(format!(
        "Current configuration ({}):\n{}",
        path.display(),
        serde_yaml::to_string(config)?
    ))
}

/// Apply one dotted-key assignment, re-validating the whole config.
fn set_key(config: &AppConfig, key: &str, value: JsonValue) -> Result<AppConfig> {
    let mut json = serde_json::to_value(config)?;
    let segments = split_key(key)?;
    set_json_value(&mut json, &segments, value)?;
    serde_json::from_value(json).with_context(|| format!("invalid value for {key}"))
}

fn parse_cli_value(raw: &str) -> JsonValue {
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}

fn split_key(key: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = key
        .split('.')
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        bail!("configuration key cannot be empty");
    }
    Ok(segments)
}

fn set_json_value(target: &mut JsonValue, path: &[&str], value: JsonValue) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        bail!("configuration key cannot be empty");
    };
    let mut current = target;
    for segment in parents {
        current = ensure_object(current, segment)?
            .entry((*segment).to_string())
            .or_insert(JsonValue::Null);
    }
    ensure_object(current, last)?.insert((*last).to_string(), value);
    Ok(())
}

fn ensure_object<'a>(
    value: &'a mut JsonValue,
    segment: &str,
) -> Result<&'a mut Map<String, JsonValue>> {
    if value.is_null() {
        *value = JsonValue::Object(Map::new());
    }
    match value {
        JsonValue::Object(map) => Ok(map),
        _ => bail!(
            "{} resolves to a non-object value; cannot assign nested configuration",
            segment
        ),
    }
}

fn get_json_value<'a>(value: &'a JsonValue, path: &[&str]) -> Option<&'a JsonValue> {
    let mut current = value;
    for segment in path {
        match current {
            JsonValue::Object(map) => {
                current = map.get(*segment)?;
            }
            _ => return None,
        }
    }
    Some(current)
}
