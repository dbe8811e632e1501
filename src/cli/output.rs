use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Render `value` in the machine formats, or via `human` otherwise.
    pub fn render<T, F>(&self, value: &T, human: F) -> Result<String>
    where
        T: Serialize,
        F: FnOnce() -> Result<String>,
    {
        Ok(match self {
            OutputFormat::Human => human()?,
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
        })
    }

    pub fn emit<T, F>(&self, value: &T, human: F) -> Result<()>
    where
        T: Serialize,
        F: FnOnce() -> Result<String>,
    {
        let rendered = self.render(value, human)?;
        println!("{}", rendered.trim_end());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn machine_formats_ignore_the_human_renderer() {
        let value = json!({"ok": true});
        let rendered = OutputFormat::Json
            .render(&value, || unreachable!())
            .unwrap();
        assert_eq!(rendered, "{\n  \"ok\": true\n}");
        let rendered = OutputFormat::Yaml.render(&value, || unreachable!()).unwrap();
        assert_eq!(rendered, "ok: true\n");
        let rendered = OutputFormat::Human
            .render(&value, || Ok("fine".into()))
            .unwrap();
        assert_eq!(rendered, "fine");
    }

    #[test]
    fn human_renderer_errors_propagate() {
        let err = OutputFormat::Human
            .render(&json!({}), || Err(anyhow::anyhow!("unrenderable")))
            .unwrap_err();
        assert_eq!(err.to_string(), "unrenderable");
    }
}
