//! Output formatting for resolved models: markdown, JSON, and YAML.

use crate::config::{ModelConfig, ResolutionState, SubConfig};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Output format for inspection commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Yaml,
}

/// Serializable snapshot of a resolved model's fixed fields.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub name: String,
    pub temp_path: PathBuf,
    pub dump_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compress_with: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypt_with: Option<String>,
    pub archive: bool,
    pub databases: BTreeMap<String, String>,
    pub storages: BTreeMap<String, String>,
}

impl From<&ModelConfig> for ModelSummary {
    fn from(model: &ModelConfig) -> Self {
        Self {
            name: model.name().to_string(),
            temp_path: model.temp_path().to_path_buf(),
            dump_path: model.dump_path().to_path_buf(),
            compress_with: configured_kind(model.compress_with()),
            encrypt_with: configured_kind(model.encrypt_with()),
            archive: model.archive().is_some(),
            databases: kinds(model.databases()),
            storages: kinds(model.storages()),
        }
    }
}

fn configured_kind(sub: &SubConfig) -> Option<String> {
    sub.is_configured().then(|| sub.kind().to_string())
}

fn kinds(subs: &BTreeMap<String, SubConfig>) -> BTreeMap<String, String> {
    subs.iter()
        .map(|(key, sub)| (key.clone(), sub.kind().to_string()))
        .collect()
}

/// Format a single model as markdown.
pub fn format_model_markdown(model: &ModelConfig) -> String {
    let summary = ModelSummary::from(model);
    let mut md = String::new();

    md.push_str(&format!("## Model: {}\n", summary.name));
    md.push_str(&format!("- **temp_path**: `{}`\n", summary.temp_path.display()));
    md.push_str(&format!("- **dump_path**: `{}`\n", summary.dump_path.display()));

    if let Some(ref kind) = summary.compress_with {
        md.push_str(&format!("- **compress_with**: {}\n", kind));
    }

    if let Some(ref kind) = summary.encrypt_with {
        md.push_str(&format!("- **encrypt_with**: {}\n", kind));
    }

    if summary.archive {
        md.push_str("- **archive**: yes\n");
    }

    push_section(&mut md, "Databases", &summary.databases);
    push_section(&mut md, "Storages", &summary.storages);

    md
}

fn push_section(md: &mut String, title: &str, entries: &BTreeMap<String, String>) {
    if entries.is_empty() {
        return;
    }
    md.push_str(&format!("\n### {}\n", title));
    for (name, kind) in entries {
        md.push_str(&format!("- `{}`: {}\n", name, kind));
    }
}

/// Format the model list of a state as markdown.
pub fn format_models_markdown(state: &ResolutionState) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Models ({})\n\n", state.models().len()));
    for name in state.model_names() {
        md.push_str(&format!("- {}\n", name));
    }

    md
}

/// Render one model in the requested format.
pub fn render_model(model: &ModelConfig, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Markdown => Ok(format_model_markdown(model)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ModelSummary::from(model))?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&ModelSummary::from(model))?),
    }
}

/// Render the model names of a state in the requested format.
pub fn render_models(state: &ResolutionState, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Markdown => Ok(format_models_markdown(state)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&state.model_names())?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&state.model_names())?),
    }
}
