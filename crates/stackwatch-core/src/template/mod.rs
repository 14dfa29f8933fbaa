//! Template and parameter file loading.

pub mod flatten;

use std::path::PathBuf;

use anyhow::Context;

use crate::provider::Parameter;

pub use flatten::flatten_parameters;

/// Paths to the template body and its JSON parameter document.
#[derive(Debug, Clone)]
pub struct TemplateInput {
    pub template_path: PathBuf,
    pub parameter_path: PathBuf,
}

/// Template body and the flattened parameters for a changeset.
#[derive(Debug, Clone)]
pub struct TemplateOutput {
    /// Template text, passed to the provider untouched.
    pub template_body: String,
    pub parameters: Vec<Parameter>,
}

/// Read the template verbatim and flatten the parameter file.
pub fn read(input: &TemplateInput) -> anyhow::Result<TemplateOutput> {
    let template_body = std::fs::read_to_string(&input.template_path).with_context(|| {
        format!(
            "Failed to read template file: {}",
            input.template_path.display()
        )
    })?;

    let parameters = read_parameters(&input.parameter_path)?;

    Ok(TemplateOutput {
        template_body,
        parameters,
    })
}

fn read_parameters(path: &std::path::Path) -> anyhow::Result<Vec<Parameter>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file: {}", path.display()))?;

    let document: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse parameter file as JSON: {}", path.display()))?;

    flatten_parameters(&document)
        .with_context(|| format!("Invalid parameter file: {}", path.display()))
}
