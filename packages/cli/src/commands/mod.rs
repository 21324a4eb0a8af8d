pub mod check;
pub mod components;
pub mod eval;
pub mod expr;
pub mod init;

pub use check::{check, CheckArgs};
pub use components::{components, ComponentsArgs};
pub use eval::{eval, EvalArgs};
pub use expr::{expr, ExprArgs};
pub use init::{init, InitArgs};

use anyhow::{Context, Result};
use formwork_designer::{FormConfiguration, Model};
use std::fs;
use std::path::Path;

/// Read a form configuration document
pub(crate) fn read_form(path: &Path) -> Result<FormConfiguration> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Cannot read form {}", path.display()))?;
    FormConfiguration::from_json(&source)
        .with_context(|| format!("Invalid form configuration in {}", path.display()))
}

/// Read a data model; no path means an empty model
pub(crate) fn read_model(path: Option<&Path>) -> Result<Model> {
    let Some(path) = path else {
        return Ok(Model::new());
    };

    let source = fs::read_to_string(path)
        .with_context(|| format!("Cannot read model {}", path.display()))?;
    match serde_json::from_str::<serde_json::Value>(&source)? {
        serde_json::Value::Object(model) => Ok(model),
        other => anyhow::bail!(
            "Model in {} must be a JSON object, found {}",
            path.display(),
            json_type(&other)
        ),
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
