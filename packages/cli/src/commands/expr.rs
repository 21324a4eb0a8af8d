use super::read_model;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formwork_expression::{evaluate, Scope, Value};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExprArgs {
    /// Expression to evaluate, e.g. "model.days > 3 ? 'long' : 'short'"
    pub expression: String,

    /// JSON file bound as `model`
    #[arg(short, long)]
    pub model: Option<PathBuf>,
}

pub fn expr(args: ExprArgs) -> Result<()> {
    let model = read_model(args.model.as_deref())?;
    let value = evaluate_with_model(&args.expression, model)?;

    println!("{} {}", value, format!("({})", value.type_name()).dimmed());
    Ok(())
}

fn evaluate_with_model(expression: &str, model: formwork_designer::Model) -> Result<Value> {
    let scope = Scope::new().with("model", serde_json::Value::Object(model));
    evaluate(expression, &scope).map_err(|err| anyhow::anyhow!("{} in `{}`", err, expression))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_evaluates_against_model() {
        let model = json!({"days": 4}).as_object().cloned().unwrap();
        let value = evaluate_with_model("model.days > 3 ? 'long' : 'short'", model).unwrap();
        assert_eq!(value, Value::from("long"));
    }

    #[test]
    fn test_errors_mention_expression() {
        let err = evaluate_with_model("model.days +", Default::default()).unwrap_err();
        assert!(err.to_string().contains("model.days +"));
    }
}
