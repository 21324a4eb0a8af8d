//! # Form Expression Evaluation
//!
//! Evaluates the three kinds of user-authored expressions a form carries:
//!
//! - **Computed variables**: `{name, expression}` pairs evaluated against the
//!   data model, e.g. a day count derived from two date fields.
//! - **Property expressions**: component properties such as `hidden` or
//!   `disabled` that may hold a computed-variable name (`allowEdit`) or an
//!   expression (`!allowEdit`, `model.amount > 1000`).
//! - **Assignments**: `{target, value}` rules that write an evaluated result
//!   into an existing model field.
//!
//! ## Failure Semantics
//!
//! A malformed or failing expression never aborts a pass. It degrades to
//! `undefined` (or leaves the target unchanged) and is logged at `warn`.
//!
//! ## Limitations
//!
//! Computed variables are evaluated in a single pass against `model` only, so
//! one computed variable cannot reference another.

use crate::error::ParseResult;
use crate::interpreter::{evaluate, Scope};
use crate::parser::parse;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Form data model: field name → value
pub type Model = serde_json::Map<String, serde_json::Value>;

/// Last evaluated computed variables: name → value
pub type ComputedValues = BTreeMap<String, Value>;

/// A named value derived from the data model
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComputedVariable {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub expression: String,
}

impl ComputedVariable {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
        }
    }
}

/// A rule writing an evaluated expression into a model field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssignmentExpression {
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub value: String,
}

impl AssignmentExpression {
    pub fn new(target: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            value: value.into(),
        }
    }
}

/// Evaluates computed variables, property expressions and assignments
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    /// Evaluate every computed variable against `{model}`
    pub fn evaluate_computed_variables(
        model: &Model,
        definitions: &[ComputedVariable],
    ) -> ComputedValues {
        let scope = Scope::new().with("model", model_value(model));
        let mut computed = ComputedValues::new();

        for variable in definitions {
            if variable.name.is_empty() || variable.expression.is_empty() {
                continue;
            }
            let value = Self::evaluate_logged(&variable.expression, &scope);
            debug!(name = %variable.name, value = %value, "Computed variable evaluated");
            computed.insert(variable.name.clone(), value);
        }

        computed
    }

    /// Evaluate a component property that may be a literal, a computed
    /// variable name or an expression
    pub fn evaluate_property(
        prop_value: &serde_json::Value,
        model: &Model,
        computed: &ComputedValues,
    ) -> Value {
        let source = match prop_value {
            serde_json::Value::String(s) if !s.trim().is_empty() => s,
            other => return Value::from(other),
        };

        if let Some(value) = computed.get(source) {
            return value.clone();
        }

        let mut scope = Scope::new()
            .with("model", model_value(model))
            .with("computed", Value::Object(computed.clone()));
        for (name, value) in computed {
            scope.bind(name.clone(), value.clone());
        }

        Self::evaluate_logged(source, &scope)
    }

    /// Apply assignment rules to a copy of the model
    ///
    /// A rule only writes when its target already exists on the model and the
    /// evaluated result is not `undefined`. Rules run in order, so later rules
    /// observe earlier writes.
    pub fn evaluate_assignments(
        model: &Model,
        computed: &ComputedValues,
        expressions: &[AssignmentExpression],
    ) -> Model {
        let mut new_model = model.clone();
        let computed_value = Value::Object(computed.clone());

        for rule in expressions {
            if rule.target.is_empty() || rule.value.is_empty() {
                continue;
            }
            if !new_model.contains_key(&rule.target) {
                debug!(target_field = %rule.target, "Skipping assignment to unknown field");
                continue;
            }

            let scope = Scope::new()
                .with("model", model_value(&new_model))
                .with("computed", computed_value.clone());

            if let Some(json) = Self::evaluate_logged(&rule.value, &scope).to_json() {
                new_model.insert(rule.target.clone(), json);
            }
        }

        new_model
    }

    /// Check that an expression parses, without evaluating it
    pub fn check(expression: &str) -> ParseResult<()> {
        parse(expression).map(|_| ())
    }

    fn evaluate_logged(expression: &str, scope: &Scope) -> Value {
        match evaluate(expression, scope) {
            Ok(value) => value,
            Err(error) => {
                warn!(expression, %error, "Error evaluating expression");
                Value::Undefined
            }
        }
    }
}

fn model_value(model: &Model) -> Value {
    Value::Object(
        model
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model(value: serde_json::Value) -> Model {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("Expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_computed_variables_are_independent() {
        let computed = ExpressionEvaluator::evaluate_computed_variables(
            &model(json!({"a": 2})),
            &[
                ComputedVariable::new("double", "model.a * 2"),
                ComputedVariable::new("quadruple", "double * 2"),
            ],
        );
        assert_eq!(computed["double"], Value::Number(4.0));
        // No fixpoint: `double` is not in scope for other computed variables
        assert_eq!(computed["quadruple"], Value::Undefined);
    }

    #[test]
    fn test_incomplete_definitions_are_skipped() {
        let computed = ExpressionEvaluator::evaluate_computed_variables(
            &Model::new(),
            &[
                ComputedVariable::new("", "1"),
                ComputedVariable::new("empty", ""),
            ],
        );
        assert!(computed.is_empty());
    }

    #[test]
    fn test_property_passthrough() {
        let computed = ComputedValues::new();
        let m = Model::new();
        assert_eq!(
            ExpressionEvaluator::evaluate_property(&json!(true), &m, &computed),
            Value::Boolean(true)
        );
        assert_eq!(
            ExpressionEvaluator::evaluate_property(&json!("  "), &m, &computed),
            Value::from("  ")
        );
        assert_eq!(
            ExpressionEvaluator::evaluate_property(&json!(null), &m, &computed),
            Value::Null
        );
    }

    #[test]
    fn test_property_sees_computed_namespace() {
        let mut computed = ComputedValues::new();
        computed.insert("limit".to_string(), Value::Number(10.0));
        let m = model(json!({"amount": 12}));
        assert_eq!(
            ExpressionEvaluator::evaluate_property(
                &json!("model.amount > computed.limit"),
                &m,
                &computed
            ),
            Value::Boolean(true)
        );
        assert_eq!(
            ExpressionEvaluator::evaluate_property(&json!("model.amount > limit"), &m, &computed),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_assignment_ignores_undefined_results() {
        let m = model(json!({"days": 1}));
        let result = ExpressionEvaluator::evaluate_assignments(
            &m,
            &ComputedValues::new(),
            &[AssignmentExpression::new("days", "computed.missing")],
        );
        assert_eq!(result, m);
    }

    #[test]
    fn test_assignments_chain_in_order() {
        let m = model(json!({"a": 1, "b": 0}));
        let result = ExpressionEvaluator::evaluate_assignments(
            &m,
            &ComputedValues::new(),
            &[
                AssignmentExpression::new("a", "model.a + 1"),
                AssignmentExpression::new("b", "model.a * 10"),
            ],
        );
        assert_eq!(result, model(json!({"a": 2, "b": 20})));
    }

    #[test]
    fn test_check() {
        assert!(ExpressionEvaluator::check("model.a > 1 ? 'x' : 'y'").is_ok());
        assert!(ExpressionEvaluator::check("model.a >").is_err());
    }

    #[test]
    fn test_rule_deserialization() {
        let rule: AssignmentExpression =
            serde_json::from_value(json!({"target": "days", "value": "computed.calculatedDays"}))
                .unwrap();
        assert_eq!(rule, AssignmentExpression::new("days", "computed.calculatedDays"));
    }
}
