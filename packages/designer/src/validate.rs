//! Authoring-time checks for a form configuration.
//!
//! Nothing here blocks saving or rendering: at runtime a malformed expression
//! only degrades to `undefined`. The checks surface those problems early.

use crate::form::{ComponentInstance, FormConfiguration};
use crate::registry::ComponentRegistry;
use formwork_expression::ExpressionEvaluator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

/// A problem found in a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,

    /// Check that produced this diagnostic
    pub rule: String,

    pub message: String,

    /// Where in the form, e.g. `components[comp_3].hidden`
    pub location: String,
}

impl Diagnostic {
    pub fn error(
        rule: impl Into<String>,
        message: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            rule: rule.into(),
            message: message.into(),
            location: location.into(),
        }
    }

    pub fn warning(
        rule: impl Into<String>,
        message: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            rule: rule.into(),
            message: message.into(),
            location: location.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }
}

/// Field names must be usable as identifiers: `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Run every check against `form`
pub fn validate_form(form: &FormConfiguration, registry: &ComponentRegistry) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let instances = form.instances();

    let mut ids: BTreeMap<&str, usize> = BTreeMap::new();
    let mut fields: BTreeMap<&str, usize> = BTreeMap::new();

    for instance in &instances {
        let location = format!("components[{}]", instance.id);

        *ids.entry(instance.id.as_str()).or_default() += 1;

        if !registry.is_registered(&instance.type_key) {
            diagnostics.push(Diagnostic::error(
                "unknown-component",
                format!("Component type '{}' is not registered", instance.type_key),
                &location,
            ));
        }

        if !(1..=24).contains(&instance.span) {
            diagnostics.push(Diagnostic::error(
                "span-range",
                format!("Span {} is outside the 1-24 grid", instance.span),
                &location,
            ));
        }

        if instance.has_field() {
            *fields.entry(instance.field.as_str()).or_default() += 1;
            if !is_valid_field_name(&instance.field) {
                diagnostics.push(Diagnostic::warning(
                    "field-name",
                    format!("Field name '{}' is not a valid identifier", instance.field),
                    &location,
                ));
            }
        }

        check_flags(instance, &location, &mut diagnostics);
    }

    for (id, count) in ids.into_iter().filter(|(_, count)| *count > 1) {
        diagnostics.push(Diagnostic::error(
            "duplicate-id",
            format!("Instance id used {} times", count),
            format!("components[{}]", id),
        ));
    }

    for (field, count) in fields.into_iter().filter(|(_, count)| *count > 1) {
        diagnostics.push(Diagnostic::error(
            "duplicate-field",
            format!("Field '{}' is bound by {} components", field, count),
            "components",
        ));
    }

    for variable in &form.computed_variables {
        let location = format!("computedVariables[{}]", variable.name);
        if variable.name.is_empty() || variable.expression.is_empty() {
            diagnostics.push(Diagnostic::warning(
                "incomplete-rule",
                "Computed variable needs a name and an expression",
                location,
            ));
            continue;
        }
        check_expression(&variable.expression, &location, &mut diagnostics);
    }

    let field_names = form.field_names();
    for rule in &form.expressions {
        let location = format!("expressions[{}]", rule.target);
        if rule.target.is_empty() || rule.value.is_empty() {
            diagnostics.push(Diagnostic::warning(
                "incomplete-rule",
                "Assignment needs a target and a value",
                location,
            ));
            continue;
        }
        if !field_names.contains(&rule.target.as_str()) {
            diagnostics.push(Diagnostic::warning(
                "unknown-target",
                format!("Assignment target '{}' is not a form field", rule.target),
                &location,
            ));
        }
        check_expression(&rule.value, &location, &mut diagnostics);
    }

    diagnostics
}

fn check_flags(instance: &ComponentInstance, location: &str, diagnostics: &mut Vec<Diagnostic>) {
    let flags = [
        ("required", &instance.required),
        ("disabled", &instance.disabled),
        ("hidden", &instance.hidden),
    ];

    for (name, flag) in flags {
        if let Some(source) = flag.expression().filter(|s| !s.trim().is_empty()) {
            check_expression(source, &format!("{}.{}", location, name), diagnostics);
        }
    }
}

fn check_expression(source: &str, location: &str, diagnostics: &mut Vec<Diagnostic>) {
    if let Err(error) = ExpressionEvaluator::check(source) {
        diagnostics.push(Diagnostic::error(
            "expression-syntax",
            format!("{} in `{}`", error, source),
            location,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(value: serde_json::Value) -> Vec<Diagnostic> {
        let form: FormConfiguration = serde_json::from_value(value).unwrap();
        validate_form(&form, &ComponentRegistry::with_builtin_components())
    }

    fn rules(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.rule.as_str()).collect()
    }

    #[test]
    fn test_clean_form() {
        let diagnostics = validate(json!({
            "components": [
                {"id": "a", "typeKey": "number", "field": "days", "hidden": "!allowEdit"}
            ],
            "computedVariables": [{"name": "allowEdit", "expression": "model.days < 10"}],
            "expressions": [{"target": "days", "value": "computed.allowEdit ? 1 : 2"}]
        }));
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn test_malformed_expressions() {
        let diagnostics = validate(json!({
            "components": [{"id": "a", "typeKey": "text", "field": "x", "disabled": "model.x >"}],
            "computedVariables": [{"name": "bad", "expression": "(1 + 2"}]
        }));
        assert_eq!(rules(&diagnostics), vec!["expression-syntax", "expression-syntax"]);
        assert_eq!(diagnostics[0].location, "components[a].disabled");
        assert_eq!(diagnostics[1].location, "computedVariables[bad]");
    }

    #[test]
    fn test_structural_problems() {
        let diagnostics = validate(json!({
            "components": [
                {"id": "a", "typeKey": "text", "field": "name", "span": 30},
                {"id": "a", "typeKey": "laser", "field": "name"},
                {"id": "c", "typeKey": "text", "field": "1st"}
            ],
            "expressions": [{"target": "ghost", "value": "1"}]
        }));
        let found = rules(&diagnostics);

        assert!(found.contains(&"span-range"));
        assert!(found.contains(&"unknown-component"));
        assert!(found.contains(&"field-name"));
        assert!(found.contains(&"duplicate-id"));
        assert!(found.contains(&"duplicate-field"));
        assert!(found.contains(&"unknown-target"));
    }

    #[test]
    fn test_duplicates_reported_in_sorted_order() {
        let diagnostics = validate(json!({
            "components": [
                {"id": "b", "typeKey": "text", "field": "zeta"},
                {"id": "b", "typeKey": "text", "field": "zeta"},
                {"id": "a", "typeKey": "text", "field": "alpha"},
                {"id": "a", "typeKey": "text", "field": "alpha"}
            ]
        }));

        let duplicate_ids: Vec<&str> = diagnostics
            .iter()
            .filter(|d| d.rule == "duplicate-id")
            .map(|d| d.location.as_str())
            .collect();
        assert_eq!(duplicate_ids, vec!["components[a]", "components[b]"]);

        let duplicate_fields: Vec<&str> = diagnostics
            .iter()
            .filter(|d| d.rule == "duplicate-field")
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(
            duplicate_fields,
            vec![
                "Field 'alpha' is bound by 2 components",
                "Field 'zeta' is bound by 2 components"
            ]
        );
    }

    #[test]
    fn test_field_name_rule() {
        assert!(is_valid_field_name("startDate"));
        assert!(is_valid_field_name("_private2"));
        assert!(!is_valid_field_name("2fast"));
        assert!(!is_valid_field_name("with-dash"));
        assert!(!is_valid_field_name(""));
    }
}
